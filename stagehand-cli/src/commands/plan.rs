use crate::commands::parse_param_flags;
use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use pipeline_engine::{bind_parameters, ExecutionPlan, PipelineParser, PipelineValidator};

/// Show what a run would execute, without running anything
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the pipeline YAML file
    pub pipeline: PathBuf,

    /// Set a parameter (can be repeated, format: NAME=VALUE)
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let pipeline_path = &args.pipeline;

    if !pipeline_path.exists() {
        color_eyre::eyre::bail!("Pipeline file not found: {}", pipeline_path.display());
    }

    let overrides = parse_param_flags(&args.params)?;

    let pipeline = PipelineParser::from_file(pipeline_path)?;

    if let Err(errors) = PipelineValidator::validate(&pipeline) {
        output::error(&format!("{} validation error(s):", errors.len()));
        for error in &errors {
            output::error(&format!("  - [{}] {}", error.path, error.message));
        }
        std::process::exit(1);
    }

    let bound = bind_parameters(&pipeline.parameters, &overrides)?;
    let plan = ExecutionPlan::for_pipeline(&pipeline, &bound);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    output::header(&format!("Plan for pipeline '{}'", plan.pipeline));

    if !plan.parameters.is_empty() {
        println!();
        println!("  Parameters:");
        for (name, value) in &plan.parameters {
            println!("    {} = {}", name, value);
        }
    }

    println!();
    let mut current_stage = "";
    for step in &plan.steps {
        if step.stage != current_stage {
            println!("  {}:", step.stage);
            current_stage = &step.stage;
        }
        match &step.command {
            Some(command) => println!("    {} -> {}", step.step, command),
            None => println!("    {} (log only)", step.step),
        }
    }

    if plan.clean_workspace {
        println!();
        println!("  Workspace is cleaned after the run.");
    }

    Ok(())
}
