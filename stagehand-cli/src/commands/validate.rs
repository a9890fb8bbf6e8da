use crate::output;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use pipeline_engine::{ExecutionPlan, PipelineParser, PipelineValidator};

/// Validate a pipeline YAML file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the pipeline YAML file
    pub pipeline: PathBuf,

    /// Also check that planned programs resolve on PATH
    #[arg(long)]
    pub commands: bool,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let pipeline_path = &args.pipeline;

    if !pipeline_path.exists() {
        color_eyre::eyre::bail!("Pipeline file not found: {}", pipeline_path.display());
    }

    output::status("Validating", &format!("{}", pipeline_path.display()));

    let pipeline = match PipelineParser::from_file(pipeline_path) {
        Ok(p) => p,
        Err(e) => {
            output::error(&format!("Parse error: {}", e));
            std::process::exit(1);
        }
    };

    output::check("YAML syntax valid");
    output::check(&format!(
        "Structure: {} parameters, {} stages, {} steps",
        pipeline.parameters.len(),
        pipeline.stages.len(),
        pipeline.step_count()
    ));

    match PipelineValidator::validate(&pipeline) {
        Ok(()) => {
            output::check("Semantic validation passed");
        }
        Err(errors) => {
            output::error(&format!("{} validation error(s):", errors.len()));
            for error in &errors {
                output::error(&format!("  - [{}] {}", error.path, error.message));
                if let Some(suggestion) = &error.suggestion {
                    output::info(&format!("    Suggestion: {}", suggestion));
                }
            }
            std::process::exit(1);
        }
    }

    if args.commands {
        let plan = ExecutionPlan::for_pipeline(&pipeline, &BTreeMap::new());
        let missing = plan.missing_programs();
        if missing.is_empty() {
            output::check("All planned programs resolve on PATH");
        } else {
            for program in &missing {
                output::warning(&format!("program not found on PATH: {}", program));
            }
        }
    }

    println!();
    output::success("Pipeline is valid");

    Ok(())
}
