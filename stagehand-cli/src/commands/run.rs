use crate::commands::parse_param_flags;
use crate::output;

use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::Result;

use pipeline_engine::{
    bind_parameters, progress_channel, ExecutionContext, ExecutionEvent, LogLevel,
    PipelineExecutor, PipelineParser, PipelineValidator, StageStatus, StepStatus,
};

/// Run a pipeline definition
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the pipeline YAML file
    pub pipeline: PathBuf,

    /// Set a parameter (can be repeated, format: NAME=VALUE)
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Working directory for execution (required when the pipeline
    /// cleans its workspace)
    #[arg(long, short = 'w', value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

/// Pick the directory the run executes in. A pipeline that cleans its
/// workspace empties this directory after the run, so it must be named
/// explicitly rather than defaulted to wherever the command was invoked.
fn resolve_working_dir(explicit: Option<&Path>, cleans_workspace: bool) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None if cleans_workspace => color_eyre::eyre::bail!(
            "this pipeline cleans its workspace after the run; \
             pass --working-dir to name the directory it may empty"
        ),
        None => Ok(std::env::current_dir()?),
    }
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let pipeline_path = &args.pipeline;

    if !pipeline_path.exists() {
        color_eyre::eyre::bail!("Pipeline file not found: {}", pipeline_path.display());
    }

    let overrides = parse_param_flags(&args.params)?;

    output::status("Parsing", &format!("{}", pipeline_path.display()));
    let pipeline = PipelineParser::from_file(pipeline_path)?;

    let working_dir = resolve_working_dir(
        args.working_dir.as_deref(),
        pipeline.post.clean_workspace,
    )?;

    if let Err(errors) = PipelineValidator::validate(&pipeline) {
        output::error(&format!("{} validation error(s):", errors.len()));
        for error in &errors {
            output::error(&format!("  - [{}] {}", error.path, error.message));
        }
        std::process::exit(1);
    }

    let bound = bind_parameters(&pipeline.parameters, &overrides)?;

    output::info(&format!(
        "Pipeline '{}': {} stages, {} steps",
        pipeline.name,
        pipeline.stages.len(),
        pipeline.step_count()
    ));

    let context = ExecutionContext::new(
        pipeline.name.clone(),
        working_dir.to_string_lossy().to_string(),
    );

    let (tx, mut rx) = progress_channel();

    let executor = PipelineExecutor::new(pipeline).with_progress(tx);
    let exec_handle = tokio::spawn(async move { executor.execute(context, bound).await });

    while let Some(event) = rx.recv().await {
        match &event {
            ExecutionEvent::PipelineStarted {
                pipeline_name,
                total_stages,
            } => {
                println!();
                output::header(&format!(
                    "Pipeline '{}' ({} stages)",
                    pipeline_name, total_stages
                ));
            }

            ExecutionEvent::PipelineCompleted {
                success, duration, ..
            } => {
                println!();
                if *success {
                    output::success(&format!(
                        "Pipeline completed successfully in {:.2}s",
                        duration.as_secs_f64()
                    ));
                } else {
                    output::failure(&format!(
                        "Pipeline failed after {:.2}s",
                        duration.as_secs_f64()
                    ));
                }
            }

            ExecutionEvent::StageStarted {
                stage_name,
                display_name,
                total_steps,
            } => {
                let label = display_name.as_deref().unwrap_or(stage_name);
                output::stage_header(label, *total_steps);
            }

            ExecutionEvent::StageCompleted {
                stage_name,
                status,
                duration,
            } => {
                let symbol = match status {
                    StageStatus::Success => "OK",
                    StageStatus::Failed => "FAIL",
                    _ => "DONE",
                };
                let line = format!(
                    "  Stage '{}' {} ({:.2}s)",
                    stage_name,
                    symbol,
                    duration.as_secs_f64()
                );
                if *status == StageStatus::Success {
                    output::dim_success(&line);
                } else {
                    output::dim_failure(&line);
                }
            }

            ExecutionEvent::StageSkipped { stage_name, reason } => {
                output::warning(&format!("  Stage '{}' skipped: {}", stage_name, reason));
            }

            ExecutionEvent::StepStarted {
                step_name,
                step_index,
                ..
            } => {
                println!("    [Step {}] {}", step_index + 1, step_name);
            }

            ExecutionEvent::StepOutput {
                output, is_error, ..
            } => {
                if *is_error {
                    output::step_error(output);
                } else {
                    output::step_output(output);
                }
            }

            ExecutionEvent::StepCompleted {
                status,
                duration,
                exit_code,
                ..
            } => {
                let symbol = match status {
                    StepStatus::Success => "OK",
                    StepStatus::Failed => "FAIL",
                    StepStatus::Skipped => "SKIP",
                    _ => "DONE",
                };
                let exit_info = match exit_code {
                    Some(code) if *code != 0 => format!(" (exit code: {})", code),
                    _ => String::new(),
                };
                let line = format!(
                    "      {} ({:.2}s){}",
                    symbol,
                    duration.as_secs_f64(),
                    exit_info
                );
                if *status == StepStatus::Failed {
                    output::dim_failure(&line);
                } else {
                    output::dim_success(&line);
                }
            }

            ExecutionEvent::PostStarted { phase, total_steps } => {
                output::post_header(&phase.to_string(), *total_steps);
            }

            ExecutionEvent::WorkspaceCleaned { path } => {
                output::info(&format!("workspace cleaned: {}", path));
            }

            ExecutionEvent::Log { level, message } => match level {
                LogLevel::Error => output::error(message),
                LogLevel::Warning => output::warning(message),
                _ => output::dim(message),
            },
        }
    }

    let result = exec_handle.await?;

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaning_pipeline_requires_explicit_working_dir() {
        let err = resolve_working_dir(None, true).unwrap_err();
        assert!(err.to_string().contains("--working-dir"));
    }

    #[test]
    fn test_explicit_working_dir_allows_cleanup() {
        let dir = resolve_working_dir(Some(Path::new("/tmp/deploy-ws")), true).unwrap();
        assert_eq!(dir, Path::new("/tmp/deploy-ws"));
    }

    #[test]
    fn test_non_cleaning_pipeline_defaults_to_invocation_dir() {
        let dir = resolve_working_dir(None, false).unwrap();
        assert_eq!(dir, std::env::current_dir().unwrap());
    }
}
