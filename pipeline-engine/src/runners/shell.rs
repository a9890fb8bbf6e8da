// Shell Runner
// Executes command, shell, and echo steps through the platform shell

use crate::execution::events::{EventSender, ExecutionEvent, ProgressSender};
use crate::pipeline::models::{ExecutionContext, Step, StepAction, StepResult, StepStatus};

use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    /// The program and arguments a step would spawn, if any.
    /// Echo steps never spawn a process.
    pub fn command_line(step: &Step) -> Option<(String, Vec<String>)> {
        match &step.action {
            StepAction::Command(cmd) => Some(shell_invocation(None, cmd)),
            StepAction::Shell { shell, script } => {
                Some(shell_invocation(shell.as_deref(), script))
            }
            StepAction::Echo(_) => None,
        }
    }

    async fn run_process(
        &self,
        step: &Step,
        context: &ExecutionContext,
        step_index: usize,
        progress: Option<&ProgressSender>,
    ) -> StepResult {
        let start = Instant::now();
        let (program, args) = Self::command_line(step).expect("echo steps never reach the shell");

        let stage_name = context.stage_name.clone().unwrap_or_default();

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .current_dir(&context.working_dir)
            .envs(&context.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return StepResult {
                    step_name: step.name.clone(),
                    status: StepStatus::Failed,
                    output: String::new(),
                    error: Some(format!("failed to spawn '{}': {}", program, e)),
                    duration: start.elapsed(),
                    exit_code: None,
                };
            }
        };

        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let step_name = step.name.clone();
        let out_stage = stage_name.clone();
        let out_progress = progress.cloned();
        let stdout_task = tokio::spawn(async move {
            let mut lines = Vec::new();
            while let Ok(Some(line)) = stdout_reader.next_line().await {
                out_progress.send_event(ExecutionEvent::StepOutput {
                    stage_name: out_stage.clone(),
                    step_name: step_name.clone(),
                    step_index,
                    output: line.clone(),
                    is_error: false,
                });
                lines.push(line);
            }
            lines.join("\n")
        });

        let step_name = step.name.clone();
        let err_progress = progress.cloned();
        let stderr_task = tokio::spawn(async move {
            let mut lines = Vec::new();
            while let Ok(Some(line)) = stderr_reader.next_line().await {
                err_progress.send_event(ExecutionEvent::StepOutput {
                    stage_name: stage_name.clone(),
                    step_name: step_name.clone(),
                    step_index,
                    output: line.clone(),
                    is_error: true,
                });
                lines.push(line);
            }
            lines.join("\n")
        });

        let output = stdout_task.await.unwrap_or_default();
        let mut error_output = stderr_task.await.unwrap_or_default();

        let (exit_code, status) = match child.wait().await {
            Ok(exit_status) => {
                let status = if exit_status.success() {
                    StepStatus::Success
                } else {
                    StepStatus::Failed
                };
                (exit_status.code(), status)
            }
            Err(e) => {
                error_output = format!("process error: {}", e);
                (None, StepStatus::Failed)
            }
        };

        StepResult {
            step_name: step.name.clone(),
            status,
            output,
            error: if error_output.is_empty() {
                None
            } else {
                Some(error_output)
            },
            duration: start.elapsed(),
            exit_code,
        }
    }

    fn run_echo(
        &self,
        step: &Step,
        message: &str,
        context: &ExecutionContext,
        step_index: usize,
        progress: Option<&ProgressSender>,
    ) -> StepResult {
        progress.send_event(ExecutionEvent::StepOutput {
            stage_name: context.stage_name.clone().unwrap_or_default(),
            step_name: step.name.clone(),
            step_index,
            output: message.to_string(),
            is_error: false,
        });

        StepResult {
            step_name: step.name.clone(),
            status: StepStatus::Success,
            output: message.to_string(),
            error: None,
            duration: std::time::Duration::from_secs(0),
            exit_code: None,
        }
    }
}

#[async_trait::async_trait]
impl super::Runner for ShellRunner {
    async fn run(
        &self,
        step: &Step,
        context: &ExecutionContext,
        step_index: usize,
        progress: Option<&ProgressSender>,
    ) -> StepResult {
        match &step.action {
            StepAction::Echo(message) => {
                self.run_echo(step, message, context, step_index, progress)
            }
            _ => self.run_process(step, context, step_index, progress).await,
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn shell_invocation(shell: Option<&str>, script: &str) -> (String, Vec<String>) {
    let shell_cmd = shell
        .map(str::to_string)
        .unwrap_or_else(default_shell);

    if cfg!(target_os = "windows") {
        (shell_cmd, vec!["/C".to_string(), script.to_string()])
    } else {
        (shell_cmd, vec!["-c".to_string(), script.to_string()])
    }
}

fn default_shell() -> String {
    if cfg!(target_os = "windows") {
        "cmd".to_string()
    } else {
        "sh".to_string()
    }
}
