// Execution Plan
// Dry run: lists every command the executor would spawn, in order, without
// running anything. Makes "diff the executed commands" a first-class check.

use crate::pipeline::models::{Pipeline, Step, StepAction};
use crate::runners::ShellRunner;

use serde::Serialize;
use std::collections::BTreeMap;

/// One step of the plan. `argv` is the exact program + arguments the
/// executor would spawn; empty for log-only steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub stage: String,
    pub step: String,
    /// Raw command or script text, None for echo steps
    pub command: Option<String>,
    pub argv: Vec<String>,
}

impl PlannedStep {
    fn from_step(stage: &str, step: &Step) -> Self {
        let command = match &step.action {
            StepAction::Command(cmd) => Some(cmd.clone()),
            StepAction::Shell { script, .. } => Some(script.clone()),
            StepAction::Echo(_) => None,
        };
        let argv = ShellRunner::command_line(step)
            .map(|(program, args)| {
                let mut argv = vec![program];
                argv.extend(args);
                argv
            })
            .unwrap_or_default();
        Self {
            stage: stage.to_string(),
            step: step.name.clone(),
            command,
            argv,
        }
    }

    /// The program a command step hands to the shell (its first token)
    pub fn invoked_program(&self) -> Option<&str> {
        self.command.as_deref()?.split_whitespace().next()
    }
}

/// Ordered listing of everything a run would execute, stages and
/// post-actions included. The bound parameters are carried for display
/// only: nothing in the plan is derived from them.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
    pub pipeline: String,
    pub parameters: BTreeMap<String, String>,
    pub clean_workspace: bool,
    pub steps: Vec<PlannedStep>,
}

impl ExecutionPlan {
    pub fn for_pipeline(pipeline: &Pipeline, parameters: &BTreeMap<String, String>) -> Self {
        let mut steps = Vec::new();

        for stage in &pipeline.stages {
            for step in &stage.steps {
                steps.push(PlannedStep::from_step(&stage.stage, step));
            }
        }
        for step in &pipeline.post.always {
            steps.push(PlannedStep::from_step("post:always", step));
        }
        for step in &pipeline.post.success {
            steps.push(PlannedStep::from_step("post:success", step));
        }
        for step in &pipeline.post.failure {
            steps.push(PlannedStep::from_step("post:failure", step));
        }

        Self {
            pipeline: pipeline.name.clone(),
            parameters: parameters.clone(),
            clean_workspace: pipeline.post.clean_workspace,
            steps,
        }
    }

    /// The command texts that would reach a shell, in execution order
    pub fn commands(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| s.command.as_deref())
            .collect()
    }

    /// Programs named by command steps that do not resolve on PATH
    pub fn missing_programs(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for step in &self.steps {
            if let Some(program) = step.invoked_program() {
                if !missing.iter().any(|m| m == program) && which::which(program).is_err() {
                    missing.push(program.to_string());
                }
            }
        }
        missing
    }
}
