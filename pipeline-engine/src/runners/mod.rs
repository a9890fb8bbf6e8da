// Runners Module
// Step execution backends for the pipeline executor

pub mod shell;

pub use shell::ShellRunner;

use crate::execution::events::ProgressSender;
use crate::pipeline::models::{ExecutionContext, Step, StepResult};

/// Trait for step runners
#[async_trait::async_trait]
pub trait Runner: Send + Sync {
    /// Execute a step within the given context and return its result
    async fn run(
        &self,
        step: &Step,
        context: &ExecutionContext,
        step_index: usize,
        progress: Option<&ProgressSender>,
    ) -> StepResult;
}
