// Execution Module
// Sequential orchestration, progress events, and dry-run planning

pub mod events;
pub mod executor;
pub mod plan;

// Re-export key types
pub use events::{progress_channel, ExecutionEvent, PostPhase, ProgressSender};
pub use executor::{ExecutionResult, PipelineExecutor};
pub use plan::{ExecutionPlan, PlannedStep};
