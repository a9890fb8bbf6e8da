// Pipeline Engine Library
// Parsing, validation, and sequential execution of declarative deployment pipelines

pub mod error;
pub mod execution;
pub mod pipeline;
pub mod runners;
pub mod workspace;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};

// Re-export pipeline types
pub use pipeline::models::{
    ExecutionContext, Parameter, ParameterType, Pipeline, Post, Stage, StageResult, StageStatus,
    Step, StepAction, StepResult, StepStatus,
};
pub use pipeline::params::bind_parameters;
pub use pipeline::parser::PipelineParser;
pub use pipeline::validate::{PipelineValidator, ValidationError};

// Re-export execution types
pub use execution::events::{
    progress_channel, EventSender, ExecutionEvent, LogLevel, PostPhase, ProgressReceiver,
    ProgressSender,
};
pub use execution::executor::{ExecutionResult, PipelineExecutor};
pub use execution::plan::{ExecutionPlan, PlannedStep};

// Re-export runner types
pub use runners::{Runner, ShellRunner};

// Re-export workspace helpers
pub use workspace::clean_workspace;
