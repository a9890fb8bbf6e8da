// Execution Events
// Progress reporting and event types for pipeline execution

use crate::pipeline::models::{StageStatus, StepStatus};

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;

/// Sender for execution progress events
pub type ProgressSender = mpsc::UnboundedSender<ExecutionEvent>;

/// Receiver for execution progress events
pub type ProgressReceiver = mpsc::UnboundedReceiver<ExecutionEvent>;

/// Create a new progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Post-action phase being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostPhase {
    Always,
    Success,
    Failure,
}

impl fmt::Display for PostPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostPhase::Always => write!(f, "always"),
            PostPhase::Success => write!(f, "success"),
            PostPhase::Failure => write!(f, "failure"),
        }
    }
}

/// Events emitted during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    /// Pipeline execution started
    PipelineStarted {
        pipeline_name: String,
        total_stages: usize,
    },

    /// Pipeline execution completed, post-actions included
    PipelineCompleted {
        pipeline_name: String,
        success: bool,
        duration: Duration,
    },

    /// Stage execution started
    StageStarted {
        stage_name: String,
        display_name: Option<String>,
        total_steps: usize,
    },

    /// Stage execution completed
    StageCompleted {
        stage_name: String,
        status: StageStatus,
        duration: Duration,
    },

    /// Stage was skipped because an earlier stage failed
    StageSkipped { stage_name: String, reason: String },

    /// Step execution started
    StepStarted {
        stage_name: String,
        step_name: String,
        step_index: usize,
    },

    /// A line of step output (stdout or stderr)
    StepOutput {
        stage_name: String,
        step_name: String,
        step_index: usize,
        output: String,
        is_error: bool,
    },

    /// Step execution completed
    StepCompleted {
        stage_name: String,
        step_name: String,
        step_index: usize,
        status: StepStatus,
        duration: Duration,
        exit_code: Option<i32>,
    },

    /// A post-action phase started
    PostStarted {
        phase: PostPhase,
        total_steps: usize,
    },

    /// The workspace directory was emptied
    WorkspaceCleaned { path: String },

    /// Log message (info, warning, error)
    Log { level: LogLevel, message: String },
}

/// Log level for log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl ExecutionEvent {
    pub fn pipeline_started(name: impl Into<String>, total_stages: usize) -> Self {
        Self::PipelineStarted {
            pipeline_name: name.into(),
            total_stages,
        }
    }

    pub fn pipeline_completed(name: impl Into<String>, success: bool, duration: Duration) -> Self {
        Self::PipelineCompleted {
            pipeline_name: name.into(),
            success,
            duration,
        }
    }

    pub fn stage_started(
        name: impl Into<String>,
        display_name: Option<String>,
        total_steps: usize,
    ) -> Self {
        Self::StageStarted {
            stage_name: name.into(),
            display_name,
            total_steps,
        }
    }

    pub fn stage_completed(
        name: impl Into<String>,
        status: StageStatus,
        duration: Duration,
    ) -> Self {
        Self::StageCompleted {
            stage_name: name.into(),
            status,
            duration,
        }
    }

    pub fn stage_skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StageSkipped {
            stage_name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn step_started(
        stage_name: impl Into<String>,
        step_name: impl Into<String>,
        step_index: usize,
    ) -> Self {
        Self::StepStarted {
            stage_name: stage_name.into(),
            step_name: step_name.into(),
            step_index,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

/// Helper trait for sending events, ignoring errors (fire-and-forget)
pub trait EventSender {
    fn send_event(&self, event: ExecutionEvent);
}

impl EventSender for ProgressSender {
    fn send_event(&self, event: ExecutionEvent) {
        let _ = self.send(event);
    }
}

impl EventSender for Option<ProgressSender> {
    fn send_event(&self, event: ExecutionEvent) {
        if let Some(sender) = self {
            let _ = sender.send(event);
        }
    }
}

impl EventSender for Option<&ProgressSender> {
    fn send_event(&self, event: ExecutionEvent) {
        if let Some(sender) = self {
            let _ = sender.send(event);
        }
    }
}
