use thiserror::Error;

/// Errors surfaced by the pipeline engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse pipeline definition: {0}")]
    Definition(#[from] serde_yaml::Error),

    #[error("invalid pipeline definition '{path}': {source}")]
    InvalidDefinition {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParameterValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("refusing to clean '{0}': not a usable workspace directory")]
    UnsafeWorkspace(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
