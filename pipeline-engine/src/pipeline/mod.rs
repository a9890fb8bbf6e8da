pub mod models;
pub mod params;
pub mod parser;
pub mod validate;

pub use models::{ExecutionContext, Parameter, Pipeline, Post, Stage, Step, StepResult, StepStatus};
pub use params::bind_parameters;
pub use parser::PipelineParser;
pub use validate::{PipelineValidator, ValidationError};
