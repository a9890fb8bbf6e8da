// Semantic validation of pipeline definitions
// Runs after YAML parsing, before parameter binding and execution

use crate::pipeline::models::{Parameter, ParameterType, Pipeline};
use crate::pipeline::params::yaml_to_string;
use std::collections::HashSet;
use std::fmt;

/// Validation error for semantic checks
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
    pub path: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error at '{}': {}", self.path, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

pub struct PipelineValidator;

impl PipelineValidator {
    pub fn validate(pipeline: &Pipeline) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if pipeline.stages.is_empty() {
            errors.push(ValidationError::new("pipeline has no stages", "stages"));
        }

        let mut seen_stages = HashSet::new();
        for (index, stage) in pipeline.stages.iter().enumerate() {
            let path = format!("stages[{}]", index);

            if !seen_stages.insert(stage.stage.as_str()) {
                errors.push(
                    ValidationError::new(
                        format!("duplicate stage name '{}'", stage.stage),
                        path.clone(),
                    )
                    .with_suggestion("stage names must be unique within a pipeline"),
                );
            }

            if stage.steps.is_empty() {
                errors.push(ValidationError::new(
                    format!("stage '{}' has no steps", stage.stage),
                    format!("{}.steps", path),
                ));
            }
        }

        let mut seen_params = HashSet::new();
        for (index, param) in pipeline.parameters.iter().enumerate() {
            let path = format!("parameters[{}]", index);

            if !seen_params.insert(param.name.as_str()) {
                errors.push(ValidationError::new(
                    format!("duplicate parameter name '{}'", param.name),
                    path.clone(),
                ));
            }

            Self::validate_parameter(param, &path, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_parameter(param: &Parameter, path: &str, errors: &mut Vec<ValidationError>) {
        match param.param_type {
            ParameterType::Choice => {
                if param.values.is_empty() {
                    errors.push(
                        ValidationError::new(
                            format!("choice parameter '{}' declares no values", param.name),
                            format!("{}.values", path),
                        )
                        .with_suggestion("add a 'values' list with the allowed choices"),
                    );
                } else if let Some(default) = &param.default {
                    let default_value = yaml_to_string(default);
                    if !param
                        .values
                        .iter()
                        .any(|value| yaml_to_string(value) == default_value)
                    {
                        errors.push(ValidationError::new(
                            format!(
                                "default for choice parameter '{}' is not one of its values",
                                param.name
                            ),
                            format!("{}.default", path),
                        ));
                    }
                }
            }
            ParameterType::Boolean => {
                if let Some(default) = &param.default {
                    if !default.is_bool() {
                        errors.push(
                            ValidationError::new(
                                format!(
                                    "default for boolean parameter '{}' must be true or false",
                                    param.name
                                ),
                                format!("{}.default", path),
                            )
                            .with_suggestion("use an unquoted true/false"),
                        );
                    }
                }
                if !param.values.is_empty() {
                    errors.push(ValidationError::new(
                        format!("boolean parameter '{}' cannot declare values", param.name),
                        format!("{}.values", path),
                    ));
                }
            }
            ParameterType::String | ParameterType::File => {
                if !param.values.is_empty() {
                    errors.push(
                        ValidationError::new(
                            format!(
                                "parameter '{}' declares values but is not a choice",
                                param.name
                            ),
                            format!("{}.values", path),
                        )
                        .with_suggestion("set 'type: choice' to restrict the allowed values"),
                    );
                }
            }
        }
    }
}
