// Parameter binding
// Resolves invocation-time overrides against declared pipeline parameters.
// Bound values are published to every step's environment under the
// parameter's own name; they are never spliced into command lines.

use crate::pipeline::models::{Parameter, ParameterType};
use crate::{EngineError, EngineResult};
use std::collections::{BTreeMap, HashMap};

/// Resolve supplied parameter values against the declared parameters,
/// filling in defaults for anything not supplied.
pub fn bind_parameters(
    declared: &[Parameter],
    overrides: &HashMap<String, String>,
) -> EngineResult<BTreeMap<String, String>> {
    for name in overrides.keys() {
        if !declared.iter().any(|p| &p.name == name) {
            return Err(EngineError::UnknownParameter(name.clone()));
        }
    }

    let mut bound = BTreeMap::new();
    for param in declared {
        let value = match overrides.get(&param.name) {
            Some(supplied) => checked_value(param, supplied)?,
            None => default_value(param),
        };
        bound.insert(param.name.clone(), value);
    }

    Ok(bound)
}

fn checked_value(param: &Parameter, supplied: &str) -> EngineResult<String> {
    match param.param_type {
        ParameterType::Choice => {
            let allowed: Vec<String> = param.values.iter().map(yaml_to_string).collect();
            if allowed.iter().any(|v| v == supplied) {
                Ok(supplied.to_string())
            } else {
                Err(EngineError::InvalidParameterValue {
                    name: param.name.clone(),
                    value: supplied.to_string(),
                    reason: format!("expected one of: {}", allowed.join(", ")),
                })
            }
        }
        ParameterType::Boolean => match supplied {
            "true" | "false" => Ok(supplied.to_string()),
            _ => Err(EngineError::InvalidParameterValue {
                name: param.name.clone(),
                value: supplied.to_string(),
                reason: "expected 'true' or 'false'".to_string(),
            }),
        },
        ParameterType::String | ParameterType::File => Ok(supplied.to_string()),
    }
}

fn default_value(param: &Parameter) -> String {
    if let Some(default) = &param.default {
        return yaml_to_string(default);
    }
    match param.param_type {
        // A choice with no explicit default falls back to its first value
        ParameterType::Choice => param.values.first().map(yaml_to_string).unwrap_or_default(),
        ParameterType::Boolean => "false".to_string(),
        ParameterType::String | ParameterType::File => String::new(),
    }
}

/// Render a YAML scalar the way it reaches a step's environment. Validation
/// and binding both compare choice values through this, so `default: 3` and
/// `values: ["3"]` agree.
pub(crate) fn yaml_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
