use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A declarative pipeline definition: invocation-time parameters, ordered
/// stages, and post-actions that run after the stages regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub post: Post,
}

/// A named input value supplied when the pipeline is invoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    /// Path to a file supplied by the caller
    File,
    /// One value out of the declared `values` list
    Choice,
    Boolean,
}

/// A named, ordered unit of pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub stage: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    #[serde(flatten)]
    pub action: StepAction,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub continue_on_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    /// Single command line run through the platform shell
    Command(String),
    /// Multi-line script, optionally with an explicit shell
    Shell {
        shell: Option<String>,
        script: String,
    },
    /// Log-only step: prints the message, never spawns a process
    Echo(String),
}

/// Steps guaranteed to run after all stages, plus workspace cleanup.
/// `always` runs first on every outcome, then `success` or `failure`
/// depending on how the stages ended.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub always: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub success: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure: Vec<Step>,
    #[serde(default)]
    pub clean_workspace: bool,
}

impl Post {
    pub fn is_empty(&self) -> bool {
        self.always.is_empty()
            && self.success.is_empty()
            && self.failure.is_empty()
            && !self.clean_workspace
    }
}

#[derive(Debug, Clone)]
pub struct StepResult {
    pub step_name: String,
    pub status: StepStatus,
    pub output: String,
    pub error: Option<String>,
    pub duration: Duration,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage_name: String,
    pub status: StageStatus,
    pub steps: Vec<StepResult>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub pipeline_name: String,
    pub env: HashMap<String, String>,
    pub working_dir: String,
    pub stage_name: Option<String>,
}

impl ExecutionContext {
    pub fn new(pipeline_name: String, working_dir: String) -> Self {
        Self {
            pipeline_name,
            env: HashMap::new(),
            working_dir,
            stage_name: None,
        }
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_stage(mut self, stage_name: String) -> Self {
        self.stage_name = Some(stage_name);
        self
    }
}

impl Pipeline {
    /// Total number of stage steps (post steps not included)
    pub fn step_count(&self) -> usize {
        self.stages.iter().map(|s| s.steps.len()).sum()
    }

    pub fn find_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
