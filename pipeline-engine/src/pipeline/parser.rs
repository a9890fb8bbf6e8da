use crate::pipeline::models::Pipeline;
use crate::{EngineError, EngineResult};
use std::fs;
use std::path::Path;

/// Loads pipeline definitions from YAML
pub struct PipelineParser;

impl PipelineParser {
    /// Parse a definition file. Parse errors carry the file path so a
    /// failure in a multi-pipeline setup names the offending file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Pipeline> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_str(&content).map_err(|err| match err {
            EngineError::Definition(source) => EngineError::InvalidDefinition {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_str(content: &str) -> EngineResult<Pipeline> {
        let pipeline: Pipeline = serde_yaml::from_str(content)?;
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::models::{ParameterType, StepAction};

    #[test]
    fn test_parse_simple_pipeline() {
        let yaml = r#"
name: test-pipeline
stages:
  - stage: Build
    steps:
      - name: Compile
        command: make
  - stage: Package
    steps:
      - name: Archive
        command: tar czf out.tgz build/
"#;
        let pipeline = PipelineParser::from_str(yaml).unwrap();
        assert_eq!(pipeline.name, "test-pipeline");
        assert_eq!(pipeline.stages.len(), 2);
        assert_eq!(pipeline.stages[0].stage, "Build");
        assert!(pipeline.post.is_empty());
    }

    #[test]
    fn test_parse_parameters() {
        let yaml = r#"
name: test-pipeline
parameters:
  - name: MAX_PARALLEL
    type: choice
    values: ["5", "3", "1"]
  - name: SKIP_DB_UPDATE
    type: boolean
    default: false
  - name: SITES_CONFIG
    type: file
stages:
  - stage: Only
    steps:
      - name: Noop
        echo: hello
"#;
        let pipeline = PipelineParser::from_str(yaml).unwrap();
        assert_eq!(pipeline.parameters.len(), 3);
        assert_eq!(pipeline.parameters[0].param_type, ParameterType::Choice);
        assert_eq!(pipeline.parameters[0].values.len(), 3);
        assert_eq!(pipeline.parameters[1].param_type, ParameterType::Boolean);
        assert_eq!(pipeline.parameters[2].param_type, ParameterType::File);
    }

    #[test]
    fn test_parse_post_section() {
        let yaml = r#"
name: test-pipeline
stages:
  - stage: Only
    steps:
      - name: Noop
        echo: hello
post:
  clean_workspace: true
  success:
    - name: Notify
      echo: Pipeline completed successfully
  failure:
    - name: Notify
      echo: Pipeline failed
"#;
        let pipeline = PipelineParser::from_str(yaml).unwrap();
        assert!(pipeline.post.clean_workspace);
        assert_eq!(pipeline.post.success.len(), 1);
        assert_eq!(pipeline.post.failure.len(), 1);
        assert!(pipeline.post.always.is_empty());
    }

    #[test]
    fn test_parse_shell_script_step() {
        let yaml = r#"
name: test-pipeline
stages:
  - stage: Only
    steps:
      - name: Multi-line script
        shell:
          shell: bash
          script: |
            echo one
            echo two
"#;
        let pipeline = PipelineParser::from_str(yaml).unwrap();
        match &pipeline.stages[0].steps[0].action {
            StepAction::Shell { shell, script } => {
                assert_eq!(shell.as_deref(), Some("bash"));
                assert!(script.contains("echo two"));
            }
            other => panic!("expected shell step, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PipelineParser::from_str("stages: {not: [valid").is_err());
    }

    #[test]
    fn test_from_file_names_the_offending_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        std::fs::write(&path, "stages: {not: [valid").unwrap();

        let err = PipelineParser::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.yml"));
    }
}
