// Contract tests for the shipped site-deployment pipeline definition.
// These pin the observable behavior of pipelines/deploy-sites.yml: fixed
// stage order, the hardcoded spreadsheet path, and parameter-invariant
// commands.

use pipeline_engine::{
    bind_parameters, ExecutionPlan, ParameterType, PipelineParser, PipelineValidator,
};

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

fn deploy_pipeline() -> pipeline_engine::Pipeline {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../pipelines/deploy-sites.yml");
    PipelineParser::from_file(path).unwrap()
}

fn bind(overrides: &[(&str, &str)]) -> BTreeMap<String, String> {
    let pipeline = deploy_pipeline();
    let overrides: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    bind_parameters(&pipeline.parameters, &overrides).unwrap()
}

#[test]
fn definition_is_valid() {
    let pipeline = deploy_pipeline();
    PipelineValidator::validate(&pipeline).unwrap();
}

#[test]
fn exactly_four_stages_in_fixed_order() {
    let pipeline = deploy_pipeline();
    let stages: Vec<&str> = pipeline.stages.iter().map(|s| s.stage.as_str()).collect();
    assert_eq!(
        stages,
        vec!["Setup", "Read Configuration", "SVN Operations", "Deploy Sites"]
    );
}

#[test]
fn declares_the_three_invocation_parameters() {
    let pipeline = deploy_pipeline();

    let sites = pipeline.find_parameter("SITES_CONFIG").unwrap();
    assert_eq!(sites.param_type, ParameterType::File);

    let parallel = pipeline.find_parameter("MAX_PARALLEL").unwrap();
    assert_eq!(parallel.param_type, ParameterType::Choice);
    let values: Vec<String> = parallel
        .values
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["5", "3", "1"]);

    let skip = pipeline.find_parameter("SKIP_DB_UPDATE").unwrap();
    assert_eq!(skip.param_type, ParameterType::Boolean);
}

#[test]
fn defaults_bind_without_any_input() {
    let bound = bind(&[]);
    assert_eq!(bound.get("SITES_CONFIG").unwrap(), "");
    assert_eq!(bound.get("MAX_PARALLEL").unwrap(), "5");
    assert_eq!(bound.get("SKIP_DB_UPDATE").unwrap(), "false");
}

#[test]
fn config_reader_always_gets_the_hardcoded_spreadsheet_path() {
    let pipeline = deploy_pipeline();

    // Even with an uploaded spreadsheet bound, the invocation keeps the
    // fixed path.
    let bound = bind(&[("SITES_CONFIG", "uploads/sites_v2.xlsx")]);
    let plan = ExecutionPlan::for_pipeline(&pipeline, &bound);

    let reader = plan
        .steps
        .iter()
        .find(|s| s.stage == "Read Configuration" && s.command.is_some())
        .unwrap();
    assert_eq!(
        reader.command.as_deref(),
        Some("python config_reader.py config/sites_config.xlsx")
    );
}

#[test]
fn plan_is_identical_across_all_parameter_values() {
    let pipeline = deploy_pipeline();
    let baseline = ExecutionPlan::for_pipeline(&pipeline, &bind(&[]));

    for parallel in ["5", "3", "1"] {
        for skip in ["true", "false"] {
            let bound = bind(&[("MAX_PARALLEL", parallel), ("SKIP_DB_UPDATE", skip)]);
            let plan = ExecutionPlan::for_pipeline(&pipeline, &bound);
            assert_eq!(plan.commands(), baseline.commands());
            assert_eq!(plan.steps, baseline.steps);
        }
    }
}

#[test]
fn each_stage_invokes_at_most_one_collaborator() {
    let pipeline = deploy_pipeline();
    let plan = ExecutionPlan::for_pipeline(&pipeline, &BTreeMap::new());

    let collaborators: Vec<&str> = plan.commands();
    assert_eq!(
        collaborators,
        vec![
            "python config_reader.py config/sites_config.xlsx",
            "python test_svn_manager.py",
            "python test_deployment.py",
        ]
    );
}

#[test]
fn post_actions_clean_and_notify() {
    let pipeline = deploy_pipeline();
    assert!(pipeline.post.clean_workspace);
    assert_eq!(pipeline.post.success.len(), 1);
    assert_eq!(pipeline.post.failure.len(), 1);
    assert!(pipeline.post.always.is_empty());
}
