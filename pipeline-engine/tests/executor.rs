// Executor integration tests
// Drive real pipelines against a temp workspace and assert ordering,
// halt-on-failure, and post-action semantics.

use pipeline_engine::{
    progress_channel, ExecutionContext, ExecutionEvent, PipelineExecutor, PipelineParser,
    StageStatus, StepStatus,
};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn context_for(dir: &TempDir, name: &str) -> ExecutionContext {
    ExecutionContext::new(name.to_string(), dir.path().to_string_lossy().to_string())
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn stages_run_in_declared_order() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: ordered
stages:
  - stage: Setup
    steps:
      - name: Mark
        command: echo setup >> order.txt
  - stage: Middle
    steps:
      - name: Mark
        command: echo middle >> order.txt
  - stage: Finish
    steps:
      - name: Mark
        command: echo finish >> order.txt
"#,
    )
    .unwrap();

    let executor = PipelineExecutor::new(pipeline);
    let result = executor
        .execute(context_for(&workspace, "ordered"), BTreeMap::new())
        .await;

    assert!(result.success);
    assert_eq!(result.stages.len(), 3);
    assert!(result.stages.iter().all(|s| s.status == StageStatus::Success));
    assert_eq!(
        read_lines(&workspace.path().join("order.txt")),
        vec!["setup", "middle", "finish"]
    );
}

#[tokio::test]
async fn failing_stage_halts_and_skips_later_stages() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: halting
stages:
  - stage: First
    steps:
      - name: Mark
        command: echo first >> order.txt
  - stage: Breaks
    steps:
      - name: Boom
        command: exit 1
  - stage: Never
    steps:
      - name: Mark
        command: echo never >> order.txt
post:
  failure:
    - name: Notify
      echo: Pipeline failed
"#,
    )
    .unwrap();

    let executor = PipelineExecutor::new(pipeline);
    let result = executor
        .execute(context_for(&workspace, "halting"), BTreeMap::new())
        .await;

    assert!(!result.success);
    assert_eq!(result.stages[0].status, StageStatus::Success);
    assert_eq!(result.stages[1].status, StageStatus::Failed);
    assert_eq!(result.stages[2].status, StageStatus::Skipped);
    assert!(result.stages[2].steps.is_empty());
    assert_eq!(read_lines(&workspace.path().join("order.txt")), vec!["first"]);

    // The failure post step ran
    assert_eq!(result.post.len(), 1);
    assert_eq!(result.post[0].step_name, "Notify");
    assert_eq!(result.post[0].status, StepStatus::Success);
    assert_eq!(result.post[0].output, "Pipeline failed");
}

#[tokio::test]
async fn success_post_steps_run_after_green_run() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: green
stages:
  - stage: Only
    steps:
      - name: Ok
        command: "true"
post:
  always:
    - name: Cleanup hook
      echo: always ran
  success:
    - name: Notify
      echo: Pipeline completed successfully
  failure:
    - name: Notify
      echo: Pipeline failed
"#,
    )
    .unwrap();

    let executor = PipelineExecutor::new(pipeline);
    let result = executor
        .execute(context_for(&workspace, "green"), BTreeMap::new())
        .await;

    assert!(result.success);
    let outputs: Vec<&str> = result.post.iter().map(|r| r.output.as_str()).collect();
    assert_eq!(outputs, vec!["always ran", "Pipeline completed successfully"]);
}

#[tokio::test]
async fn cleanup_runs_exactly_once_after_any_outcome() {
    for failing in [false, true] {
        let workspace = TempDir::new().unwrap();
        fs::write(workspace.path().join("leftover.txt"), "stale").unwrap();

        let yaml = format!(
            r#"
name: cleaning
stages:
  - stage: Only
    steps:
      - name: Work
        command: "{}"
post:
  clean_workspace: true
"#,
            if failing { "exit 7" } else { "true" }
        );
        let pipeline = PipelineParser::from_str(&yaml).unwrap();

        let (tx, mut rx) = progress_channel();
        let executor = PipelineExecutor::new(pipeline).with_progress(tx);
        let result = executor
            .execute(context_for(&workspace, "cleaning"), BTreeMap::new())
            .await;
        drop(executor);

        assert_eq!(result.success, !failing);
        assert!(workspace.path().is_dir());
        assert_eq!(fs::read_dir(workspace.path()).unwrap().count(), 0);

        let mut cleaned = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, ExecutionEvent::WorkspaceCleaned { .. }) {
                cleaned += 1;
            }
        }
        assert_eq!(cleaned, 1);
    }
}

#[tokio::test]
async fn continue_on_error_keeps_the_stage_going() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: tolerant
stages:
  - stage: Only
    steps:
      - name: Flaky
        command: exit 1
        continue_on_error: true
      - name: Mark
        command: echo reached >> order.txt
"#,
    )
    .unwrap();

    let executor = PipelineExecutor::new(pipeline);
    let result = executor
        .execute(context_for(&workspace, "tolerant"), BTreeMap::new())
        .await;

    assert!(result.success);
    assert_eq!(result.stages[0].status, StageStatus::Success);
    assert_eq!(result.stages[0].steps[0].status, StepStatus::Failed);
    assert_eq!(
        read_lines(&workspace.path().join("order.txt")),
        vec!["reached"]
    );
}

#[tokio::test]
async fn failing_post_step_marks_the_run_failed() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: bad-notify
stages:
  - stage: Only
    steps:
      - name: Ok
        command: "true"
post:
  success:
    - name: Broken notifier
      command: exit 3
"#,
    )
    .unwrap();

    let executor = PipelineExecutor::new(pipeline);
    let result = executor
        .execute(context_for(&workspace, "bad-notify"), BTreeMap::new())
        .await;

    assert!(!result.success);
    assert!(result.stages.iter().all(|s| s.status == StageStatus::Success));
    assert_eq!(result.post[0].status, StepStatus::Failed);
    assert_eq!(result.post[0].exit_code, Some(3));
}

#[tokio::test]
async fn bound_parameters_reach_the_step_environment() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: env-check
parameters:
  - name: MAX_PARALLEL
    type: choice
    values: ["5", "3", "1"]
stages:
  - stage: Only
    steps:
      - name: Dump
        command: echo "max=$MAX_PARALLEL" >> env.txt
"#,
    )
    .unwrap();

    let params = pipeline_engine::bind_parameters(
        &pipeline.parameters,
        &std::collections::HashMap::new(),
    )
    .unwrap();

    let executor = PipelineExecutor::new(pipeline);
    let result = executor
        .execute(context_for(&workspace, "env-check"), params)
        .await;

    assert!(result.success);
    assert_eq!(read_lines(&workspace.path().join("env.txt")), vec!["max=5"]);
}

#[tokio::test]
async fn event_stream_brackets_the_run() {
    let workspace = TempDir::new().unwrap();
    let pipeline = PipelineParser::from_str(
        r#"
name: eventful
stages:
  - stage: Only
    steps:
      - name: Say
        echo: hello
"#,
    )
    .unwrap();

    let (tx, mut rx) = progress_channel();
    let executor = PipelineExecutor::new(pipeline).with_progress(tx);
    executor
        .execute(context_for(&workspace, "eventful"), BTreeMap::new())
        .await;
    drop(executor);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(matches!(events.first(), Some(ExecutionEvent::PipelineStarted { .. })));
    assert!(matches!(
        events.last(),
        Some(ExecutionEvent::PipelineCompleted { success: true, .. })
    ));
    assert!(events.iter().any(|e| matches!(
        e,
        ExecutionEvent::StepOutput { output, .. } if output == "hello"
    )));
}
