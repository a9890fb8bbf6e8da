// Pipeline Executor
// Runs stages strictly in declaration order on a single worker, then the
// post-actions exactly once regardless of how the stages ended.

use crate::execution::events::{EventSender, ExecutionEvent, PostPhase, ProgressSender};
use crate::pipeline::models::{
    ExecutionContext, Pipeline, Stage, StageResult, StageStatus, Step, StepResult, StepStatus,
};
use crate::runners::{Runner, ShellRunner};
use crate::workspace;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Per-stage results, in declaration order (skipped stages included)
    pub stages: Vec<StageResult>,
    /// Results of the post-action steps that ran
    pub post: Vec<StepResult>,
    /// Overall outcome: all stages succeeded and no post step failed
    pub success: bool,
    /// Total duration, post-actions included
    pub duration: Duration,
}

pub struct PipelineExecutor {
    pipeline: Pipeline,
    event_tx: Option<ProgressSender>,
    runner: ShellRunner,
}

impl PipelineExecutor {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            event_tx: None,
            runner: ShellRunner::new(),
        }
    }

    /// Set progress event sender
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Execute the pipeline. `params` are the bound parameter values from
    /// `bind_parameters`; they are published to every step's environment.
    pub async fn execute(
        &self,
        context: ExecutionContext,
        params: BTreeMap<String, String>,
    ) -> ExecutionResult {
        let start = Instant::now();

        let mut base_context = context;
        base_context.env.extend(self.pipeline.env.clone());
        base_context.env.extend(params);

        self.event_tx.send_event(ExecutionEvent::pipeline_started(
            self.pipeline.name.clone(),
            self.pipeline.stages.len(),
        ));

        let mut stage_results = Vec::new();
        let mut failed_stage: Option<String> = None;

        for stage in &self.pipeline.stages {
            if let Some(failed) = &failed_stage {
                self.event_tx.send_event(ExecutionEvent::stage_skipped(
                    stage.stage.clone(),
                    format!("stage '{}' failed", failed),
                ));
                stage_results.push(StageResult {
                    stage_name: stage.stage.clone(),
                    status: StageStatus::Skipped,
                    steps: vec![],
                    duration: Duration::from_secs(0),
                });
                continue;
            }

            let result = self.execute_stage(stage, &base_context).await;
            if result.status == StageStatus::Failed {
                failed_stage = Some(stage.stage.clone());
            }
            stage_results.push(result);
        }

        let stages_succeeded = failed_stage.is_none();
        let (post_results, post_failed) = self.execute_post(&base_context, stages_succeeded).await;

        let success = stages_succeeded && !post_failed;
        let duration = start.elapsed();

        self.event_tx.send_event(ExecutionEvent::pipeline_completed(
            self.pipeline.name.clone(),
            success,
            duration,
        ));

        ExecutionResult {
            stages: stage_results,
            post: post_results,
            success,
            duration,
        }
    }

    async fn execute_stage(&self, stage: &Stage, context: &ExecutionContext) -> StageResult {
        let start = Instant::now();

        self.event_tx.send_event(ExecutionEvent::stage_started(
            stage.stage.clone(),
            stage.display_name.clone(),
            stage.steps.len(),
        ));

        let mut stage_context = context.clone().with_stage(stage.stage.clone());
        stage_context.env.extend(stage.env.clone());

        let (steps, failed) = self.execute_steps(&stage.steps, &stage_context).await;

        let status = if failed {
            StageStatus::Failed
        } else {
            StageStatus::Success
        };

        let result = StageResult {
            stage_name: stage.stage.clone(),
            status,
            steps,
            duration: start.elapsed(),
        };

        self.event_tx.send_event(ExecutionEvent::stage_completed(
            stage.stage.clone(),
            status,
            result.duration,
        ));

        result
    }

    /// Run steps sequentially; stop at the first failure unless the failing
    /// step is marked `continue_on_error`.
    async fn execute_steps(
        &self,
        steps: &[Step],
        context: &ExecutionContext,
    ) -> (Vec<StepResult>, bool) {
        let stage_name = context.stage_name.clone().unwrap_or_default();
        let mut results = Vec::new();
        let mut failed = false;

        for (index, step) in steps.iter().enumerate() {
            self.event_tx.send_event(ExecutionEvent::step_started(
                stage_name.clone(),
                step.name.clone(),
                index,
            ));

            let mut step_context = context.clone();
            step_context.env.extend(step.env.clone());

            let result = self
                .runner
                .run(step, &step_context, index, self.event_tx.as_ref())
                .await;

            self.event_tx.send_event(ExecutionEvent::StepCompleted {
                stage_name: stage_name.clone(),
                step_name: step.name.clone(),
                step_index: index,
                status: result.status,
                duration: result.duration,
                exit_code: result.exit_code,
            });

            let should_continue = result.status == StepStatus::Success || step.continue_on_error;
            results.push(result);

            if !should_continue {
                failed = true;
                break;
            }
        }

        (results, failed)
    }

    /// Post-actions: `always` steps, then `success` or `failure` steps
    /// depending on the stage outcome, then workspace cleanup.
    async fn execute_post(
        &self,
        context: &ExecutionContext,
        stages_succeeded: bool,
    ) -> (Vec<StepResult>, bool) {
        let mut results = Vec::new();
        let mut failed = false;

        let (always_results, always_failed) = self
            .execute_post_phase(PostPhase::Always, &self.pipeline.post.always, context)
            .await;
        results.extend(always_results);
        failed |= always_failed;

        let (phase, steps) = if stages_succeeded {
            (PostPhase::Success, &self.pipeline.post.success)
        } else {
            (PostPhase::Failure, &self.pipeline.post.failure)
        };
        let (phase_results, phase_failed) = self.execute_post_phase(phase, steps, context).await;
        results.extend(phase_results);
        failed |= phase_failed;

        if self.pipeline.post.clean_workspace {
            match workspace::clean_workspace(Path::new(&context.working_dir)) {
                Ok(()) => {
                    self.event_tx.send_event(ExecutionEvent::WorkspaceCleaned {
                        path: context.working_dir.clone(),
                    });
                }
                Err(e) => {
                    self.event_tx.send_event(ExecutionEvent::error(format!(
                        "workspace cleanup failed: {}",
                        e
                    )));
                    results.push(StepResult {
                        step_name: "clean workspace".to_string(),
                        status: StepStatus::Failed,
                        output: String::new(),
                        error: Some(e.to_string()),
                        duration: Duration::from_secs(0),
                        exit_code: None,
                    });
                    failed = true;
                }
            }
        }

        (results, failed)
    }

    async fn execute_post_phase(
        &self,
        phase: PostPhase,
        steps: &[Step],
        context: &ExecutionContext,
    ) -> (Vec<StepResult>, bool) {
        if steps.is_empty() {
            return (Vec::new(), false);
        }

        self.event_tx.send_event(ExecutionEvent::PostStarted {
            phase,
            total_steps: steps.len(),
        });

        let post_context = context.clone().with_stage(format!("post:{}", phase));
        self.execute_steps(steps, &post_context).await
    }
}
