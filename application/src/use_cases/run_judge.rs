//! Run Judge use case
//!
//! Calls the engine once more with a comparison request over all branch
//! results and recovers a structured decision from whatever it answers.
//! Judge failures are reported on [`JudgeRun`], never as an `Err`, so the
//! branch results they accompany are always delivered.

use crate::ports::execution_engine::ExecutionEngine;
use crate::ports::progress::{MultiverseProgressNotifier, NoProgress};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use multiverse_domain::{
    BranchResult, ExecutionReport, JudgeDecision, build_judge_request, parse_judge_decision,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of the judge step
#[derive(Debug, Clone, Serialize)]
pub struct JudgeRun {
    pub spec: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ExecutionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present only when the answer parsed into a meaningful decision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<JudgeDecision>,
    /// Final-stage output of the judge; shown verbatim when no decision parsed
    pub raw_output: String,
}

impl JudgeRun {
    fn failed(spec: &str, error: impl Into<String>) -> Self {
        Self {
            spec: spec.to_string(),
            report: None,
            error: Some(error.into()),
            decision: None,
            raw_output: String::new(),
        }
    }
}

/// Use case for judging branch results
pub struct RunJudgeUseCase<E: ExecutionEngine + 'static> {
    engine: Arc<E>,
    run_logger: Arc<dyn RunLogger>,
}

impl<E: ExecutionEngine + 'static> RunJudgeUseCase<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            run_logger: Arc::new(NoRunLogger),
        }
    }

    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    pub async fn execute(
        &self,
        judge_spec: &str,
        source_spec: &str,
        source_input: &str,
        branches: &[BranchResult],
        max_chars_per_branch: usize,
    ) -> JudgeRun {
        self.execute_with_progress(
            judge_spec,
            source_spec,
            source_input,
            branches,
            max_chars_per_branch,
            &NoProgress,
        )
        .await
    }

    pub async fn execute_with_progress(
        &self,
        judge_spec: &str,
        source_spec: &str,
        source_input: &str,
        branches: &[BranchResult],
        max_chars_per_branch: usize,
        progress: &dyn MultiverseProgressNotifier,
    ) -> JudgeRun {
        let spec = judge_spec.trim();
        if spec.is_empty() {
            return JudgeRun::failed(spec, "judge spec is empty");
        }

        info!("Judging {} branches with {}", branches.len(), spec);
        progress.on_judge_start(spec);

        let request = build_judge_request(source_spec, source_input, branches, max_chars_per_branch);
        let judge = match self.engine.run(spec, &request).await {
            Ok(report) => {
                let raw_output = report.last_output().unwrap_or_default().to_string();
                let decision = parse_judge_decision(&raw_output);
                if decision.is_none() && !raw_output.is_empty() {
                    info!("Judge output had no structured decision; keeping raw text");
                }
                JudgeRun {
                    spec: spec.to_string(),
                    report: Some(report),
                    error: None,
                    decision,
                    raw_output,
                }
            }
            Err(e) => {
                warn!("Judge {} failed: {}", spec, e);
                JudgeRun::failed(spec, e.to_string())
            }
        };

        progress.on_judge_complete(judge.error.is_none());
        self.run_logger.log(RunEvent::new(
            "judge_complete",
            serde_json::json!({
                "spec": judge.spec,
                "error": judge.error,
                "winner": judge.decision.as_ref().map(|d| d.winner.as_str()),
                "format": judge.decision.as_ref().map(|d| d.format.as_str()),
            }),
        ));
        judge
    }
}
