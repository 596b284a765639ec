//! Run Multiverse use case
//!
//! Executes every universe of a plan exactly once, honoring dependency order
//! and running every ready universe in parallel.
//!
//! One coordinator owns the loop; each universe gets a short-lived worker
//! spawned when its last dependency completes. Shared bookkeeping lives in a
//! single [`SchedulerState`] behind one mutex, which is never held across an
//! engine call. Workers compile their input from a snapshot taken under the
//! lock at start time.

use crate::ports::execution_engine::ExecutionEngine;
use crate::ports::progress::{MultiverseProgressNotifier, NoProgress};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use multiverse_domain::{
    BranchResult, DomainError, OrchestrationPlan, Universe, compile_universe_input,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a multiverse run
#[derive(Error, Debug)]
pub enum RunMultiverseError {
    #[error("Invalid multiverse configuration: {0}")]
    Plan(#[from] DomainError),

    #[error("Multiverse run cancelled ({completed}/{total} universes completed)")]
    Cancelled { completed: usize, total: usize },
}

impl RunMultiverseError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunMultiverseError::Cancelled { .. })
    }
}

/// Result of a completed multiverse run
#[derive(Debug, Clone, Serialize)]
pub struct MultiverseRun {
    pub plan: OrchestrationPlan,
    /// One entry per universe, in declaration order
    pub branches: Vec<BranchResult>,
}

/// Bookkeeping shared between the coordinator and worker start-up
struct SchedulerState {
    results: Vec<Option<BranchResult>>,
    started: Vec<bool>,
    done: Vec<bool>,
    remaining: Vec<usize>,
}

impl SchedulerState {
    fn new(plan: &OrchestrationPlan) -> Self {
        let n = plan.len();
        Self {
            results: vec![None; n],
            started: vec![false; n],
            done: vec![false; n],
            remaining: plan.indegrees(),
        }
    }
}

/// Message a worker sends back when its universe finishes
struct Completion {
    index: usize,
    branch: BranchResult,
}

/// Use case for running a multiverse
pub struct RunMultiverseUseCase<E: ExecutionEngine + 'static> {
    engine: Arc<E>,
    cancellation_token: Option<CancellationToken>,
    run_logger: Arc<dyn RunLogger>,
}

impl<E: ExecutionEngine + 'static> RunMultiverseUseCase<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            cancellation_token: None,
            run_logger: Arc::new(NoRunLogger),
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Set a structured run logger
    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, universes: &[Universe]) -> Result<MultiverseRun, RunMultiverseError> {
        self.execute_with_progress(universes, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        universes: &[Universe],
        progress: &dyn MultiverseProgressNotifier,
    ) -> Result<MultiverseRun, RunMultiverseError> {
        let plan = Arc::new(OrchestrationPlan::build(universes)?);
        let total = plan.len();
        self.check_cancelled(0, total)?;

        info!(
            "Starting multiverse run with {} universes (scheduler={}, handoffs={})",
            total,
            plan.scheduler,
            plan.handoffs.len()
        );
        progress.on_run_start(total);

        let state = Arc::new(Mutex::new(SchedulerState::new(&plan)));
        let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

        for index in plan.roots() {
            self.start_universe(index, &plan, &state, &tx, progress);
        }

        let mut completed = 0;
        while completed < total {
            let message = match &self.cancellation_token {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        warn!("Multiverse run cancelled after {}/{} universes", completed, total);
                        return Err(RunMultiverseError::Cancelled { completed, total });
                    }
                    message = rx.recv() => message,
                },
                None => rx.recv().await,
            };
            // The coordinator keeps a sender alive, so the channel never closes.
            let Some(Completion { index, branch }) = message else {
                break;
            };
            completed += 1;

            let ready = {
                let mut guard = lock(&state);
                let state = &mut *guard;
                state.results[index] = Some(branch.clone());
                state.done[index] = true;
                let mut ready = Vec::new();
                for &dependent in plan.dependents(index) {
                    state.remaining[dependent] = state.remaining[dependent].saturating_sub(1);
                    if state.remaining[dependent] == 0 && !state.started[dependent] {
                        ready.push(dependent);
                    }
                }
                ready
            };

            self.record_completion(&branch, completed, total);
            progress.on_branch_complete(&branch);

            for dependent in ready {
                debug!("Universe {} is ready", plan.universes()[dependent].display_name());
                self.start_universe(dependent, &plan, &state, &tx, progress);
            }
        }

        let state = lock(&state);
        let mut branches: Vec<BranchResult> = state.results.iter().flatten().cloned().collect();
        branches.sort_by_key(|b| b.universe.index);
        drop(state);

        info!(
            "Multiverse run complete: {} ok, {} failed",
            branches.iter().filter(|b| b.is_ok()).count(),
            branches.iter().filter(|b| !b.is_ok()).count()
        );
        progress.on_run_complete(&branches);
        self.run_logger.log(RunEvent::new(
            "run_complete",
            serde_json::json!({
                "universes": total,
                "scheduler": plan.scheduler.as_str(),
                "failed": branches.iter().filter(|b| !b.is_ok()).count(),
            }),
        ));

        let plan = Arc::try_unwrap(plan).unwrap_or_else(|shared| (*shared).clone());
        Ok(MultiverseRun { plan, branches })
    }

    fn check_cancelled(&self, completed: usize, total: usize) -> Result<(), RunMultiverseError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunMultiverseError::Cancelled { completed, total });
        }
        Ok(())
    }

    /// Snapshot under the lock, then hand the universe to a new worker.
    fn start_universe(
        &self,
        index: usize,
        plan: &Arc<OrchestrationPlan>,
        state: &Arc<Mutex<SchedulerState>>,
        tx: &mpsc::UnboundedSender<Completion>,
        progress: &dyn MultiverseProgressNotifier,
    ) {
        let (done, results) = {
            let mut state = lock(state);
            state.started[index] = true;
            (state.done.clone(), state.results.clone())
        };

        let universe = plan.universes()[index].clone();
        debug!("Starting universe {}", universe.display_name());
        progress.on_branch_start(&universe);
        self.run_logger.log(RunEvent::new(
            "branch_start",
            serde_json::json!({
                "id": universe.id,
                "label": universe.label(),
                "index": index,
                "spec": universe.spec,
                "upstream": plan.indegree(index),
            }),
        ));

        let engine = Arc::clone(&self.engine);
        let plan = Arc::clone(plan);
        let tx = tx.clone();
        tokio::spawn(async move {
            let fallback = universe.clone();
            let started = Instant::now();
            let worker = tokio::spawn(run_branch(engine, plan, universe, done, results));
            let branch = match worker.await {
                Ok(branch) => branch,
                Err(e) => {
                    let reason = if e.is_panic() { "worker panicked" } else { "worker aborted" };
                    BranchResult::failure(fallback, reason, elapsed_ms(started))
                }
            };
            // The coordinator may have stopped listening after a cancellation.
            let _ = tx.send(Completion { index, branch });
        });
    }

    fn record_completion(&self, branch: &BranchResult, completed: usize, total: usize) {
        let name = branch.universe.display_name();
        match branch.error.as_deref() {
            None => info!(
                "Universe {} completed in {}ms ({}/{})",
                name, branch.duration_ms, completed, total
            ),
            Some(err) => warn!("Universe {} failed: {} ({}/{})", name, err, completed, total),
        }
        self.run_logger.log(RunEvent::new(
            "branch_complete",
            serde_json::json!({
                "id": branch.universe.id,
                "status": branch.status(),
                "error": branch.error,
                "duration_ms": branch.duration_ms,
                "incoming_channels": branch.incoming_channels,
                "incoming_contributions": branch.incoming_contributions,
            }),
        ));
    }
}

/// Worker body: compile input from the snapshot, then call the engine once.
async fn run_branch<E: ExecutionEngine + 'static>(
    engine: Arc<E>,
    plan: Arc<OrchestrationPlan>,
    universe: Universe,
    done: Vec<bool>,
    results: Vec<Option<BranchResult>>,
) -> BranchResult {
    let compiled = compile_universe_input(&plan, &universe, &done, &results);
    if compiled.contributions > 0 {
        debug!(
            "Universe {} input compiled from {} channel(s)",
            universe.display_name(),
            compiled.contributions
        );
    }

    let started = Instant::now();
    let outcome = engine.run(&universe.spec, &compiled.input).await;
    let duration_ms = elapsed_ms(started);

    let branch = match outcome {
        Ok(report) => BranchResult::success(universe, report, duration_ms),
        Err(e) => BranchResult::failure(universe, e.to_string(), duration_ms),
    };
    branch.with_incoming(compiled.channels, compiled.contributions, compiled.note)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn lock(state: &Mutex<SchedulerState>) -> MutexGuard<'_, SchedulerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
