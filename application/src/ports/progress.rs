//! Progress notification port
//!
//! Defines the interface for reporting progress during a multiverse run.

use multiverse_domain::{BranchResult, Universe};

/// Callback for progress updates during a multiverse run
///
/// Implementations live in the presentation layer. Callbacks may arrive
/// from the coordinator while workers are still running.
pub trait MultiverseProgressNotifier: Send + Sync {
    /// Called once, before any universe starts
    fn on_run_start(&self, total: usize);

    /// Called when a universe is handed to a worker
    fn on_branch_start(&self, universe: &Universe);

    /// Called when a universe's result has been recorded
    fn on_branch_complete(&self, branch: &BranchResult);

    /// Called once all universes have completed
    fn on_run_complete(&self, _branches: &[BranchResult]) {}

    /// Called when the judge call starts
    fn on_judge_start(&self, _spec: &str) {}

    /// Called when the judge call returns
    fn on_judge_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl MultiverseProgressNotifier for NoProgress {
    fn on_run_start(&self, _total: usize) {}
    fn on_branch_start(&self, _universe: &Universe) {}
    fn on_branch_complete(&self, _branch: &BranchResult) {}
}
