//! Execution engine port
//!
//! The single-branch engine turns one (spec, input) pair into a report of
//! per-stage agent results. It owns its own internal stage scheduling; this
//! crate only calls it once per universe and once more for the judge.

use async_trait::async_trait;
use multiverse_domain::{ExecutionPlan, ExecutionReport, PlannedTask};
use thiserror::Error;

/// Errors returned by an execution engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Plan returned by [`ExecutionEngine::plan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePlan {
    pub plan: ExecutionPlan,
    pub tasks: Vec<PlannedTask>,
}

/// Single-branch execution engine
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Describe what `run` would execute, without executing it
    async fn plan(&self, spec: &str, input: &str) -> Result<EnginePlan, EngineError>;

    /// Execute `spec` against `input`
    async fn run(&self, spec: &str, input: &str) -> Result<ExecutionReport, EngineError>;
}
