//! Application layer for multiverse
//!
//! This crate contains use cases, port definitions, and run parameters.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::MultiverseParams;
pub use ports::{
    execution_engine::{EngineError, EnginePlan, ExecutionEngine},
    progress::{MultiverseProgressNotifier, NoProgress},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
};
pub use use_cases::run_judge::{JudgeRun, RunJudgeUseCase};
pub use use_cases::run_multiverse::{MultiverseRun, RunMultiverseError, RunMultiverseUseCase};
pub use use_cases::trace_multiverse::{MultiverseTrace, TraceBranch, TraceMultiverseUseCase};
