//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod execution_engine;
pub mod progress;
pub mod run_logger;
