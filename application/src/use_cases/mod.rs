//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_judge;
pub mod run_multiverse;
pub mod trace_multiverse;
