//! Orchestration between universes
//!
//! - [`OrchestrationPlan`]: validated dependency graph (Kahn-checked)
//! - [`Handoff`]: typed edge from a source output port to a target input port
//! - [`compile_universe_input`]: renders completed upstream results into a
//!   universe's input
//! - [`BranchResult`]: one universe's outcome

pub mod branch;
pub mod compiler;
pub mod handoff;
pub mod plan;

pub use branch::{BranchResult, STATUS_ERROR, STATUS_OK};
pub use compiler::{CompiledInput, HANDOFF_BLOCK_TAG, compile_universe_input};
pub use handoff::{Handoff, channel_id};
pub use plan::{OrchestrationPlan, SchedulerMode};
