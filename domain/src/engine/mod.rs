//! Single-branch execution engine contract types.

pub mod report;

pub use report::{
    AgentRunResult, ECHO_OUTPUT_MARKER, ExecutionPlan, ExecutionReport, PlanStage, PlannedTask,
    is_echo_output,
};
