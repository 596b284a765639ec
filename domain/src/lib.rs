//! Domain layer for multiverse
//!
//! This crate contains the core logic of a multiverse run. It has no
//! dependencies on infrastructure or presentation concerns and does no I/O.
//!
//! # Core Concepts
//!
//! ## Universe
//!
//! One variant execution plan of the same task. A run consists of several
//! universes executed concurrently; some may declare `depends_on` edges to
//! others and receive their results as compiled handoffs.
//!
//! ## Orchestration
//!
//! - **Plan**: validated, acyclic dependency graph (`parallel` or `dag`)
//! - **Handoff**: typed edge from an output port to an input port
//! - **Merge policy**: `append` (all ready sources) or `latest` (last declared)
//!
//! ## Reconciliation
//!
//! - **Consensus**: branches grouped by sink-output fingerprint
//! - **Judge**: one extra engine call whose answer is parsed into a decision

pub mod config;
pub mod consensus;
pub mod core;
pub mod engine;
pub mod judge;
pub mod orchestration;
pub mod universe;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{ConsensusBucket, ConsensusReport, SinkReply, short_fingerprint, sink_fingerprint, sink_replies};
pub use core::{
    error::DomainError,
    kind::{CONTEXT_COMPILED, PLAN_SUMMARY, SUMMARY_TEXT, is_known_kind, normalize_kind},
    string::{clip_line, truncate},
};
pub use engine::{AgentRunResult, ECHO_OUTPUT_MARKER, ExecutionPlan, ExecutionReport, PlanStage, PlannedTask, is_echo_output};
pub use judge::{DecisionFormat, JudgeDecision, build_judge_request, parse_judge_decision};
pub use orchestration::{
    BranchResult, CompiledInput, Handoff, OrchestrationPlan, SchedulerMode, compile_universe_input,
};
pub use universe::{MAX_BRANCHES, MergePolicy, Preset, Universe, UniverseSetBuilder, UniverseSource, UniverseVariant};
