//! Report and plan types produced by the single-branch execution engine.
//!
//! The engine itself is an external collaborator; these types are the
//! contract it fills in. A report is an ordered list of per-stage agent
//! results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix marking output produced by a non-live (echo) backend.
pub const ECHO_OUTPUT_MARKER: &str = "[echo-provider]";

/// Result of one agent inside one stage of a branch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRunResult {
    /// Agent name
    pub agent: String,
    /// Stage the agent ran in (0-indexed)
    pub stage_index: usize,
    /// Output text
    #[serde(default)]
    pub output: String,
    /// Error reported by the agent, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentRunResult {
    pub fn success(agent: impl Into<String>, stage_index: usize, output: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            stage_index,
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(agent: impl Into<String>, stage_index: usize, error: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            stage_index,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// Whether the output came from an echo backend rather than a live model.
    pub fn is_echo_output(&self) -> bool {
        is_echo_output(&self.output)
    }
}

/// Whether `text` carries the echo-backend marker.
pub fn is_echo_output(text: &str) -> bool {
    text.trim_start().starts_with(ECHO_OUTPUT_MARKER)
}

/// Complete report of one engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Whether the engine ran stages in parallel
    pub parallel: bool,
    /// The input the engine received
    pub input: String,
    /// Ordered per-agent results
    pub results: Vec<AgentRunResult>,
}

impl ExecutionReport {
    /// Build a report whose start and end are both "now".
    pub fn new(input: impl Into<String>, results: Vec<AgentRunResult>) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            ended_at: now,
            parallel: false,
            input: input.into(),
            results,
        }
    }

    /// Wall-clock time the engine reported for this run
    pub fn elapsed_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }

    /// Output of the final result, unless it errored or is blank.
    pub fn last_output(&self) -> Option<&str> {
        let last = self.results.last()?;
        if last.error.is_some() {
            return None;
        }
        let text = last.output.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// One stage of a planned branch execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStage {
    pub index: usize,
    pub agents: Vec<String>,
}

/// Planned task for a single agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub agent: String,
    pub stage_index: usize,
}

/// Plan the engine would execute for a (spec, input) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub spec: String,
    pub input: String,
    pub parallel: bool,
    pub stages: Vec<PlanStage>,
}

impl ExecutionPlan {
    pub fn task_count(&self) -> usize {
        self.stages.iter().map(|s| s.agents.len()).sum()
    }
}
