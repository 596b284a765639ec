//! Outcome of one universe's execution.

use crate::engine::ExecutionReport;
use crate::universe::Universe;
use serde::{Deserialize, Serialize};

/// Status word used in compiled handoffs and judge requests
pub const STATUS_OK: &str = "ok";
pub const STATUS_ERROR: &str = "error";

/// One universe's outcome, filled in exactly once by its worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchResult {
    /// The universe, with `input_note` annotated when its input was augmented
    pub universe: Universe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ExecutionReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incoming_channels: Vec<String>,
    #[serde(default)]
    pub incoming_contributions: usize,
    #[serde(default)]
    pub input_augmented: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_augment_note: Option<String>,
}

impl BranchResult {
    pub fn success(universe: Universe, report: ExecutionReport, duration_ms: u64) -> Self {
        Self {
            universe,
            report: Some(report),
            error: None,
            duration_ms,
            incoming_channels: Vec::new(),
            incoming_contributions: 0,
            input_augmented: false,
            input_augment_note: None,
        }
    }

    pub fn failure(universe: Universe, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            universe,
            report: None,
            error: Some(error.into()),
            duration_ms,
            incoming_channels: Vec::new(),
            incoming_contributions: 0,
            input_augmented: false,
            input_augment_note: None,
        }
    }

    /// Record which channels fed this branch's compiled input.
    pub fn with_incoming(mut self, channels: Vec<String>, contributions: usize, note: Option<String>) -> Self {
        self.input_augmented = contributions > 0;
        if let Some(note) = note.as_deref() {
            self.universe.merge_note(note);
        }
        self.input_augment_note = note;
        self.incoming_channels = channels;
        self.incoming_contributions = contributions;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn status(&self) -> &'static str {
        if self.is_ok() { STATUS_OK } else { STATUS_ERROR }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AgentRunResult;

    #[test]
    fn test_with_incoming_annotates_universe() {
        let u = Universe::new("u2", 1, "guide");
        let report = ExecutionReport::new("in", vec![AgentRunResult::success("a", 0, "out")]);
        let b = BranchResult::success(u, report, 12).with_incoming(
            vec!["u1.result->u2.context#summary/text".to_string()],
            1,
            Some("multiverse channels=1 merge=append".to_string()),
        );

        assert!(b.input_augmented);
        assert_eq!(b.status(), STATUS_OK);
        assert_eq!(
            b.universe.input_note.as_deref(),
            Some("multiverse channels=1 merge=append")
        );
    }

    #[test]
    fn test_failure_status() {
        let b = BranchResult::failure(Universe::new("u1", 0, "guide"), "engine down", 3);
        assert!(!b.is_ok());
        assert_eq!(b.status(), STATUS_ERROR);
        assert!(b.report.is_none());
    }
}
