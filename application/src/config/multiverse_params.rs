//! Multiverse run parameters.
//!
//! [`MultiverseParams`] groups the per-invocation knobs the CLI resolves
//! from flags and config files before the use cases run.

use serde::{Deserialize, Serialize};

/// Default branch count when neither flag nor config sets one
pub const DEFAULT_BRANCHES: i64 = 2;

/// Default per-branch sink budget in judge requests
pub const DEFAULT_JUDGE_MAX_OUTPUT_CHARS: usize = 700;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiverseParams {
    /// Requested universe count (0 = every universe a preset declares)
    pub branches: i64,
    /// Preset to draw declared universes from
    pub preset: Option<String>,
    /// Judge spec; no judge step when unset
    pub judge: Option<String>,
    pub judge_max_output_chars: usize,
}

impl Default for MultiverseParams {
    fn default() -> Self {
        Self {
            branches: DEFAULT_BRANCHES,
            preset: None,
            judge: None,
            judge_max_output_chars: DEFAULT_JUDGE_MAX_OUTPUT_CHARS,
        }
    }
}

impl MultiverseParams {
    // ==================== Builder Methods ====================

    pub fn with_branches(mut self, branches: i64) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    /// Set the judge spec; blank disables the judge step
    pub fn with_judge(mut self, judge: impl Into<String>) -> Self {
        let judge = judge.into();
        self.judge = (!judge.trim().is_empty()).then(|| judge.trim().to_string());
        self
    }

    pub fn with_judge_max_output_chars(mut self, max: usize) -> Self {
        self.judge_max_output_chars = max;
        self
    }

    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = MultiverseParams::default();
        assert_eq!(params.branches, DEFAULT_BRANCHES);
        assert_eq!(params.judge_max_output_chars, DEFAULT_JUDGE_MAX_OUTPUT_CHARS);
        assert!(!params.has_judge());
    }

    #[test]
    fn test_blank_judge_disables() {
        let params = MultiverseParams::default().with_judge("  ");
        assert!(!params.has_judge());

        let params = MultiverseParams::default().with_judge(" reviewer ");
        assert_eq!(params.judge.as_deref(), Some("reviewer"));
    }

    #[test]
    fn test_builder_chain() {
        let params = MultiverseParams::default()
            .with_branches(0)
            .with_preset("review")
            .with_judge_max_output_chars(300);
        assert_eq!(params.branches, 0);
        assert_eq!(params.preset.as_deref(), Some("review"));
        assert_eq!(params.judge_max_output_chars, 300);
    }
}
