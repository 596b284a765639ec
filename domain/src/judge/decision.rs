//! Judge decision value object.

use serde::{Deserialize, Serialize};

/// Which extraction strategy produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionFormat {
    Json,
    Sections,
}

impl DecisionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionFormat::Json => "json",
            DecisionFormat::Sections => "sections",
        }
    }
}

impl std::fmt::Display for DecisionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured verdict recovered from the judge's output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeDecision {
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up: Vec<String>,
    pub format: DecisionFormat,
}

impl JudgeDecision {
    pub fn empty(format: DecisionFormat) -> Self {
        Self {
            winner: String::new(),
            rationale: String::new(),
            differences: Vec::new(),
            risks: Vec::new(),
            follow_up: Vec::new(),
            format,
        }
    }

    /// At least one field carries content.
    pub fn is_meaningful(&self) -> bool {
        !self.winner.trim().is_empty()
            || !self.rationale.trim().is_empty()
            || !self.differences.is_empty()
            || !self.risks.is_empty()
            || !self.follow_up.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meaningful() {
        let mut d = JudgeDecision::empty(DecisionFormat::Json);
        assert!(!d.is_meaningful());
        d.winner = "   ".to_string();
        assert!(!d.is_meaningful());
        d.risks.push("slow".to_string());
        assert!(d.is_meaningful());
    }

    #[test]
    fn test_format_serializes_lowercase() {
        let json = serde_json::to_string(&DecisionFormat::Sections).unwrap();
        assert_eq!(json, "\"sections\"");
    }
}
