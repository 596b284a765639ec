//! Universe entity - one execution variant of a multiverse run.

use crate::core::error::DomainError;
use crate::core::kind::{SUMMARY_TEXT, normalize_kind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

pub const DEFAULT_INPUT_PORT: &str = "context";
pub const DEFAULT_OUTPUT_PORT: &str = "result";
pub const DEFAULT_HANDOFF_MAX_CHARS: usize = 260;

/// Rule selecting which completed upstream handoffs feed a universe's input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Include every completed upstream, in declaration order
    #[default]
    Append,
    /// Include only the most recently declared completed upstream
    Latest,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Append => "append",
            MergePolicy::Latest => "latest",
        }
    }

    /// Parse an optional config value; blank means the default.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(MergePolicy::Append),
            "latest" => Ok(MergePolicy::Latest),
            _ => Err(DomainError::InvalidMergePolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a universe definition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniverseSource {
    /// Cloned from the base spec/input
    #[default]
    Clone,
    /// Declared by a named preset
    Preset,
}

/// One concurrently executed variant of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub spec: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub source: UniverseSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_name: Option<String>,
    /// Position in the declared universe list
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub input_port: String,
    #[serde(default)]
    pub output_port: String,
    #[serde(default)]
    pub output_kind: String,
    #[serde(default)]
    pub merge_policy: MergePolicy,
    #[serde(default)]
    pub handoff_max_chars: usize,
}

impl Universe {
    /// Create a dependency-free universe with default ports and budget.
    pub fn new(id: impl Into<String>, index: usize, spec: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            spec: spec.into(),
            input: String::new(),
            source: UniverseSource::Clone,
            preset_name: None,
            index,
            input_note: None,
            depends_on: Vec::new(),
            input_port: DEFAULT_INPUT_PORT.to_string(),
            output_port: DEFAULT_OUTPUT_PORT.to_string(),
            output_kind: SUMMARY_TEXT.to_string(),
            merge_policy: MergePolicy::Append,
            handoff_max_chars: DEFAULT_HANDOFF_MAX_CHARS,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_depends_on<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = refs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_output_kind(mut self, kind: impl Into<String>) -> Self {
        self.output_kind = kind.into();
        self
    }

    pub fn with_handoff_max_chars(mut self, max: usize) -> Self {
        self.handoff_max_chars = max;
        self
    }

    /// Trimmed label, if one is set and non-blank
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    /// `"label (id)"` when the label differs from the id, else whichever is set.
    pub fn display_name(&self) -> String {
        let id = self.id.trim();
        match self.label() {
            Some(label) if label != id => format!("{} ({})", label, id),
            Some(label) => label.to_string(),
            None => id.to_string(),
        }
    }

    /// Apply defaults and canonicalize free-text fields. Idempotent.
    pub fn normalized(&self) -> Self {
        let mut u = self.clone();
        if u.input_port.trim().is_empty() {
            u.input_port = DEFAULT_INPUT_PORT.to_string();
        }
        if u.output_port.trim().is_empty() {
            u.output_port = DEFAULT_OUTPUT_PORT.to_string();
        }
        u.output_kind = normalize_kind(&u.output_kind)
            .unwrap_or(SUMMARY_TEXT)
            .to_string();
        if u.handoff_max_chars == 0 {
            u.handoff_max_chars = DEFAULT_HANDOFF_MAX_CHARS;
        }
        u.depends_on = dedupe_refs(&u.depends_on);
        u
    }

    /// Append a note, skipping it when already contained.
    pub fn merge_note(&mut self, note: &str) {
        self.input_note = merge_notes(self.input_note.as_deref(), note);
    }
}

/// Case-insensitive lookup key for ids and labels.
pub fn ref_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Trim references, drop blanks and drop case-insensitive duplicates.
pub fn dedupe_refs(refs: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    refs.iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty() && seen.insert(ref_key(r)))
        .map(str::to_string)
        .collect()
}

fn merge_notes(existing: Option<&str>, note: &str) -> Option<String> {
    let a = existing.unwrap_or("").trim();
    let b = note.trim();
    let merged = match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ if a.contains(b) => a.to_string(),
        _ => format!("{}; {}", a, b),
    };
    (!merged.is_empty()).then_some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_policy_parse() {
        assert_eq!("append".parse::<MergePolicy>().unwrap(), MergePolicy::Append);
        assert_eq!(" LATEST ".parse::<MergePolicy>().unwrap(), MergePolicy::Latest);
        assert_eq!(
            "newest".parse::<MergePolicy>(),
            Err(DomainError::InvalidMergePolicy("newest".to_string()))
        );
        assert_eq!(MergePolicy::parse_optional(None).unwrap(), MergePolicy::Append);
        assert_eq!(MergePolicy::parse_optional(Some("  ")).unwrap(), MergePolicy::Append);
    }

    #[test]
    fn test_display_name() {
        let u = Universe::new("u1", 0, "guide");
        assert_eq!(u.display_name(), "u1");
        assert_eq!(u.clone().with_label("u1").display_name(), "u1");
        assert_eq!(u.with_label("baseline").display_name(), "baseline (u1)");
    }

    #[test]
    fn test_normalized_applies_defaults() {
        let mut u = Universe::new("u1", 0, "guide");
        u.input_port.clear();
        u.output_port = "  ".to_string();
        u.output_kind = "not-a-kind".to_string();
        u.handoff_max_chars = 0;
        u.depends_on = vec!["A".into(), " a ".into(), "".into(), "b".into()];

        let n = u.normalized();
        assert_eq!(n.input_port, DEFAULT_INPUT_PORT);
        assert_eq!(n.output_port, DEFAULT_OUTPUT_PORT);
        assert_eq!(n.output_kind, SUMMARY_TEXT);
        assert_eq!(n.handoff_max_chars, DEFAULT_HANDOFF_MAX_CHARS);
        assert_eq!(n.depends_on, vec!["A".to_string(), "b".to_string()]);
        assert_eq!(n.normalized(), n);
    }

    #[test]
    fn test_normalized_canonicalizes_kind() {
        let u = Universe::new("u1", 0, "guide").with_output_kind("Summary.Code");
        assert_eq!(u.normalized().output_kind, "summary/code");
    }

    #[test]
    fn test_merge_note() {
        let mut u = Universe::new("u1", 0, "guide");
        u.merge_note("preset universe input prefix");
        u.merge_note("multiverse channels=1 merge=append");
        u.merge_note("multiverse channels=1 merge=append");
        assert_eq!(
            u.input_note.as_deref(),
            Some("preset universe input prefix; multiverse channels=1 merge=append")
        );
    }
}
