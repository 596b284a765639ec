//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod multiverse;
mod output;
mod presets;

pub use logging::FileLoggingConfig;
pub use multiverse::FileMultiverseConfig;
pub use output::FileOutputConfig;
pub use presets::{FilePresetConfig, FilePresetUniverse};

use multiverse_domain::{ConfigIssue, ConfigIssueCode, MergePolicy, Preset, is_known_kind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Run defaults
    pub multiverse: FileMultiverseConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Run log settings
    pub logging: FileLoggingConfig,
    /// Declared presets
    pub presets: Vec<FilePresetConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks preset names for case-insensitive duplicates, then each
    /// declared universe for merge policies and output kinds.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for preset in &self.presets {
            let name = preset.name.trim();
            if !seen.insert(name.to_lowercase()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicatePreset {
                        name: name.to_string(),
                    },
                    format!("preset '{}' is declared more than once", name),
                ));
            }

            if preset.universes.is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyPreset {
                        name: name.to_string(),
                    },
                    format!("preset '{}' declares no universes and runs as clones", name),
                ));
            }

            for universe in &preset.universes {
                if let Some(value) = &universe.merge_policy
                    && MergePolicy::parse_optional(Some(value)).is_err()
                {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::InvalidMergePolicy {
                            preset: name.to_string(),
                            value: value.clone(),
                        },
                        format!(
                            "preset '{}' universe '{}': merge_policy must be 'append' or 'latest', got '{}'",
                            name, universe.name, value
                        ),
                    ));
                }

                let kind = universe.output_kind.trim();
                if !kind.is_empty() && !is_known_kind(kind) {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UnknownOutputKind {
                            preset: name.to_string(),
                            value: kind.to_string(),
                        },
                        format!(
                            "preset '{}' universe '{}': unknown output_kind '{}', falling back to 'summary/text'",
                            name, universe.name, kind
                        ),
                    ));
                }
            }
        }

        issues
    }

    /// Fail on error-level issues, returning the remaining warnings.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(
                errors.into_iter().map(|issue| issue.message).collect(),
            ))
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn preset(&self, name: &str) -> Result<Preset, ConfigValidationError> {
        self.presets
            .iter()
            .find(|p| p.matches(name))
            .map(FilePresetConfig::to_preset)
            .ok_or_else(|| ConfigValidationError::UnknownPreset(name.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiverse_domain::{OutputFormat, Severity};

    const FULL_CONFIG: &str = r#"
[multiverse]
branches = 3
judge = "reviewer"
judge_max_output_chars = 500

[output]
format = "json"
color = false

[logging]
run_log = "/tmp/multiverse.jsonl"

[[presets]]
name = "review"
description = "strict and loose takes, then a synthesis"
spec = "writer"

[[presets.universes]]
name = "strict"
input_prefix = "Be conservative."

[[presets.universes]]
name = "loose"
input_suffix = "Take risks."

[[presets.universes]]
name = "synth"
spec = "editor"
depends_on = ["strict", "loose"]
merge_policy = "latest"
output_kind = "summary/code"
handoff_max_chars = 120
"#;

    #[test]
    fn test_deserialize_full_config() {
        let config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        assert_eq!(config.multiverse.branches, Some(3));
        assert_eq!(config.multiverse.judge.as_deref(), Some("reviewer"));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.logging.run_log.is_some());
        assert_eq!(config.presets.len(), 1);

        let preset = config.preset("REVIEW").unwrap();
        assert_eq!(preset.universes.len(), 3);
        assert_eq!(preset.universes[2].depends_on, vec!["strict", "loose"]);
        assert_eq!(preset.universes[2].handoff_max_chars, 120);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.multiverse.branches.is_none());
        assert!(config.output.color);
        assert!(config.presets.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_unknown_preset() {
        let config = FileConfig::default();
        let err = config.preset("missing").unwrap_err();
        assert!(matches!(err, ConfigValidationError::UnknownPreset(ref n) if n == "missing"));
    }

    #[test]
    fn test_validate_reports_issues() {
        let toml_str = r#"
[[presets]]
name = "dup"

[[presets]]
name = "DUP"

[[presets.universes]]
name = "a"
merge_policy = "newest"
output_kind = "summary/poetry"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert!(issues.iter().any(|i| matches!(
            i.code,
            ConfigIssueCode::DuplicatePreset { .. }
        ) && i.severity == Severity::Error));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidMergePolicy { value, .. } if value == "newest"
        )));
        assert!(issues.iter().any(|i| matches!(
            i.code,
            ConfigIssueCode::UnknownOutputKind { .. }
        ) && i.severity == Severity::Warning));
        assert!(issues.iter().any(|i| matches!(i.code, ConfigIssueCode::EmptyPreset { .. })));

        let err = config.ensure_valid().unwrap_err();
        assert!(err.to_string().contains("more than once"));
        assert!(err.to_string().contains("newest"));
    }

    #[test]
    fn test_ensure_valid_keeps_warnings() {
        let toml_str = r#"
[[presets]]
name = "solo"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let warnings = config.ensure_valid().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].is_error());
    }
}
