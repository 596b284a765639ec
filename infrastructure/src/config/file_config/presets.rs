//! Preset definitions from TOML (`[[presets]]` tables)
//!
//! ```toml
//! [[presets]]
//! name = "review"
//! spec = "writer"
//!
//! [[presets.universes]]
//! name = "strict"
//! input_prefix = "Be conservative."
//!
//! [[presets.universes]]
//! name = "synth"
//! spec = "editor"
//! depends_on = ["strict"]
//! merge_policy = "latest"
//! ```

use multiverse_domain::{Preset, UniverseVariant};
use serde::{Deserialize, Serialize};

/// One declared universe of a preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePresetUniverse {
    pub name: String,
    pub spec: String,
    pub input_prefix: String,
    pub input_suffix: String,
    pub depends_on: Vec<String>,
    pub input_port: String,
    pub output_port: String,
    pub output_kind: String,
    pub merge_policy: Option<String>,
    pub handoff_max_chars: usize,
}

impl FilePresetUniverse {
    pub fn to_variant(&self) -> UniverseVariant {
        UniverseVariant {
            name: self.name.trim().to_string(),
            spec: self.spec.trim().to_string(),
            input_prefix: self.input_prefix.clone(),
            input_suffix: self.input_suffix.clone(),
            depends_on: self.depends_on.clone(),
            input_port: self.input_port.trim().to_string(),
            output_port: self.output_port.trim().to_string(),
            output_kind: self.output_kind.trim().to_string(),
            merge_policy: self.merge_policy.clone(),
            handoff_max_chars: self.handoff_max_chars,
        }
    }
}

/// A named preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePresetConfig {
    pub name: String,
    pub description: Option<String>,
    /// Spec for universes that leave theirs blank
    pub spec: String,
    pub universes: Vec<FilePresetUniverse>,
}

impl FilePresetConfig {
    pub fn to_preset(&self) -> Preset {
        Preset {
            name: self.name.trim().to_string(),
            spec: self.spec.trim().to_string(),
            universes: self.universes.iter().map(FilePresetUniverse::to_variant).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}
