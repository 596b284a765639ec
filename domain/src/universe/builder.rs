//! Universe set construction from a branch count and an optional preset.
//!
//! | count              | preset with variants     | no preset / no variants |
//! |--------------------|--------------------------|-------------------------|
//! | `< 0`              | error                    | error                   |
//! | `> MAX_BRANCHES`   | error                    | error                   |
//! | `0`                | all declared variants    | error                   |
//! | `1`                | not a multiverse run     | not a multiverse run    |
//! | `N`                | first `min(N, declared)` | `N` independent clones  |
//!
//! A result with fewer than two universes is reported as `Ok(None)`.

use super::entities::{MergePolicy, Universe, UniverseSource, dedupe_refs};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Upper bound on a requested branch count
pub const MAX_BRANCHES: i64 = 1024;

/// A variant universe declared by a preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseVariant {
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

/// A named set of declared variant universes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    /// Spec used by variants that leave theirs blank
    pub spec: String,
    pub universes: Vec<UniverseVariant>,
}

/// Builds the normalized universe list for one invocation.
#[derive(Debug, Clone)]
pub struct UniverseSetBuilder {
    spec: String,
    input: String,
    preset: Option<Preset>,
}

impl UniverseSetBuilder {
    pub fn new(spec: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            input: input.into(),
            preset: None,
        }
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Build the universe set for the requested branch count.
    pub fn build(&self, count: i64) -> Result<Option<Vec<Universe>>, DomainError> {
        if !(0..=MAX_BRANCHES).contains(&count) {
            return Err(DomainError::InvalidBranchCount(count));
        }

        if let Some(preset) = self.preset.as_ref().filter(|p| !p.universes.is_empty()) {
            return self.build_from_preset(preset, count as usize);
        }

        if count == 0 {
            return Err(DomainError::NoDeclaredUniverses);
        }
        if count < 2 {
            return Ok(None);
        }

        let universes = (0..count as usize)
            .map(|i| {
                let id = format!("u{}", i + 1);
                Universe::new(id.clone(), i, self.spec.trim())
                    .with_label(id)
                    .with_input(self.input.trim())
            })
            .collect();
        Ok(Some(universes))
    }

    fn build_from_preset(
        &self,
        preset: &Preset,
        count: usize,
    ) -> Result<Option<Vec<Universe>>, DomainError> {
        let declared = preset.universes.len();
        let limit = if count == 0 { declared } else { count.min(declared) };
        if limit < 2 {
            return Ok(None);
        }

        let fallback_spec = if preset.spec.trim().is_empty() {
            self.spec.trim()
        } else {
            preset.spec.trim()
        };

        let mut out = Vec::with_capacity(limit);
        for (i, variant) in preset.universes.iter().take(limit).enumerate() {
            let id = format!("u{}", i + 1);
            let label = match variant.name.trim() {
                "" => id.clone(),
                name => name.to_string(),
            };
            let spec = match variant.spec.trim() {
                "" => fallback_spec,
                spec => spec,
            };
            let (input, note) = apply_variant_input(&self.input, variant);

            let mut universe = Universe::new(id, i, spec)
                .with_label(label)
                .with_input(input)
                .with_depends_on(dedupe_refs(&variant.depends_on))
                .with_merge_policy(MergePolicy::parse_optional(variant.merge_policy.as_deref())?)
                .with_output_kind(variant.output_kind.trim())
                .with_handoff_max_chars(variant.handoff_max_chars);
            universe.input_port = variant.input_port.trim().to_string();
            universe.output_port = variant.output_port.trim().to_string();
            universe.source = UniverseSource::Preset;
            universe.preset_name = Some(preset.name.clone());
            universe.input_note = note;
            out.push(universe.normalized());
        }
        Ok(Some(out))
    }
}

/// Wrap the base input with the variant's prefix and suffix.
fn apply_variant_input(base: &str, variant: &UniverseVariant) -> (String, Option<String>) {
    let base = base.trim();
    let prefix = variant.input_prefix.trim();
    let suffix = variant.input_suffix.trim();
    if prefix.is_empty() && suffix.is_empty() {
        return (base.to_string(), None);
    }

    let mut lines = Vec::with_capacity(3);
    let mut parts = Vec::with_capacity(2);
    if !prefix.is_empty() {
        lines.push(prefix);
        parts.push("prefix");
    }
    if !base.is_empty() {
        lines.push(base);
    }
    if !suffix.is_empty() {
        lines.push(suffix);
        parts.push("suffix");
    }
    let note = format!("preset universe input {}", parts.join("+"));
    (lines.join("\n"), Some(note))
}
