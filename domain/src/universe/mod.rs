//! Universe domain
//!
//! A universe is one variant execution plan of the same underlying task.
//! [`UniverseSetBuilder`] turns a branch count (and optionally a preset's
//! declared variants) into the normalized list the planner consumes.

pub mod builder;
pub mod entities;

pub use builder::{MAX_BRANCHES, Preset, UniverseSetBuilder, UniverseVariant};
pub use entities::{
    DEFAULT_HANDOFF_MAX_CHARS, DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT, MergePolicy, Universe,
    UniverseSource, dedupe_refs, ref_key,
};
