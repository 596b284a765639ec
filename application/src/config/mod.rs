//! Application-level configuration.
//!
//! - [`MultiverseParams`] - branch count, preset and judge settings for one run

pub mod multiverse_params;

pub use multiverse_params::{DEFAULT_BRANCHES, DEFAULT_JUDGE_MAX_OUTPUT_CHARS, MultiverseParams};
