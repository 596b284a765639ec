//! Configuration file loading for multiverse
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./multiverse.toml` or `./.multiverse.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/multiverse/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileMultiverseConfig, FileOutputConfig,
    FilePresetConfig, FilePresetUniverse,
};
pub use loader::ConfigLoader;
