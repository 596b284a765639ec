//! Infrastructure layer for multiverse
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod engine;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileMultiverseConfig,
    FileOutputConfig, FilePresetConfig, FilePresetUniverse,
};
pub use engine::{EchoEngine, parse_spec_stages};
pub use logging::JsonlRunLogger;
