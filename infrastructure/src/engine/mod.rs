//! Execution engine adapters.
//!
//! Provides [`EchoEngine`], a deterministic offline implementation of the
//! [`ExecutionEngine`](multiverse_application::ExecutionEngine) port.

mod echo;

pub use echo::{DEFAULT_ECHO_INPUT_CHARS, EchoEngine, parse_spec_stages};
