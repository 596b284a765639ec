//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - configuration errors raised before execution
//! - [`kind`] - content-kind registry for ports and handoff edges
//! - [`string`] - clipping and quoting helpers used by the text protocols

pub mod error;
pub mod kind;
pub mod string;
