//! Progress reporters for multiverse runs

pub mod reporter;
