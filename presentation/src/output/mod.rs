//! Output formatting for run, trace, and judge results

pub mod console;
