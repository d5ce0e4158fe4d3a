//! CLI subcommand implementations.

pub mod format;
pub mod input;
pub mod replay;
pub mod run;
