//! Smile timer CLI library.
//!
//! This crate provides the CLI interface for the smile timer.

mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{Cli, Commands};
pub use config::Config;
