//! Tooling & Integration Layer
//!
//! Command-line surface of the validator.

pub mod cli;

pub use cli::{Cli, CliContext, CommandOutcome, Commands};
