//! Blobmigrate: Blob Storage Layout Pre-Upgrade Check
//!
//! Introspects a running cluster and decides whether blob shard directories
//! must be moved before upgrading to the node-scoped blob layout. When they
//! must, it produces the move commands grouped by host. Nothing is ever moved
//! by the tool itself.

pub mod analyze;
pub mod cluster;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod report;
pub mod selftest;
pub mod tooling;
pub mod types;
pub mod validator;
pub mod version;

#[cfg(test)]
pub(crate) mod test_env;

pub use error::MigrationError;
pub use report::MigrationReport;
pub use validator::{ExitStatus, Validator, Verdict};
