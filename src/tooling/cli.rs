//! CLI Tooling
//!
//! Argument parsing and command execution. Commands render their output into
//! a `CommandOutcome` so the binary only has to print and exit.

use crate::cluster::{ClusterCatalog, HttpCatalog};
use crate::config::{ConfigLoader, ValidatorConfig};
use crate::error::{MigrationError, VersionBound};
use crate::logging::{init_logging, LoggingConfig};
use crate::report::format::{
    format_error, format_verdict_json, format_verdict_text, format_warn,
};
use crate::selftest::{format_self_test, run_self_test};
use crate::validator::{ExitStatus, Validator};
use crate::version::VersionWindow;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::error;

/// Blobmigrate CLI - pre-upgrade check of the blob storage layout
#[derive(Parser)]
#[command(name = "blobmigrate")]
#[command(about = "Check whether blob data must be moved before upgrading a cluster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the configured logging settings.
    ///
    /// `--log-file` is not folded in here; it is passed to `init_logging`
    /// separately so it keeps precedence over `BLOBMIGRATE_LOG_FILE`.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check whether blob data must be moved before upgrading
    Check {
        /// Cluster HTTP address [default: localhost:4200]
        #[arg(long)]
        host: Option<String>,

        /// Run the built-in component examples instead of contacting a cluster
        #[arg(long)]
        self_test: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

/// Rendered result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

impl CommandOutcome {
    fn ok(stdout: String, status: ExitStatus) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            status,
        }
    }

    fn failed(stdout: String, stderr: String) -> Self {
        Self {
            stdout,
            stderr,
            status: ExitStatus::CannotProceed,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.status.code()
    }
}

/// CLI context holding the loaded configuration
pub struct CliContext {
    config: ValidatorConfig,
}

impl CliContext {
    /// Create a context from a config file, or the standard locations when `None`.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, MigrationError> {
        let config = ConfigLoader::load_optional(config_path.as_deref())?;
        Ok(Self { config })
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Initialize logging from configuration plus CLI flags.
    pub fn init_logging(&self, cli: &Cli) -> Result<(), MigrationError> {
        init_logging(
            Some(&cli.logging_config(&self.config.logging)),
            cli.log_file.clone(),
        )
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> CommandOutcome {
        match command {
            Commands::Check {
                host,
                self_test,
                format,
                no_color,
            } => {
                let color = use_color(*no_color, format);
                if *self_test {
                    return self.handle_self_test(format);
                }
                let mut settings = self.config.cluster.clone();
                if let Some(host) = host {
                    settings.host = host.clone();
                }
                match HttpCatalog::connect(&settings) {
                    Ok(catalog) => self.handle_check(&catalog, format, color),
                    Err(err) => self.render_error(&err, format, color),
                }
            }
        }
    }

    /// Run the check against an already connected catalog.
    pub fn handle_check(
        &self,
        catalog: &dyn ClusterCatalog,
        format: &str,
        color: bool,
    ) -> CommandOutcome {
        let mut stdout = String::new();
        if format != "json" {
            stdout.push_str(&format!(
                "Running migration check against {}\n",
                catalog.describe()
            ));
        }

        let result = Validator::new(catalog)
            .with_window(self.config.versions)
            .run();
        match result {
            Ok(verdict) => {
                let rendered = if format == "json" {
                    match format_verdict_json(&verdict) {
                        Ok(json) => format!("{}\n", json),
                        Err(e) => {
                            return self.render_error(&MigrationError::from(e), format, color)
                        }
                    }
                } else {
                    format_verdict_text(&verdict, color)
                };
                stdout.push_str(&rendered);
                CommandOutcome::ok(stdout, verdict.exit_status())
            }
            Err(err) => {
                let mut outcome = self.render_error(&err, format, color);
                outcome.stdout.insert_str(0, &stdout);
                outcome
            }
        }
    }

    fn handle_self_test(&self, format: &str) -> CommandOutcome {
        let result = run_self_test();
        let status = if result.is_valid() {
            ExitStatus::Ok
        } else {
            ExitStatus::CannotProceed
        };
        let stdout = if format == "json" {
            let value = json!({
                "passed": result.passed_checks(),
                "total": result.total_checks(),
                "errors": result.errors,
            });
            format!("{}\n", value)
        } else {
            format_self_test(&result)
        };
        CommandOutcome::ok(stdout, status)
    }

    fn render_error(&self, err: &MigrationError, format: &str, color: bool) -> CommandOutcome {
        error!(error = %err, "Migration check aborted");
        if format == "json" {
            let value = json!({ "verdict": "error", "error": err.to_string() });
            return CommandOutcome::failed(String::new(), format!("{}\n", value));
        }
        CommandOutcome::failed(
            String::new(),
            format_error_text(err, &self.config.versions, color),
        )
    }
}

/// Error text for standard error, with operator hints for version failures.
pub fn format_error_text(err: &MigrationError, window: &VersionWindow, color: bool) -> String {
    let mut out = String::new();
    match err {
        MigrationError::VersionOutOfWindow {
            bound: VersionBound::BelowMinimum,
            version,
            ..
        } => {
            out.push_str(&format_error(
                &format!(
                    "Some nodes in the cluster run a version lower than {} (found {}).",
                    window.minimum, version
                ),
                color,
            ));
            out.push('\n');
            out.push_str(&format_warn(
                &format!(
                    "Please upgrade your cluster to the latest {}.{} version first!",
                    window.minimum.major, window.minimum.minor
                ),
                color,
            ));
        }
        MigrationError::VersionOutOfWindow {
            bound: VersionBound::AtOrAboveNext,
            version,
            ..
        } => {
            out.push_str(&format_error(
                &format!(
                    "Some nodes in the cluster run a version greater or equal than {} (found {}).",
                    window.next, version
                ),
                color,
            ));
        }
        other => out.push_str(&format_error(&format!("Error: {}", other), color)),
    }
    out.push('\n');
    out
}

fn use_color(no_color: bool, format: &str) -> bool {
    !no_color && format != "json" && std::env::var_os("NO_COLOR").is_none()
}
