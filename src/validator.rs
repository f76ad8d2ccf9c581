//! Validation run: version gate, blob table short-circuit, then the two
//! path analyzers in order.
//!
//! The run is single-pass and read-only. The first analyzer that finds a
//! required move ends it; any error aborts it without a partial report.

use crate::analyze::{check_multiple_data_paths, has_custom_blob_path, Check};
use crate::cluster::ClusterCatalog;
use crate::error::MigrationError;
use crate::report::MigrationReport;
use crate::version::VersionWindow;
use tracing::{debug, info, warn};

/// Process exit status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing to do before upgrading.
    Ok,
    /// A report was produced; an operator has to run the listed moves.
    MigrationRequired,
    /// A precondition or introspection failure; no report was produced.
    CannotProceed,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::MigrationRequired => 1,
            ExitStatus::CannotProceed => 2,
        }
    }
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The cluster has no blob tables; nothing was analyzed.
    NoBlobTables,
    /// Both analyzers ran and found nothing to move.
    Compliant,
    /// An analyzer found blob directories that must be moved.
    MigrationRequired {
        check: Check,
        report: MigrationReport,
    },
}

impl Verdict {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Verdict::NoBlobTables | Verdict::Compliant => ExitStatus::Ok,
            Verdict::MigrationRequired { .. } => ExitStatus::MigrationRequired,
        }
    }

    pub fn migration_required(&self) -> bool {
        matches!(self, Verdict::MigrationRequired { .. })
    }
}

/// Runs the checks against one catalog.
pub struct Validator<'a, C: ClusterCatalog + ?Sized> {
    catalog: &'a C,
    window: VersionWindow,
}

impl<'a, C: ClusterCatalog + ?Sized> Validator<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            window: VersionWindow::default(),
        }
    }

    pub fn with_window(mut self, window: VersionWindow) -> Self {
        self.window = window;
        self
    }

    pub fn run(&self) -> Result<Verdict, MigrationError> {
        info!(target_cluster = %self.catalog.describe(), "Running migration check");

        let versions = self.catalog.node_versions()?;
        debug!(nodes = versions.len(), window = %self.window, "Checking node versions");
        self.window.check(&versions)?;

        let blob_tables = self.catalog.blob_table_count()?;
        if blob_tables == 0 {
            info!("No blob tables found");
            return Ok(Verdict::NoBlobTables);
        }
        debug!(blob_tables, "Blob tables found");

        let layouts = self.catalog.node_data_roots()?;
        let shards = self.catalog.blob_shard_paths()?;
        debug!(
            nodes = layouts.len(),
            shards = shards.len(),
            "Loaded data roots and blob shard paths"
        );

        let multi = check_multiple_data_paths(&layouts, &shards);
        if multi.migration_required {
            warn!(
                commands = multi.report.command_count(),
                "Blob data outside its shard's data root"
            );
            return Ok(Verdict::MigrationRequired {
                check: Check::MultipleDataPaths,
                report: multi.report,
            });
        }

        let custom = has_custom_blob_path(&shards)?;
        if custom.migration_required {
            warn!(
                commands = custom.report.command_count(),
                "Custom blob path uses the old layout"
            );
            return Ok(Verdict::MigrationRequired {
                check: Check::CustomBlobPath,
                report: custom.report,
            });
        }

        info!("No migration required");
        Ok(Verdict::Compliant)
    }
}
