//! Built-in component examples run by `--self-test`.
//!
//! Each case exercises one component on fixed input without contacting a
//! cluster.

use crate::analyze::{has_custom_blob_path, has_path_diff};
use crate::error::{MigrationError, VersionBound};
use crate::paths::{derive_target_path, is_descendant};
use crate::report::MigrationReport;
use crate::types::ShardPathRecord;
use crate::version::VersionWindow;
use std::path::{Path, PathBuf};

/// Outcome of the built-in examples.
#[derive(Debug, Clone, Default)]
pub struct SelfTestResult {
    pub checks: Vec<(String, bool)>,
    pub errors: Vec<String>,
}

impl SelfTestResult {
    fn record(&mut self, description: &str, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => self.checks.push((description.to_string(), true)),
            Err(detail) => {
                self.checks.push((description.to_string(), false));
                self.errors.push(format!("{}: {}", description, detail));
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_checks(&self) -> usize {
        self.checks.len()
    }

    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|(_, passed)| *passed).count()
    }
}

type Case = (&'static str, fn() -> Result<(), String>);

const CASES: &[Case] = &[
    ("descendant paths are compliant", descendant_paths),
    ("string prefix is not containment", string_prefix),
    ("target path gains node lock", target_path),
    ("target path is idempotent", target_path_idempotent),
    ("missing node lock is rejected", missing_node_lock),
    ("supported versions pass the gate", versions_inside_window),
    ("old versions fail the gate", version_below_window),
    ("migrated versions fail the gate", version_above_window),
    ("custom blob path scenario", custom_blob_path_scenario),
    ("custom blob path groups nodes", custom_blob_path_two_nodes),
    ("multiple data paths scenario", multi_data_path_scenario),
    ("multiple data paths groups nodes", multi_data_path_two_nodes),
];

/// Run every built-in example.
pub fn run_self_test() -> SelfTestResult {
    let mut result = SelfTestResult::default();
    for (description, case) in CASES {
        result.record(description, case());
    }
    result
}

/// Render the result as one line per case plus a summary line.
pub fn format_self_test(result: &SelfTestResult) -> String {
    let mut out = String::new();
    for (description, passed) in &result.checks {
        let mark = if *passed { "ok" } else { "FAILED" };
        out.push_str(&format!("{:<6} {}\n", mark, description));
    }
    for error in &result.errors {
        out.push_str(&format!("  {}\n", error));
    }
    out.push_str(&format!(
        "{}/{} self-test cases passed\n",
        result.passed_checks(),
        result.total_checks()
    ));
    out
}

fn ensure(condition: bool, detail: impl FnOnce() -> String) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(detail())
    }
}

fn rendered(report: &MigrationReport) -> Result<String, String> {
    serde_json::to_string(report).map_err(|e| e.to_string())
}

fn descendant_paths() -> Result<(), String> {
    let base = Path::new("/tmp/data1/x");
    for candidate in ["/tmp/data1/x", "/tmp/data1/x/blobs", "/tmp/data1/x/a/b/c"] {
        ensure(is_descendant(Path::new(candidate), base), || {
            format!("{} should be below {}", candidate, base.display())
        })?;
    }
    Ok(())
}

fn string_prefix() -> Result<(), String> {
    ensure(!is_descendant(Path::new("/a/bb"), Path::new("/a/b")), || {
        "/a/bb reported below /a/b".to_string()
    })
}

fn target_path() -> Result<(), String> {
    let target = derive_target_path(
        Path::new("/t/d/c/nodes/0/indices/t1/1"),
        Path::new("/t/b/indices/t1/1/blobs"),
    )
    .map_err(|e| e.to_string())?;
    let expected = PathBuf::from("/t/b/nodes/0/indices/t1/1/blobs");
    ensure(target == expected, || format!("got {}", target.display()))
}

fn target_path_idempotent() -> Result<(), String> {
    let data = Path::new("/t/d/c/nodes/0/indices/t1/1");
    let once = derive_target_path(data, Path::new("/t/b/indices/t1/1/blobs"))
        .map_err(|e| e.to_string())?;
    let twice = derive_target_path(data, &once).map_err(|e| e.to_string())?;
    ensure(once == twice, || format!("second pass gave {}", twice.display()))
}

fn missing_node_lock() -> Result<(), String> {
    match derive_target_path(
        Path::new("/t/d/c/indices/t1/1"),
        Path::new("/t/b/indices/t1/1/blobs"),
    ) {
        Err(MigrationError::MissingNodeLock { .. }) => Ok(()),
        Err(other) => Err(format!("unexpected error: {}", other)),
        Ok(path) => Err(format!("produced {}", path.display())),
    }
}

fn versions_inside_window() -> Result<(), String> {
    VersionWindow::default()
        .check(&["0.57.3", "0.57.50", "0.57.99"])
        .map_err(|e| e.to_string())
}

fn expect_bound(raw: &str, expected: VersionBound) -> Result<(), String> {
    match VersionWindow::default().check(&[raw]) {
        Err(MigrationError::VersionOutOfWindow { bound, .. }) if bound == expected => Ok(()),
        Err(other) => Err(format!("unexpected error: {}", other)),
        Ok(()) => Err(format!("{} passed the gate", raw)),
    }
}

fn version_below_window() -> Result<(), String> {
    expect_bound("0.56.9", VersionBound::BelowMinimum)
}

fn version_above_window() -> Result<(), String> {
    expect_bound("1.0.0", VersionBound::AtOrAboveNext)
}

fn custom_blob_path_scenario() -> Result<(), String> {
    let rows = [ShardPathRecord::new(
        "crate1",
        "/t/d/c/nodes/0/indices/.blob_t1/1",
        "/t/b/indices/.blob_t1/1/blobs",
    )];
    let analysis = has_custom_blob_path(&rows).map_err(|e| e.to_string())?;
    ensure(analysis.migration_required, || "no migration reported".to_string())?;
    let commands = analysis.report.get("crate1").unwrap_or(&[]);
    let described: Vec<String> = commands.iter().map(|c| c.describe()).collect();
    ensure(
        described
            == ["move /t/b/indices/.blob_t1/1/blobs to /t/b/nodes/0/indices/.blob_t1/1/blobs"],
        || format!("got {:?}", described),
    )
}

fn custom_blob_path_two_nodes() -> Result<(), String> {
    let rows = [
        ShardPathRecord::new(
            "crate1",
            "/t/d/c/nodes/0/indices/.blob_t1/1",
            "/t/b/indices/.blob_t1/1/blobs",
        ),
        ShardPathRecord::new(
            "crate2",
            "/t/d/c/nodes/0/indices/.blob_t1/1",
            "/t/b/indices/.blob_t1/1/blobs",
        ),
    ];
    let analysis = has_custom_blob_path(&rows).map_err(|e| e.to_string())?;
    let json = rendered(&analysis.report)?;
    let expected = concat!(
        r#"{"crate1":["mv \"/t/b/indices/.blob_t1/1/blobs\" \"/t/b/nodes/0/indices/.blob_t1/1/blobs\""],"#,
        r#""crate2":["mv \"/t/b/indices/.blob_t1/1/blobs\" \"/t/b/nodes/0/indices/.blob_t1/1/blobs\""]}"#
    );
    ensure(json == expected, || format!("got {}", json))
}

fn multi_data_path_scenario() -> Result<(), String> {
    let rows = [
        ShardPathRecord::new("crate1", "/tmp/data1/x", "/tmp/data1/x/blobs"),
        ShardPathRecord::new("crate1", "/tmp/data2/x", "/tmp/data1/x/blobs"),
    ];
    let analysis = has_path_diff(&rows);
    ensure(analysis.migration_required, || "no migration reported".to_string())?;
    let commands = analysis.report.get("crate1").unwrap_or(&[]);
    let described: Vec<String> = commands.iter().map(|c| c.describe()).collect();
    ensure(
        described == ["move /tmp/data1/x/blobs to /tmp/data2/x"],
        || format!("got {:?}", described),
    )
}

fn multi_data_path_two_nodes() -> Result<(), String> {
    let rows = [
        ShardPathRecord::new("crate1", "/tmp/data1/x", "/tmp/data1/x/blobs"),
        ShardPathRecord::new("crate1", "/tmp/data2/x", "/tmp/data1/x/blobs"),
        ShardPathRecord::new("crate2", "/tmp/data1/x", "/tmp/data1/x/blobs"),
        ShardPathRecord::new("crate2", "/tmp/data2/x", "/tmp/data1/x/blobs"),
    ];
    let json = rendered(&has_path_diff(&rows).report)?;
    let expected = r#"{"crate1":["mv \"/tmp/data1/x/blobs\" \"/tmp/data2/x\""],"crate2":["mv \"/tmp/data1/x/blobs\" \"/tmp/data2/x\""]}"#;
    ensure(json == expected, || format!("got {}", json))
}
