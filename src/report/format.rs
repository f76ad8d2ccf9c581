//! Console and JSON rendering of verdicts and reports.

use crate::analyze::Check;
use crate::report::MigrationReport;
use crate::validator::Verdict;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Line printed between the warning headline and the grouped commands.
pub const MOVE_INSTRUCTIONS: &str =
    "Move the blob paths to their new location using the following commands on the given hosts:";

pub fn format_ok(message: &str, color: bool) -> String {
    if color {
        format!("{}", message.green().bold())
    } else {
        message.to_string()
    }
}

pub fn format_warn(message: &str, color: bool) -> String {
    if color {
        format!("{}", message.yellow().bold())
    } else {
        message.to_string()
    }
}

pub fn format_error(message: &str, color: bool) -> String {
    if color {
        format!("{}", message.red().bold())
    } else {
        message.to_string()
    }
}

/// Commands grouped under a `[node]` header per node.
pub fn format_grouped(report: &MigrationReport, color: bool) -> String {
    let mut out = String::new();
    for group in report.groups() {
        out.push_str(&format_ok(&format!("[{}]", group.node), color));
        out.push('\n');
        for command in &group.commands {
            out.push_str(&command.to_string());
            out.push('\n');
        }
    }
    out
}

/// Per-node command counts.
pub fn format_summary_table(report: &MigrationReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Node", "Moves"]);
    for group in report.groups() {
        table.add_row(vec![group.node.clone(), group.commands.len().to_string()]);
    }
    table.to_string()
}

/// Full text output for a finding.
pub fn format_finding_text(check: Check, report: &MigrationReport, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format_warn(check.headline(), color));
    out.push('\n');
    out.push_str(&format_warn(MOVE_INSTRUCTIONS, color));
    out.push('\n');
    out.push_str(&format_grouped(report, color));
    out.push('\n');
    out.push_str(&format_summary_table(report));
    out.push('\n');
    out
}

/// Text output for any verdict.
pub fn format_verdict_text(verdict: &Verdict, color: bool) -> String {
    match verdict {
        Verdict::NoBlobTables => format!(
            "{}\n",
            format_ok("No blob tables were found. No migration required.", color)
        ),
        Verdict::Compliant => format!("{}\n", format_ok("No migration required.", color)),
        Verdict::MigrationRequired { check, report } => format_finding_text(*check, report, color),
    }
}

/// JSON output for any verdict.
///
/// Nodes are an array so their first-seen order survives any JSON consumer.
pub fn format_verdict_json(verdict: &Verdict) -> Result<String, serde_json::Error> {
    let value = match verdict {
        Verdict::NoBlobTables => json!({ "verdict": "no_blob_tables", "nodes": [] }),
        Verdict::Compliant => json!({ "verdict": "compliant", "nodes": [] }),
        Verdict::MigrationRequired { check, report } => {
            let nodes: Vec<_> = report
                .groups()
                .iter()
                .map(|group| {
                    let commands: Vec<_> = group
                        .commands
                        .iter()
                        .map(|c| {
                            json!({
                                "source": c.source,
                                "destination": c.destination,
                                "command": c.to_string(),
                            })
                        })
                        .collect();
                    json!({ "node": group.node, "commands": commands })
                })
                .collect();
            json!({ "verdict": "migration_required", "check": check, "nodes": nodes })
        }
    };
    serde_json::to_string_pretty(&value)
}
