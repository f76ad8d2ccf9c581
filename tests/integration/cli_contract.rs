use blobmigrate::config::ValidatorConfig;
use blobmigrate::tooling::cli::{Cli, CliContext, Commands};
use blobmigrate::types::ShardPathRecord;
use clap::{CommandFactory, Parser};
use std::fs;
use tempfile::TempDir;

use crate::integration::support::single_root_cluster;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["blobmigrate", "check"],
        vec!["blobmigrate", "check", "--host", "crate1:4200"],
        vec!["blobmigrate", "check", "--self-test"],
        vec!["blobmigrate", "check", "--format", "json", "--no-color"],
        vec!["blobmigrate", "--config", "/tmp/blobmigrate.toml", "check"],
        vec!["blobmigrate", "check", "--log-level", "debug", "--log-format", "json"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_subcommand() {
    assert!(Cli::try_parse_from(["blobmigrate"]).is_err());
    assert!(Cli::try_parse_from(["blobmigrate", "check", "--host"]).is_err());
}

#[test]
fn help_mentions_host_default() {
    let mut command = Cli::command();
    let check = command
        .find_subcommand_mut("check")
        .expect("check subcommand");
    let help = check.render_help().to_string();
    assert!(help.contains("--host"));
    assert!(help.contains("localhost:4200"));
    assert!(help.contains("--self-test"));
}

#[test]
fn host_flag_parses_into_command() {
    let cli = Cli::try_parse_from(["blobmigrate", "check", "--host", "crate1:4200"]).unwrap();
    match cli.command {
        Commands::Check { host, .. } => assert_eq!(host.as_deref(), Some("crate1:4200")),
    }
}

#[test]
fn self_test_exits_zero() {
    let context = CliContext::with_config(ValidatorConfig::default());
    let outcome = context.execute(&Commands::Check {
        host: None,
        self_test: true,
        format: "json".to_string(),
        no_color: true,
    });
    assert_eq!(outcome.exit_code(), 0);
    let parsed: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
    assert_eq!(parsed["passed"], parsed["total"]);
    assert_eq!(parsed["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn text_report_groups_commands_by_host() {
    let catalog = single_root_cluster(vec![
        ShardPathRecord::new(
            "crate1",
            "/data/nodes/0/indices/.blob_t1/1",
            "/blobs/indices/.blob_t1/1/blobs",
        ),
        ShardPathRecord::new(
            "crate2",
            "/data/nodes/0/indices/.blob_t1/2",
            "/data/nodes/0/indices/.blob_t1/2/blobs",
        ),
    ]);
    let context = CliContext::with_config(ValidatorConfig::default());
    let outcome = context.handle_check(&catalog, "text", false);

    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.stderr.is_empty());
    let stdout = &outcome.stdout;
    assert!(stdout.starts_with("Running migration check against static catalog\n"));
    assert!(stdout.contains("WARNING: A custom blob path set. Migration is required!"));
    let expected_group = concat!(
        "[crate1]\n",
        r#"mv "/blobs/indices/.blob_t1/1/blobs" "/blobs/nodes/0/indices/.blob_t1/1/blobs""#,
        "\n[crate2]\n"
    );
    assert!(stdout.contains(expected_group), "stdout was:\n{stdout}");
}

#[test]
fn config_file_window_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("blobmigrate.toml");
    fs::write(&path, "[versions]\nminimum = \"0.56.0\"\n").unwrap();

    let context = CliContext::new(Some(path)).unwrap();
    let catalog = single_root_cluster(Vec::new()).with_versions(["0.56.9"]);
    let outcome = context.handle_check(&catalog, "text", false);
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.stdout.contains("No migration required."));
}
