use blobmigrate::analyze::Check;
use blobmigrate::error::VersionBound;
use blobmigrate::types::ShardPathRecord;
use blobmigrate::{ExitStatus, MigrationError, Validator, Verdict};
use std::path::PathBuf;

use crate::integration::support::{layout, single_root_cluster};

#[test]
fn default_layout_needs_no_migration() {
    let catalog = single_root_cluster(vec![
        ShardPathRecord::new(
            "crate1",
            "/data/nodes/0/indices/.blob_images/0",
            "/data/nodes/0/indices/.blob_images/0/blobs",
        ),
        ShardPathRecord::new(
            "crate2",
            "/data/nodes/0/indices/.blob_images/1",
            "/data/nodes/0/indices/.blob_images/1/blobs",
        ),
    ]);
    let verdict = Validator::new(&catalog).run().unwrap();
    assert_eq!(verdict, Verdict::Compliant);
    assert_eq!(verdict.exit_status(), ExitStatus::Ok);
    assert_eq!(catalog.query_count(), 4);
}

#[test]
fn custom_blob_path_reports_every_visited_node() {
    let catalog = single_root_cluster(vec![
        ShardPathRecord::new(
            "crate2",
            "/data/nodes/0/indices/.blob_images/1",
            "/blobs/indices/.blob_images/1/blobs",
        ),
        ShardPathRecord::new(
            "crate1",
            "/data/nodes/0/indices/.blob_images/0",
            "/data/nodes/0/indices/.blob_images/0/blobs",
        ),
        ShardPathRecord::new(
            "crate2",
            "/data/nodes/1/indices/.blob_images/0",
            "/blobs/indices/.blob_images/0/blobs",
        ),
    ]);
    let verdict = Validator::new(&catalog).run().unwrap();
    let (check, report) = match verdict {
        Verdict::MigrationRequired { check, report } => (check, report),
        other => panic!("unexpected verdict: {other:?}"),
    };
    assert_eq!(check, Check::CustomBlobPath);

    let nodes: Vec<&str> = report.nodes().collect();
    assert_eq!(nodes, vec!["crate1", "crate2"]);
    assert!(report.get("crate1").unwrap().is_empty());

    let moves: Vec<String> = report
        .get("crate2")
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(
        moves,
        vec![
            r#"mv "/blobs/indices/.blob_images/1/blobs" "/blobs/nodes/0/indices/.blob_images/1/blobs""#,
            r#"mv "/blobs/indices/.blob_images/0/blobs" "/blobs/nodes/1/indices/.blob_images/0/blobs""#,
        ]
    );
}

#[test]
fn multiple_data_roots_are_checked_first() {
    let catalog = single_root_cluster(vec![
        ShardPathRecord::new(
            "crate1",
            "/data1/nodes/0/indices/.blob_images/0",
            "/data1/nodes/0/indices/.blob_images/0/blobs",
        ),
        ShardPathRecord::new(
            "crate1",
            "/data2/nodes/0/indices/.blob_images/1",
            "/data1/nodes/0/indices/.blob_images/1/blobs",
        ),
    ])
    .with_layouts(vec![layout("crate1", &["/data1", "/data2"])]);

    let verdict = Validator::new(&catalog).run().unwrap();
    match verdict {
        Verdict::MigrationRequired { check, report } => {
            assert_eq!(check, Check::MultipleDataPaths);
            let commands = report.get("crate1").unwrap();
            assert_eq!(commands.len(), 1);
            assert_eq!(
                commands[0].destination,
                PathBuf::from("/data2/nodes/0/indices/.blob_images/1")
            );
        }
        other => panic!("unexpected verdict: {other:?}"),
    }
}

#[test]
fn multiple_roots_without_misplaced_blobs_fall_through_to_custom_check() {
    let catalog = single_root_cluster(vec![ShardPathRecord::new(
        "crate1",
        "/data2/nodes/0/indices/.blob_images/1",
        "/data2/nodes/0/indices/.blob_images/1/blobs",
    )])
    .with_layouts(vec![layout("crate1", &["/data1", "/data2"])]);

    let verdict = Validator::new(&catalog).run().unwrap();
    assert_eq!(verdict, Verdict::Compliant);
}

#[test]
fn no_blob_tables_skips_path_queries() {
    let catalog = single_root_cluster(vec![ShardPathRecord::new(
        "crate1",
        "/data/indices/.blob_images/0",
        "/elsewhere/indices/.blob_images/0/blobs",
    )])
    .with_blob_tables(0);

    let verdict = Validator::new(&catalog).run().unwrap();
    assert_eq!(verdict, Verdict::NoBlobTables);
    assert_eq!(catalog.query_count(), 2);
}

#[test]
fn migrated_cluster_is_rejected() {
    let catalog = single_root_cluster(Vec::new()).with_versions(["0.57.6", "1.0.0"]);
    let err = Validator::new(&catalog).run().unwrap_err();
    match err {
        MigrationError::VersionOutOfWindow { bound, version, .. } => {
            assert_eq!(bound, VersionBound::AtOrAboveNext);
            assert_eq!(version, "1.0.0");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_version_is_fatal() {
    let catalog = single_root_cluster(Vec::new()).with_versions(["0.57.6-SNAPSHOT"]);
    let err = Validator::new(&catalog).run().unwrap_err();
    assert!(err.is_fatal_precondition());
    assert!(matches!(err, MigrationError::MalformedVersion { .. }));
}
