//! Catalog statements and decoding of their result rows.

use crate::error::MigrationError;
use crate::types::{NodeFsLayout, ShardPathRecord};
use serde_json::Value;
use std::path::PathBuf;

pub const NODE_VERSIONS: &str = "select version['number'] from sys.nodes";

pub const BLOB_TABLE_COUNT: &str =
    "select count(*) from information_schema.tables where table_schema = 'blob'";

pub const NODE_DATA_ROOTS: &str = "select hostname, fs['data']['path'] from sys.nodes";

pub const BLOB_SHARD_PATHS: &str = "select _node['hostname'] as node, path, blob_path \
     from sys.shards where schema_name = 'blob' and path is not null order by 1, 2";

fn unexpected(query: &str, detail: impl Into<String>) -> MigrationError {
    MigrationError::UnexpectedRow {
        query: query.to_string(),
        detail: detail.into(),
    }
}

fn expect_columns<'a>(query: &str, row: &'a [Value], n: usize) -> Result<&'a [Value], MigrationError> {
    if row.len() != n {
        return Err(unexpected(
            query,
            format!("expected {} columns, got {}", n, row.len()),
        ));
    }
    Ok(row)
}

fn as_str<'a>(query: &str, value: &'a Value, column: &str) -> Result<&'a str, MigrationError> {
    value
        .as_str()
        .ok_or_else(|| unexpected(query, format!("column {} is not a string: {}", column, value)))
}

pub fn decode_node_versions(rows: &[Vec<Value>]) -> Result<Vec<String>, MigrationError> {
    rows.iter()
        .map(|row| {
            let row = expect_columns(NODE_VERSIONS, row, 1)?;
            as_str(NODE_VERSIONS, &row[0], "version").map(str::to_string)
        })
        .collect()
}

pub fn decode_blob_table_count(rows: &[Vec<Value>]) -> Result<u64, MigrationError> {
    let row = rows
        .first()
        .ok_or_else(|| unexpected(BLOB_TABLE_COUNT, "no rows returned"))?;
    let row = expect_columns(BLOB_TABLE_COUNT, row, 1)?;
    row[0]
        .as_u64()
        .ok_or_else(|| unexpected(BLOB_TABLE_COUNT, format!("count is not a number: {}", row[0])))
}

pub fn decode_node_data_roots(rows: &[Vec<Value>]) -> Result<Vec<NodeFsLayout>, MigrationError> {
    rows.iter()
        .map(|row| {
            let row = expect_columns(NODE_DATA_ROOTS, row, 2)?;
            let node = as_str(NODE_DATA_ROOTS, &row[0], "hostname")?.to_string();
            let data_roots = match &row[1] {
                Value::Array(items) => items
                    .iter()
                    .map(|item| as_str(NODE_DATA_ROOTS, item, "path").map(PathBuf::from))
                    .collect::<Result<Vec<_>, _>>()?,
                Value::Null => Vec::new(),
                other => {
                    return Err(unexpected(
                        NODE_DATA_ROOTS,
                        format!("data paths are not an array: {}", other),
                    ))
                }
            };
            Ok(NodeFsLayout { node, data_roots })
        })
        .collect()
}

pub fn decode_blob_shard_paths(rows: &[Vec<Value>]) -> Result<Vec<ShardPathRecord>, MigrationError> {
    rows.iter()
        .map(|row| {
            let row = expect_columns(BLOB_SHARD_PATHS, row, 3)?;
            Ok(ShardPathRecord::new(
                as_str(BLOB_SHARD_PATHS, &row[0], "node")?,
                as_str(BLOB_SHARD_PATHS, &row[1], "path")?,
                as_str(BLOB_SHARD_PATHS, &row[2], "blob_path")?,
            ))
        })
        .collect()
}
