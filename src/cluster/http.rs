//! HTTP `_sql` endpoint client.
//!
//! Each catalog read is one blocking POST of `{"stmt": ...}`; requests are
//! sequential and never retried.

use super::queries;
use super::ClusterCatalog;
use crate::config::ClusterSettings;
use crate::error::MigrationError;
use crate::types::{NodeFsLayout, ShardPathRecord};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Successful `_sql` response body.
#[derive(Debug, Deserialize)]
pub struct SqlResponse {
    #[serde(default)]
    pub cols: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SqlErrorBody {
    error: SqlError,
}

#[derive(Debug, Deserialize)]
struct SqlError {
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

/// Build the `_sql` endpoint URL from a `host[:port]` or full URL.
pub fn sql_endpoint(scheme: &str, host: &str) -> Result<Url, MigrationError> {
    let base = if host.contains("://") {
        host.to_string()
    } else {
        format!("{}://{}", scheme, host)
    };
    let base = Url::parse(&base)
        .map_err(|e| MigrationError::ConfigError(format!("Invalid host {}: {}", host, e)))?;
    base.join("/_sql")
        .map_err(|e| MigrationError::ConfigError(format!("Invalid host {}: {}", host, e)))
}

/// Decode a response body for `stmt`, turning error bodies into errors.
pub fn decode_response(stmt: &str, status: u16, body: &str) -> Result<SqlResponse, MigrationError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| {
            MigrationError::Introspection(format!("Invalid response to `{}`: {}", stmt, e))
        });
    }
    match serde_json::from_str::<SqlErrorBody>(body) {
        Ok(err) => Err(MigrationError::Introspection(match err.error.code {
            Some(code) => format!("`{}` failed ({}): {}", stmt, code, err.error.message),
            None => format!("`{}` failed: {}", stmt, err.error.message),
        })),
        Err(_) => Err(MigrationError::Introspection(format!(
            "`{}` failed: HTTP {}",
            stmt, status
        ))),
    }
}

/// Catalog backed by a node's HTTP endpoint.
pub struct HttpCatalog {
    endpoint: Url,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    username: Option<String>,
    password: Option<String>,
}

impl HttpCatalog {
    pub fn connect(settings: &ClusterSettings) -> Result<Self, MigrationError> {
        let endpoint = sql_endpoint(&settings.scheme, &settings.host)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| MigrationError::Introspection(format!("Failed to build client: {}", e)))?;
        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            MigrationError::Introspection(format!("Failed to create runtime: {}", e))
        })?;
        Ok(Self {
            endpoint,
            client,
            runtime,
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    fn execute(&self, stmt: &str) -> Result<SqlResponse, MigrationError> {
        debug!(endpoint = %self.endpoint, stmt, "Issuing catalog query");
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "stmt": stmt }));
        if let Some(user) = &self.username {
            request = request.basic_auth(user, self.password.as_ref());
        }

        let (status, body) = self.runtime.block_on(async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .map_err(|e| MigrationError::Introspection(format!("`{}` failed: {}", stmt, e)))?;

        let response = decode_response(stmt, status, &body)?;
        debug!(stmt, rows = response.rows.len(), "Catalog query returned");
        Ok(response)
    }
}

impl ClusterCatalog for HttpCatalog {
    fn node_versions(&self) -> Result<Vec<String>, MigrationError> {
        let response = self.execute(queries::NODE_VERSIONS)?;
        queries::decode_node_versions(&response.rows)
    }

    fn blob_table_count(&self) -> Result<u64, MigrationError> {
        let response = self.execute(queries::BLOB_TABLE_COUNT)?;
        queries::decode_blob_table_count(&response.rows)
    }

    fn node_data_roots(&self) -> Result<Vec<NodeFsLayout>, MigrationError> {
        let response = self.execute(queries::NODE_DATA_ROOTS)?;
        queries::decode_node_data_roots(&response.rows)
    }

    fn blob_shard_paths(&self) -> Result<Vec<ShardPathRecord>, MigrationError> {
        let response = self.execute(queries::BLOB_SHARD_PATHS)?;
        queries::decode_blob_shard_paths(&response.rows)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}
