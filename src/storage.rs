//! Blocking client for the object-storage backend holding exported flows.
//!
//! The backend is a Supabase-style storage REST API: objects live under
//! `{bucket}/{user_id}/{filename}` and are publicly readable through the
//! `/object/public/` prefix. Uploads that collide with an existing object
//! are retried under a numbered filename rather than overwritten.

use crate::error::StorageError;
use crate::flow::FlowDocument;
use ahash::AHashMap;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BUCKET: &str = "workflows";
const MAX_RENAME_ATTEMPTS: u32 = 100;

const ENV_URL: &str = "CHATLOOM_STORAGE_URL";
const ENV_KEY: &str = "CHATLOOM_STORAGE_KEY";
const ENV_BUCKET: &str = "CHATLOOM_STORAGE_BUCKET";

/// Connection settings for the storage backend.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Loads settings from the environment (a `.env` file is honored when
    /// present).
    pub fn from_env() -> Result<Self, StorageError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(ENV_URL).map_err(|_| StorageError::MissingEnv { name: ENV_URL })?;
        let service_key =
            std::env::var(ENV_KEY).map_err(|_| StorageError::MissingEnv { name: ENV_KEY })?;
        let mut config = Self::new(base_url, service_key);
        if let Ok(bucket) = std::env::var(ENV_BUCKET) {
            config = config.with_bucket(bucket);
        }
        Ok(config)
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFlow {
    /// Final filename, possibly renamed to avoid a conflict.
    pub filename: String,
    pub storage_path: String,
    /// Public retrieval URL.
    pub url: String,
    pub size: usize,
}

/// One remote flow file as returned by `list`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub name: String,
    pub url: String,
    pub created_at: Option<String>,
    pub size: u64,
}

/// Counts summarizing a downloaded document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub variable_count: usize,
    pub node_types: AHashMap<String, usize>,
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
    created_at: Option<String>,
    metadata: Option<Value>,
}

/// Ensures a flow filename carries the `.json` extension.
pub fn normalize_filename(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}

/// Object key of a flow file within the bucket.
pub fn object_path(user_id: &str, filename: &str) -> String {
    format!("{user_id}/{filename}")
}

/// Blocking storage client.
pub struct StorageClient {
    config: StorageConfig,
    http: reqwest::blocking::Client,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self, StorageError> {
        Self::new(StorageConfig::from_env()?)
    }

    /// Public retrieval URL of an object.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.config.base_url, self.config.bucket
        )
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{path}",
            self.config.base_url, self.config.bucket
        )
    }

    /// Uploads an exported document, renaming on conflict (`name_1.json`,
    /// `name_2.json`, …). Returns the final filename and public URL.
    pub fn upload(
        &self,
        document: &FlowDocument,
        filename: &str,
        user_id: &str,
    ) -> Result<StoredFlow, StorageError> {
        let filename = normalize_filename(filename);
        let base_name = filename.trim_end_matches(".json").to_string();
        let body = serde_json::to_string_pretty(document)?;
        let size = body.len();

        let mut attempt = 0;
        let mut final_filename = filename;
        loop {
            let path = object_path(user_id, &final_filename);
            debug!(%path, "uploading flow document");
            let response = self
                .http
                .post(self.object_url(&path))
                .bearer_auth(&self.config.service_key)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()?;

            let status = response.status();
            if status.is_success() {
                let url = self.public_url(&path);
                info!(filename = %final_filename, %url, "flow document stored");
                return Ok(StoredFlow {
                    filename: final_filename,
                    storage_path: path,
                    url,
                    size,
                });
            }

            // 409 means the object exists; some backends report the same
            // conflict as 400.
            if (status.as_u16() == 409 || status.as_u16() == 400)
                && attempt < MAX_RENAME_ATTEMPTS
            {
                attempt += 1;
                final_filename = format!("{base_name}_{attempt}.json");
                warn!(
                    status = status.as_u16(),
                    retry = %final_filename,
                    "upload conflict; retrying under a new name"
                );
                continue;
            }

            return Err(StorageError::UploadRejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
    }

    /// Lists the caller's stored flow files. An unreachable listing endpoint
    /// is reported as an empty directory, matching the backend's behavior
    /// for prefixes that were never written.
    pub fn list(&self, user_id: &str) -> Result<Vec<RemoteFile>, StorageError> {
        let url = format!(
            "{}/storage/v1/object/list/{}",
            self.config.base_url, self.config.bucket
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.service_key)
            .json(&serde_json::json!({ "prefix": format!("{user_id}/"), "limit": 100 }))
            .send()?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let entries: Vec<ListEntry> = response.json()?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.name.ends_with(".json"))
            .map(|entry| {
                let path = object_path(user_id, &entry.name);
                RemoteFile {
                    url: self.public_url(&path),
                    size: entry
                        .metadata
                        .as_ref()
                        .and_then(|meta| meta.get("size"))
                        .and_then(Value::as_u64)
                        .unwrap_or(0),
                    created_at: entry.created_at,
                    name: entry.name,
                }
            })
            .collect())
    }

    /// Downloads a stored document and summarizes its contents.
    pub fn download(
        &self,
        filename: &str,
        user_id: &str,
    ) -> Result<(Value, FlowSummary), StorageError> {
        let filename = normalize_filename(filename);
        let path = object_path(user_id, &filename);
        let response = self.http.get(self.public_url(&path)).send()?;

        if !response.status().is_success() {
            return Err(StorageError::NotFound { filename });
        }

        let document: Value = response.json()?;
        let summary = summarize(&document);
        Ok((document, summary))
    }
}

fn summarize(document: &Value) -> FlowSummary {
    let mut summary = FlowSummary::default();
    if let Some(nodes) = document.get("nodes").and_then(Value::as_array) {
        summary.node_count = nodes.len();
        for node in nodes {
            if let Some(node_type) = node.get("type").and_then(Value::as_str) {
                *summary.node_types.entry(node_type.to_string()).or_insert(0) += 1;
            }
        }
    }
    summary.edge_count = document
        .get("edges")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    summary.variable_count = document
        .get("variables")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    summary
}
