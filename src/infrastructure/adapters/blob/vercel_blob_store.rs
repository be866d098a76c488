//! Vercel Blob Store - 调用 Vercel Blob HTTP API
//!
//! PUT {api_url}/?pathname=<path>
//! Headers: authorization: Bearer <token>, x-content-type, x-add-random-suffix: 1
//! Response: {"url": "...", "pathname": "...", ...}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::validate_pathname;
use crate::application::ports::{BlobStoreError, BlobStorePort};

const API_VERSION: &str = "7";

#[derive(Debug, Deserialize)]
struct PutReply {
    url: String,
}

/// Vercel Blob 配置
#[derive(Debug, Clone)]
pub struct VercelBlobStoreConfig {
    pub api_url: String,
    /// BLOB_READ_WRITE_TOKEN
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for VercelBlobStoreConfig {
    fn default() -> Self {
        Self {
            api_url: "https://blob.vercel-storage.com".to_string(),
            token: String::new(),
            timeout_secs: 60,
        }
    }
}

pub struct VercelBlobStore {
    client: Client,
    config: VercelBlobStoreConfig,
}

impl VercelBlobStore {
    pub fn new(config: VercelBlobStoreConfig) -> Result<Self, BlobStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BlobStoreError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl BlobStorePort for VercelBlobStore {
    async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        validate_pathname(pathname)?;
        let size = data.len();

        let response = self
            .client
            .put(format!("{}/", self.config.api_url.trim_end_matches('/')))
            .query(&[("pathname", pathname)])
            .bearer_auth(&self.config.token)
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "1")
            .body(data)
            .send()
            .await
            .map_err(|e| BlobStoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::ServiceError(format!("HTTP {}: {}", status, body)));
        }

        let reply: PutReply = response
            .json()
            .await
            .map_err(|e| BlobStoreError::InvalidResponse(e.to_string()))?;

        tracing::debug!(pathname, size, url = %reply.url, "Uploaded blob");

        Ok(reply.url)
    }
}
