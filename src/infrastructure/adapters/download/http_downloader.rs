//! HTTP Asset Downloader - 从 CDN 直接下载结果音频
//!
//! 实现 AssetDownloaderPort，单次 GET，超时短于后端提交

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{AssetDownloaderPort, DownloadError};

/// 下载器配置
#[derive(Debug, Clone)]
pub struct HttpAssetDownloaderConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpAssetDownloaderConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

pub struct HttpAssetDownloader {
    client: Client,
}

impl HttpAssetDownloader {
    pub fn new(config: HttpAssetDownloaderConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DownloadError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl AssetDownloaderPort for HttpAssetDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::Timeout
            } else {
                DownloadError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| DownloadError::Body(e.to_string()))?;

        Ok(data.to_vec())
    }
}
