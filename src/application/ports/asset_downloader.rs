//! Asset Downloader Port - 结果资源下载抽象
//!
//! 单次 GET，不含重试；重试由 `AssetFetcher` 负责

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DownloadError {
    #[error("Request timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("Failed to read body: {0}")]
    Body(String),
}

#[async_trait]
pub trait AssetDownloaderPort: Send + Sync {
    /// 下载 URL 指向的字节内容，仅 2xx 视为成功
    async fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}
