//! Blob Store Port - 公开对象存储抽象
//!
//! 接收原始字节、内容类型与路径提示，返回公开访问 URL

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Invalid blob path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Blob service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// 上传数据；存储端会为路径追加随机后缀
    async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError>;
}
