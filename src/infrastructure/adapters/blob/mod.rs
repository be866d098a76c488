//! Blob Adapter - 公开对象存储实现
//!
//! - VercelBlobStore: Vercel Blob HTTP API
//! - FileBlobStore: 本地目录 + 静态文件服务

mod file_blob_store;
mod vercel_blob_store;

pub use file_blob_store::{FileBlobStore, BLOB_ROUTE};
pub use vercel_blob_store::{VercelBlobStore, VercelBlobStoreConfig};

use crate::application::ports::BlobStoreError;

/// 校验路径提示，拒绝绝对路径与 `..`
pub(crate) fn validate_pathname(pathname: &str) -> Result<(), BlobStoreError> {
    let invalid = pathname.is_empty()
        || pathname.starts_with('/')
        || pathname.contains('\\')
        || pathname.split('/').any(|part| part.is_empty() || part == "." || part == "..");

    if invalid {
        return Err(BlobStoreError::InvalidPath(pathname.to_string()));
    }
    Ok(())
}
