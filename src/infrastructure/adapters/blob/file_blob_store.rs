//! File Blob Store - 本地文件系统对象存储
//!
//! 文件写入 `base_dir`，由 HTTP 服务器在 `/blobs` 下静态托管

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use super::validate_pathname;
use crate::application::ports::{BlobStoreError, BlobStorePort};

/// 静态托管路径前缀
pub const BLOB_ROUTE: &str = "/blobs";

pub struct FileBlobStore {
    /// 存储根目录
    base_dir: PathBuf,
    /// 对外访问的 Base URL
    public_base_url: String,
}

impl FileBlobStore {
    /// 创建新的文件存储
    pub async fn new(
        base_dir: impl AsRef<Path>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, BlobStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 为路径追加随机后缀：`output/target.wav` -> `output/target-<suffix>.wav`
    fn suffixed(pathname: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        let suffix = &suffix[..12];
        let (dir, file) = match pathname.rsplit_once('/') {
            Some((dir, file)) => (Some(dir), file),
            None => (None, pathname),
        };
        let file = match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, suffix, ext),
            _ => format!("{}-{}", file, suffix),
        };
        match dir {
            Some(dir) => format!("{}/{}", dir, file),
            None => file,
        }
    }
}

#[async_trait]
impl BlobStorePort for FileBlobStore {
    async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, BlobStoreError> {
        validate_pathname(pathname)?;

        let relative = Self::suffixed(pathname);
        let path = self.base_dir.join(&relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobStoreError::IoError(e.to_string()))?;
        }

        fs::write(&path, &data)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        tracing::debug!("Saved blob: path={}, size={} bytes", path.display(), data.len());

        Ok(format!("{}{}/{}", self.public_base_url, BLOB_ROUTE, relative))
    }
}
