//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，边界层据此映射 HTTP 状态码

use thiserror::Error;

use crate::domain::separation::SeparationDomainError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 请求违反公开约束
    #[error("{0}")]
    ValidationError(String),

    /// 枚举字段取值不受支持
    #[error("{0}")]
    UnsupportedValue(String),

    /// 后端提交失败（重试耗尽或不可重试错误）
    #[error("{backend} request failed after {attempts} {}: {message}", attempt_noun(.attempts))]
    BackendSubmission {
        backend: String,
        attempts: u32,
        message: String,
    },

    /// 后端成功返回但缺少结果资源 URL
    #[error(
        "{backend} returned incomplete result: target_url={target_url:?}, residual_url={residual_url:?}. Full response: {raw}"
    )]
    IncompleteResult {
        backend: String,
        target_url: String,
        residual_url: String,
        raw: String,
    },

    /// 结果资源下载失败
    #[error("Failed to download {label} after {attempts} {}: {message}", attempt_noun(.attempts))]
    AssetDownload {
        label: String,
        attempts: u32,
        message: String,
    },

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 是否为上游（托管后端/CDN）导致的失败
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::BackendSubmission { .. }
                | Self::IncompleteResult { .. }
                | Self::AssetDownload { .. }
        )
    }
}

fn attempt_noun(attempts: &u32) -> &'static str {
    if *attempts == 1 {
        "attempt"
    } else {
        "attempts"
    }
}

impl From<SeparationDomainError> for ApplicationError {
    fn from(err: SeparationDomainError) -> Self {
        match err {
            SeparationDomainError::UnknownModelSize(_) => {
                Self::UnsupportedValue(err.to_string())
            }
            _ => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<crate::application::ports::BlobStoreError> for ApplicationError {
    fn from(err: crate::application::ports::BlobStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}
