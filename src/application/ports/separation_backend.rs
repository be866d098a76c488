//! Separation Backend Port - 托管推理后端抽象
//!
//! 每个托管服务商一个实现；一次 `submit` 即一次完整的逻辑请求-响应交换
//! （提交任务 -> 轮询/流式状态 -> 取回结果）

use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::separation::BackendArguments;

/// 后端错误
///
/// 文本描述供重试分类器使用，HTTP 错误保留状态码文本（如 `503 Service Unavailable`）
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 后端返回的单个输出资源
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// 后端响应
///
/// 未知字段保留在 `extra` 中，便于诊断时输出完整响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<OutputAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual: Option<OutputAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendResponse {
    /// 目标资源 URL（空字符串视为缺失）
    pub fn target_url(&self) -> Option<&str> {
        asset_url(self.target.as_ref())
    }

    /// 残余资源 URL（空字符串视为缺失）
    pub fn residual_url(&self) -> Option<&str> {
        asset_url(self.residual.as_ref())
    }

    /// 原始 JSON 文本
    pub fn raw(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

fn asset_url(asset: Option<&OutputAsset>) -> Option<&str> {
    asset
        .and_then(|a| a.url.as_deref())
        .filter(|url| !url.is_empty())
}

/// 排队/执行中的状态通知
#[derive(Debug, Clone, PartialEq)]
pub enum QueueUpdate {
    Queued { position: Option<u64> },
    InProgress { logs: Vec<String> },
    Completed,
}

/// 状态通知观察者
///
/// 仅用于观测（日志/遥测），不影响重试控制流
pub trait QueueObserver: Send + Sync {
    fn on_update(&self, update: &QueueUpdate);
}

/// 丢弃所有状态通知
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopQueueObserver;

impl QueueObserver for NoopQueueObserver {
    fn on_update(&self, _update: &QueueUpdate) {}
}

/// Separation Backend Port
#[async_trait]
pub trait SeparationBackendPort: Send + Sync {
    /// 服务商名称（用于日志和错误信息）
    fn name(&self) -> &str;

    /// 提交一次分离任务并等待结果
    async fn submit(
        &self,
        arguments: &BackendArguments,
        observer: &dyn QueueObserver,
    ) -> Result<BackendResponse, BackendError>;
}
