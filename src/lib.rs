//! ClearAudio - 文本提示音频分离 HTTP 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Separation Context: 分离请求、模型档位与后端参数翻译
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SeparationBackend, AssetDownloader, BlobStore）
//! - Separation: 重试执行、资源下载与分离编排
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: fal.ai 队列客户端、CDN 下载器、对象存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{load_config, AppConfig};
