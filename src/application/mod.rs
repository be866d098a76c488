//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SeparationBackend、AssetDownloader、BlobStore）
//! - separation: 重试与翻译核心（提交重试、资源下载、编排）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod separation;

// Re-exports
pub use commands::{handlers::SeparateAudioHandler, SeparateAudioCommand, SeparateAudioResponse};

pub use error::ApplicationError;

pub use ports::{
    AssetDownloaderPort, BackendError, BackendResponse, BlobStoreError, BlobStorePort,
    DownloadError, NoopQueueObserver, OutputAsset, QueueObserver, QueueUpdate,
    SeparationBackendPort,
};

pub use queries::{
    handlers::{ListModelsHandler, ModelCatalog, ModelInfo},
    ListModels,
};

pub use separation::{AssetFetcher, RetryPolicy, RetryingSubmitter, SeparationOrchestrator};
