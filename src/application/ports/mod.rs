//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod asset_downloader;
mod blob_store;
mod separation_backend;

pub use asset_downloader::{AssetDownloaderPort, DownloadError};
pub use blob_store::{BlobStoreError, BlobStorePort};
pub use separation_backend::{
    BackendError, BackendResponse, NoopQueueObserver, OutputAsset, QueueObserver, QueueUpdate,
    SeparationBackendPort,
};
