//! Download Adapter - CDN 资源下载

mod http_downloader;

pub use http_downloader::{HttpAssetDownloader, HttpAssetDownloaderConfig};
