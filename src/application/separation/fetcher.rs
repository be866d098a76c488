//! Asset Fetcher - 结果资源下载
//!
//! 与提交重试使用相同的退避公式，但预算独立；
//! 每次失败都视为可重试，直到尝试次数耗尽

use std::sync::Arc;

use super::retry::{RetryPolicy, RetryState};
use crate::application::error::ApplicationError;
use crate::application::ports::AssetDownloaderPort;

pub struct AssetFetcher {
    downloader: Arc<dyn AssetDownloaderPort>,
    policy: RetryPolicy,
}

impl AssetFetcher {
    pub fn new(downloader: Arc<dyn AssetDownloaderPort>, policy: RetryPolicy) -> Self {
        Self { downloader, policy }
    }

    /// 下载单个带标签的资源
    pub async fn fetch(&self, url: &str, label: &str) -> Result<Vec<u8>, ApplicationError> {
        let mut state: RetryState<String> = RetryState::new(self.policy);

        while state.begin_attempt() {
            match self.downloader.download(url).await {
                Ok(data) => {
                    tracing::info!(
                        label,
                        size_kb = data.len() as f64 / 1024.0,
                        attempt = state.attempt(),
                        "Downloaded output asset"
                    );
                    return Ok(data);
                }
                Err(err) => {
                    let message = err.to_string();
                    state.record_failure(message.clone());
                    if !state.has_remaining() {
                        break;
                    }
                    if let Some(delay) = state.next_delay() {
                        tracing::warn!(
                            label,
                            attempt = state.attempt(),
                            delay_secs = delay.as_secs_f64(),
                            error = %message,
                            "Asset download failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let attempts = state.attempt();
        Err(ApplicationError::AssetDownload {
            label: label.to_string(),
            attempts,
            message: state.into_last_error().unwrap_or_default(),
        })
    }
}
