//! Separation Orchestrator - 分离流程编排
//!
//! 线性流程：翻译 -> 提交（重试）-> 校验结果 -> 并发下载 -> 组装结果
//! 编排层自身不做任何重试

use futures_util::future::try_join;
use std::sync::Arc;
use std::time::Instant;

use super::fetcher::AssetFetcher;
use super::retry::RetryPolicy;
use super::submitter::RetryingSubmitter;
use crate::application::error::ApplicationError;
use crate::application::ports::{AssetDownloaderPort, QueueObserver, SeparationBackendPort};
use crate::domain::separation::{
    BackendArguments, SeparationRequest, SeparationResult, DEFAULT_SAMPLE_RATE,
};

pub struct SeparationOrchestrator {
    submitter: RetryingSubmitter,
    fetcher: AssetFetcher,
    observer: Arc<dyn QueueObserver>,
}

impl SeparationOrchestrator {
    /// 使用默认重试策略创建
    pub fn new(
        backend: Arc<dyn SeparationBackendPort>,
        downloader: Arc<dyn AssetDownloaderPort>,
        observer: Arc<dyn QueueObserver>,
    ) -> Self {
        Self::with_policies(
            backend,
            downloader,
            observer,
            RetryPolicy::DEFAULT,
            RetryPolicy::DEFAULT,
        )
    }

    /// 提交与下载各自使用独立的策略实例
    pub fn with_policies(
        backend: Arc<dyn SeparationBackendPort>,
        downloader: Arc<dyn AssetDownloaderPort>,
        observer: Arc<dyn QueueObserver>,
        submit_policy: RetryPolicy,
        download_policy: RetryPolicy,
    ) -> Self {
        Self {
            submitter: RetryingSubmitter::new(backend, submit_policy),
            fetcher: AssetFetcher::new(downloader, download_policy),
            observer,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.submitter.backend_name()
    }

    pub async fn separate(
        &self,
        request: &SeparationRequest,
    ) -> Result<SeparationResult, ApplicationError> {
        let start = Instant::now();

        let arguments = BackendArguments::from(request);
        tracing::info!(
            backend = %self.backend_name(),
            audio_url = %arguments.audio_url,
            prompt = %arguments.prompt,
            acceleration = %arguments.acceleration,
            predict_spans = arguments.predict_spans,
            reranking_candidates = ?arguments.reranking_candidates,
            "Starting separation"
        );

        let response = self
            .submitter
            .submit(&arguments, self.observer.as_ref())
            .await?;

        let (target_url, residual_url) = match (response.target_url(), response.residual_url()) {
            (Some(target), Some(residual)) => (target.to_string(), residual.to_string()),
            (target, residual) => {
                return Err(ApplicationError::IncompleteResult {
                    backend: self.backend_name().to_string(),
                    target_url: target.unwrap_or_default().to_string(),
                    residual_url: residual.unwrap_or_default().to_string(),
                    raw: response.raw(),
                });
            }
        };

        let (target_bytes, residual_bytes) = try_join(
            self.fetcher.fetch(&target_url, "target"),
            self.fetcher.fetch(&residual_url, "residual"),
        )
        .await?;

        let sample_rate = response.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
        let duration = response.duration.unwrap_or(0.0);
        let processing_time = start.elapsed().as_secs_f64();

        tracing::info!(
            duration_secs = duration,
            sample_rate,
            target_kb = target_bytes.len() as f64 / 1024.0,
            residual_kb = residual_bytes.len() as f64 / 1024.0,
            processing_secs = processing_time,
            "Separation completed"
        );

        Ok(SeparationResult {
            target_url,
            residual_url,
            target_bytes,
            residual_bytes,
            sample_rate,
            duration,
            processing_time,
        })
    }
}
