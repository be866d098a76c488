//! Separate Command Handler
//!
//! 校验公开参数 -> 调用编排器 -> 并发上传两个结果资源到对象存储

use futures_util::future::try_join;
use std::sync::Arc;

use crate::application::commands::separate_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::BlobStorePort;
use crate::application::separation::SeparationOrchestrator;
use crate::domain::separation::{ModelSize, OutputFormat, SeparationRequest};

/// SeparateAudio Handler - 音频分离
pub struct SeparateAudioHandler {
    orchestrator: Arc<SeparationOrchestrator>,
    blob_store: Arc<dyn BlobStorePort>,
}

impl SeparateAudioHandler {
    pub fn new(
        orchestrator: Arc<SeparationOrchestrator>,
        blob_store: Arc<dyn BlobStorePort>,
    ) -> Self {
        Self {
            orchestrator,
            blob_store,
        }
    }

    pub async fn handle(
        &self,
        cmd: SeparateAudioCommand,
    ) -> Result<SeparateAudioResponse, ApplicationError> {
        let request = SeparationRequest::new(cmd.audio_url, cmd.description)?
            .with_reranking_candidates(cmd.reranking_candidates)?
            .with_model_size(cmd.model_size.parse::<ModelSize>()?)
            .with_high_quality(cmd.high_quality);

        tracing::info!(
            backend = %self.orchestrator.backend_name(),
            audio_url = %request.audio_url,
            description = %request.description,
            model_size = %request.model_size,
            high_quality = request.high_quality,
            reranking_candidates = request.reranking_candidates,
            "Separation requested"
        );

        let result = self.orchestrator.separate(&request).await?;

        let format = OutputFormat::Wav;
        let target_path = format!("output/target.{}", format.extension());
        let residual_path = format!("output/residual.{}", format.extension());
        let (target_url, residual_url) = try_join(
            self.blob_store
                .put(&target_path, result.target_bytes, format.content_type()),
            self.blob_store
                .put(&residual_path, result.residual_bytes, format.content_type()),
        )
        .await?;

        tracing::info!(
            target_url = %target_url,
            residual_url = %residual_url,
            "Separation outputs stored"
        );

        Ok(SeparateAudioResponse {
            target_url,
            residual_url,
            sample_rate: result.sample_rate,
        })
    }
}
