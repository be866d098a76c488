//! Parameter Translator - 公开参数到后端参数的翻译
//!
//! 纯函数，不会失败：未知模型规格降级为 `balanced`，候选数收敛到后端上限

use serde::Serialize;

use super::request::SeparationRequest;
use super::value_objects::{clamp_reranking_candidates, Acceleration, OutputFormat};

/// 后端调用参数
///
/// `reranking_candidates` 仅在高质量模式下存在；
/// 该键是否出现本身对后端有意义，因此序列化时整体省略
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendArguments {
    pub audio_url: String,
    pub prompt: String,
    pub acceleration: Acceleration,
    pub output_format: OutputFormat,
    pub predict_spans: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reranking_candidates: Option<u32>,
}

impl BackendArguments {
    pub fn translate(
        audio_url: &str,
        prompt: &str,
        model_size: &str,
        high_quality: bool,
        reranking_candidates: u32,
    ) -> Self {
        Self {
            audio_url: audio_url.to_string(),
            prompt: prompt.to_string(),
            acceleration: Acceleration::for_model_size(model_size),
            output_format: OutputFormat::Wav,
            predict_spans: high_quality,
            reranking_candidates: high_quality
                .then(|| clamp_reranking_candidates(reranking_candidates)),
        }
    }
}

impl From<&SeparationRequest> for BackendArguments {
    fn from(request: &SeparationRequest) -> Self {
        Self::translate(
            &request.audio_url,
            &request.description,
            request.model_size.as_str(),
            request.high_quality,
            request.reranking_candidates,
        )
    }
}
