//! Separation Context - 请求与结果

use super::errors::SeparationDomainError;
use super::value_objects::{
    ModelSize, DEFAULT_RERANKING_CANDIDATES, MAX_RERANKING_CANDIDATES, MIN_RERANKING_CANDIDATES,
};

/// 后端未返回采样率时使用的默认值（Hz）
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// 分离请求
///
/// 构造时校验公开约束：音频 URL 与描述非空，候选数位于 `[2, 32]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationRequest {
    pub audio_url: String,
    pub description: String,
    pub model_size: ModelSize,
    pub high_quality: bool,
    pub reranking_candidates: u32,
}

impl SeparationRequest {
    pub fn new(
        audio_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SeparationDomainError> {
        let audio_url = audio_url.into();
        let description = description.into();

        if audio_url.trim().is_empty() {
            return Err(SeparationDomainError::MissingAudioUrl);
        }
        if description.trim().is_empty() {
            return Err(SeparationDomainError::MissingDescription);
        }

        Ok(Self {
            audio_url,
            description,
            model_size: ModelSize::default(),
            high_quality: false,
            reranking_candidates: DEFAULT_RERANKING_CANDIDATES,
        })
    }

    pub fn with_model_size(mut self, model_size: ModelSize) -> Self {
        self.model_size = model_size;
        self
    }

    pub fn with_high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = high_quality;
        self
    }

    pub fn with_reranking_candidates(
        mut self,
        candidates: i64,
    ) -> Result<Self, SeparationDomainError> {
        let range = i64::from(MIN_RERANKING_CANDIDATES)..=i64::from(MAX_RERANKING_CANDIDATES);
        if !range.contains(&candidates) {
            return Err(SeparationDomainError::RerankingOutOfRange(candidates));
        }
        self.reranking_candidates = candidates as u32;
        Ok(self)
    }
}

/// 分离结果
///
/// 编排成功结束时一次性构造，之后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationResult {
    pub target_url: String,
    pub residual_url: String,
    pub target_bytes: Vec<u8>,
    pub residual_bytes: Vec<u8>,
    /// 采样率（Hz）
    pub sample_rate: u32,
    /// 音频时长（秒）
    pub duration: f64,
    /// 编排耗时（秒），本地测量
    pub processing_time: f64,
}
