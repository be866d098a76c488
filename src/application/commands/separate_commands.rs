//! Separate Commands - 音频分离命令

/// 分离命令（边界层解析后的原始参数）
#[derive(Debug, Clone)]
pub struct SeparateAudioCommand {
    pub audio_url: String,
    pub description: String,
    pub model_size: String,
    pub high_quality: bool,
    pub reranking_candidates: i64,
}

/// 分离响应（URL 均为对象存储的公开地址）
#[derive(Debug, Clone, PartialEq)]
pub struct SeparateAudioResponse {
    pub target_url: String,
    pub residual_url: String,
    pub sample_rate: u32,
}
