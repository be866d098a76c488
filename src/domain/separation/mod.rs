//! Separation Context - 文本提示音频分离
//!
//! - value_objects: 模型规格、加速档位、输出编码、候选数范围
//! - arguments: 参数翻译（公开参数 -> 后端参数）
//! - request: 分离请求与分离结果

mod arguments;
mod errors;
mod request;
mod value_objects;

pub use arguments::BackendArguments;
pub use errors::SeparationDomainError;
pub use request::{SeparationRequest, SeparationResult, DEFAULT_SAMPLE_RATE};
pub use value_objects::{
    clamp_reranking_candidates, Acceleration, ModelSize, OutputFormat,
    BACKEND_MAX_RERANKING_CANDIDATES, DEFAULT_RERANKING_CANDIDATES, MAX_RERANKING_CANDIDATES,
    MIN_RERANKING_CANDIDATES,
};
