//! Separation Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeparationDomainError {
    #[error("audio_url is required")]
    MissingAudioUrl,

    #[error("description is required")]
    MissingDescription,

    #[error("Unknown model_size: {0:?}. Expected one of small, base, large, large-tv")]
    UnknownModelSize(String),

    #[error("reranking_candidates must be between 2 and 32")]
    RerankingOutOfRange(i64),
}
