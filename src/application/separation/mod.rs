//! Separation Core - 重试与翻译层
//!
//! - retry: 退避策略、可重试分类器、单次调用内的重试状态
//! - submitter: 后端提交重试执行器
//! - fetcher: 结果资源下载（独立重试）
//! - orchestrator: 翻译 -> 提交 -> 校验 -> 并发下载 -> 组装

mod fetcher;
mod orchestrator;
mod retry;
mod submitter;

pub use fetcher::AssetFetcher;
pub use orchestrator::SeparationOrchestrator;
pub use retry::{is_retryable, RetryPolicy, RetryState, MAX_ATTEMPTS, RETRY_BASE_DELAY};
pub use submitter::RetryingSubmitter;
