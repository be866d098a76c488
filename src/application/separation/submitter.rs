//! Retry Executor - 后端提交的有界重试
//!
//! 每次尝试恰好调用一次 `SeparationBackendPort::submit`；
//! 不可重试错误立即终止，重试耗尽后返回统一的 `BackendSubmission` 错误

use std::sync::Arc;

use super::retry::{is_retryable, RetryPolicy, RetryState};
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendResponse, QueueObserver, SeparationBackendPort};
use crate::domain::separation::BackendArguments;

/// 日志中错误描述的最大长度
const ERROR_LOG_LIMIT: usize = 200;

pub struct RetryingSubmitter {
    backend: Arc<dyn SeparationBackendPort>,
    policy: RetryPolicy,
}

impl RetryingSubmitter {
    pub fn new(backend: Arc<dyn SeparationBackendPort>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn submit(
        &self,
        arguments: &BackendArguments,
        observer: &dyn QueueObserver,
    ) -> Result<BackendResponse, ApplicationError> {
        let mut state: RetryState<String> = RetryState::new(self.policy);

        while state.begin_attempt() {
            tracing::info!(
                backend = %self.backend.name(),
                attempt = state.attempt(),
                max_attempts = state.max_attempts(),
                "Submitting separation job"
            );

            match self.backend.submit(arguments, observer).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    let message = err.to_string();
                    let retryable = is_retryable(&message);
                    tracing::warn!(
                        backend = %self.backend.name(),
                        attempt = state.attempt(),
                        retryable,
                        error = %truncate(&message, ERROR_LOG_LIMIT),
                        "Separation attempt failed"
                    );
                    state.record_failure(message);

                    if !retryable || !state.has_remaining() {
                        break;
                    }
                    if let Some(delay) = state.next_delay() {
                        tracing::info!(
                            delay_secs = delay.as_secs_f64(),
                            "Retrying separation job"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let attempts = state.attempt();
        Err(ApplicationError::BackendSubmission {
            backend: self.backend.name().to_string(),
            attempts,
            message: state.into_last_error().unwrap_or_default(),
        })
    }
}

fn truncate(message: &str, limit: usize) -> &str {
    match message.char_indices().nth(limit) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{BackendError, NoopQueueObserver};
    use crate::test_support::{complete_response, RecordingObserver, ScriptedBackend};
    use http::StatusCode;
    use std::time::Duration;

    fn arguments() -> BackendArguments {
        BackendArguments::translate("https://example.com/a.wav", "voice", "large", false, 8)
    }

    fn unavailable() -> BackendError {
        BackendError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "try later".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_has_no_delay() {
        let backend = Arc::new(ScriptedBackend::succeeding(complete_response(Some(48000))));
        let submitter = RetryingSubmitter::new(backend.clone(), RetryPolicy::DEFAULT);

        let start = tokio::time::Instant::now();
        let response = submitter.submit(&arguments(), &NoopQueueObserver).await.unwrap();

        assert_eq!(response.sample_rate, Some(48000));
        assert_eq!(backend.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_three_attempts_with_backoff() {
        let backend = Arc::new(ScriptedBackend::failing(unavailable()));
        let submitter = RetryingSubmitter::new(backend.clone(), RetryPolicy::DEFAULT);

        let start = tokio::time::Instant::now();
        let err = submitter.submit(&arguments(), &NoopQueueObserver).await.unwrap_err();

        assert_eq!(backend.calls(), 3);
        // 2.0s + 4.0s
        assert_eq!(start.elapsed(), Duration::from_secs(6));
        match err {
            ApplicationError::BackendSubmission {
                backend,
                attempts,
                message,
            } => {
                assert_eq!(backend, "fal");
                assert_eq!(attempts, 3);
                assert!(message.contains("503"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_aborts_immediately() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Http {
            status: StatusCode::UNAUTHORIZED,
            body: "bad key".to_string(),
        }));
        let submitter = RetryingSubmitter::new(backend.clone(), RetryPolicy::DEFAULT);

        let start = tokio::time::Instant::now();
        let err = submitter.submit(&arguments(), &NoopQueueObserver).await.unwrap_err();

        assert_eq!(backend.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(err.to_string().contains("failed after 1 attempt:"));
        assert!(err.to_string().contains("401 Unauthorized"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(BackendError::Timeout),
            Ok(complete_response(None)),
        ]));
        let submitter = RetryingSubmitter::new(backend.clone(), RetryPolicy::DEFAULT);

        let start = tokio::time::Instant::now();
        let response = submitter.submit(&arguments(), &NoopQueueObserver).await;

        assert!(response.is_ok());
        assert_eq!(backend.calls(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_error_is_surfaced() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(BackendError::Timeout),
            Err(BackendError::Connection("reset by peer".to_string())),
            Err(BackendError::Service("rate limit reached".to_string())),
        ]));
        let submitter = RetryingSubmitter::new(backend, RetryPolicy::DEFAULT);

        let err = submitter.submit(&arguments(), &NoopQueueObserver).await.unwrap_err();
        assert!(err.to_string().ends_with("Service error: rate limit reached"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_is_side_channel_only() {
        let backend = Arc::new(ScriptedBackend::failing(BackendError::Timeout));
        let policy = RetryPolicy::new(2, Duration::from_millis(10));
        let submitter = RetryingSubmitter::new(backend.clone(), policy);
        let observer = RecordingObserver::default();

        let _ = submitter.submit(&arguments(), &observer).await;

        assert_eq!(backend.calls(), 2);
        assert_eq!(observer.updates().len(), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("错误信息", 2), "错误");
    }
}
