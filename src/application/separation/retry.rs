//! Retry Policy - 指数退避与可重试分类

use std::time::Duration;

/// 最大尝试次数
pub const MAX_ATTEMPTS: u32 = 3;

/// 退避基准时长
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// 瞬时故障的文本特征（小写匹配）
const RETRYABLE_PATTERNS: &[&str] = &[
    "timeout",
    "connection",
    "502",
    "503",
    "504",
    "rate limit",
    "too many requests",
    "internal server error",
    "temporarily unavailable",
];

/// 判断错误描述是否代表瞬时故障
pub fn is_retryable(message: &str) -> bool {
    let message = message.to_lowercase();
    RETRYABLE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// 重试策略
///
/// 第 k 次尝试（k >= 2）之前等待 `base_delay * 2^(k-2)`，第 1 次不等待。
/// 至少允许一次尝试，只能经 `new` 或 `DEFAULT` 构造
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT: RetryPolicy = RetryPolicy {
        max_attempts: MAX_ATTEMPTS,
        base_delay: RETRY_BASE_DELAY,
    };

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// 第 `attempt` 次尝试前的等待时长
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            return None;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        Some(self.base_delay.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 单次调用内的重试状态
///
/// 尝试计数不会超过 `max_attempts`；最后一次错误始终保留
#[derive(Debug)]
pub struct RetryState<E> {
    policy: RetryPolicy,
    attempt: u32,
    last_error: Option<E>,
}

impl<E> RetryState<E> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            last_error: None,
        }
    }

    /// 进入下一次尝试；预算耗尽时返回 false
    pub fn begin_attempt(&mut self) -> bool {
        if self.attempt >= self.policy.max_attempts {
            return false;
        }
        self.attempt += 1;
        true
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    pub fn record_failure(&mut self, error: E) {
        self.last_error = Some(error);
    }

    pub fn has_remaining(&self) -> bool {
        self.attempt < self.policy.max_attempts
    }

    /// 下一次尝试前的等待时长
    pub fn next_delay(&self) -> Option<Duration> {
        self.policy.delay_before(self.attempt + 1)
    }

    pub fn last_error(&self) -> Option<&E> {
        self.last_error.as_ref()
    }

    pub fn into_last_error(self) -> Option<E> {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_patterns() {
        assert!(is_retryable("Connection timeout"));
        assert!(is_retryable("502 Bad Gateway"));
        assert!(is_retryable("HTTP 503 Service Unavailable: busy"));
        assert!(is_retryable("Rate Limit exceeded"));
        assert!(is_retryable("Too Many Requests"));
        assert!(is_retryable("Internal Server Error"));
        assert!(is_retryable("service temporarily unavailable"));
        assert!(is_retryable("Request TIMEOUT"));
        assert!(is_retryable("HTTP 504 Gateway Timeout"));
        assert!(is_retryable("HTTP 504: upstream"));
        assert!(is_retryable("Connection reset by peer"));
    }

    #[test]
    fn test_non_retryable() {
        assert!(!is_retryable("401 Unauthorized"));
        assert!(!is_retryable("Invalid prompt format"));
        assert!(!is_retryable("HTTP 422 Unprocessable Entity: bad audio_url"));
        assert!(!is_retryable(""));
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::DEFAULT;
        assert_eq!(policy.delay_before(1), None);
        assert_eq!(policy.delay_before(2), Some(Duration::from_secs_f64(2.0)));
        assert_eq!(policy.delay_before(3), Some(Duration::from_secs_f64(4.0)));
        assert_eq!(policy.delay_before(4), Some(Duration::from_secs_f64(8.0)));
    }

    #[test]
    fn test_policy_requires_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);

        let mut state: RetryState<&str> = RetryState::new(policy);
        assert!(state.begin_attempt());
        state.record_failure("boom");
        assert!(!state.begin_attempt());
        assert_eq!(state.attempt(), 1);
        assert_eq!(state.into_last_error(), Some("boom"));
    }

    #[test]
    fn test_state_never_exceeds_max() {
        let mut state: RetryState<String> = RetryState::new(RetryPolicy::DEFAULT);
        let mut started = 0;
        while state.begin_attempt() {
            started += 1;
            state.record_failure(format!("failure {}", started));
        }
        assert_eq!(started, 3);
        assert_eq!(state.attempt(), 3);
        assert!(!state.has_remaining());
        assert!(!state.begin_attempt());
        assert_eq!(state.attempt(), 3);
        assert_eq!(state.into_last_error().as_deref(), Some("failure 3"));
    }

    #[test]
    fn test_state_next_delay() {
        let mut state: RetryState<()> = RetryState::new(RetryPolicy::DEFAULT);
        assert!(state.begin_attempt());
        assert_eq!(state.next_delay(), Some(Duration::from_secs(2)));
        assert!(state.begin_attempt());
        assert_eq!(state.next_delay(), Some(Duration::from_secs(4)));
    }
}
