//! fal.ai Queue Client - 调用 fal.ai 队列 API
//!
//! 实现 SeparationBackendPort，一次 submit 完成一次完整交换:
//! 1. POST {queue_url}/{model_id}                      提交任务，返回 request_id
//! 2. GET  .../requests/{request_id}/status?logs=1     轮询直到 COMPLETED
//! 3. GET  .../requests/{request_id}                   取回结果 JSON
//!
//! 超过截止时间时先 `PUT .../requests/{request_id}/cancel` 取消任务，再返回超时。
//!
//! 认证头: `Authorization: Key <FAL_KEY>`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

/// 取消请求的超时时间
const CANCEL_TIMEOUT: Duration = Duration::from_secs(10);

use crate::application::ports::{
    BackendError, BackendResponse, QueueObserver, QueueUpdate, SeparationBackendPort,
};
use crate::domain::separation::BackendArguments;

/// 提交响应
#[derive(Debug, Deserialize)]
struct SubmitReply {
    request_id: String,
    #[serde(default)]
    status_url: Option<String>,
    #[serde(default)]
    response_url: Option<String>,
    #[serde(default)]
    cancel_url: Option<String>,
}

/// 状态响应
#[derive(Debug, Deserialize)]
struct StatusReply {
    status: String,
    #[serde(default)]
    queue_position: Option<u64>,
    #[serde(default)]
    logs: Option<Vec<LogEntry>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(default)]
    message: String,
}

/// fal.ai 客户端配置
#[derive(Debug, Clone)]
pub struct FalQueueClientConfig {
    /// 队列 API 基础 URL
    pub queue_url: String,
    /// 模型 ID
    pub model_id: String,
    /// API Key
    pub api_key: String,
    /// 单次提交（含排队与执行）的超时时间（秒）
    pub timeout_secs: u64,
    /// 状态轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl Default for FalQueueClientConfig {
    fn default() -> Self {
        Self {
            queue_url: "https://queue.fal.run".to_string(),
            model_id: "fal-ai/sam-audio/separate".to_string(),
            api_key: String::new(),
            timeout_secs: 300,
            poll_interval_ms: 500,
        }
    }
}

impl FalQueueClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_queue_url(mut self, url: impl Into<String>) -> Self {
        self.queue_url = url.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_poll_interval(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }
}

/// fal.ai 队列客户端
pub struct FalQueueClient {
    client: Client,
    config: FalQueueClientConfig,
}

impl FalQueueClient {
    pub fn new(config: FalQueueClientConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 提交 URL
    fn submit_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.queue_url.trim_end_matches('/'),
            self.config.model_id
        )
    }

    /// 请求 URL（取结果）
    fn request_url(&self, request_id: &str) -> String {
        format!("{}/requests/{}", self.submit_url(), request_id)
    }

    /// 发送请求并检查状态码
    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Key {}", self.config.api_key),
            )
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http { status, body });
        }

        Ok(response)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, BackendError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::InvalidResponse(e.to_string())
                }
            })
    }

    /// 轮询任务状态直到完成
    ///
    /// 每次轮询的超时不超过距截止时间的剩余时长
    async fn wait_for_completion(
        &self,
        status_url: &str,
        deadline: Instant,
        observer: &dyn QueueObserver,
    ) -> Result<(), BackendError> {
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(BackendError::Timeout);
            }

            let status: StatusReply = self
                .read_json(
                    self.client
                        .get(status_url)
                        .query(&[("logs", "1")])
                        .timeout(remaining),
                )
                .await?;

            match status.status.as_str() {
                "IN_QUEUE" => observer.on_update(&QueueUpdate::Queued {
                    position: status.queue_position,
                }),
                "IN_PROGRESS" => observer.on_update(&QueueUpdate::InProgress {
                    logs: status
                        .logs
                        .unwrap_or_default()
                        .into_iter()
                        .map(|entry| entry.message)
                        .collect(),
                }),
                "COMPLETED" => {
                    observer.on_update(&QueueUpdate::Completed);
                    return match status.error {
                        Some(error) => Err(BackendError::Service(error)),
                        None => Ok(()),
                    };
                }
                other => {
                    return Err(BackendError::InvalidResponse(format!(
                        "Unknown job status: {}",
                        other
                    )))
                }
            }

            if Instant::now() + poll_interval > deadline {
                return Err(BackendError::Timeout);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// 取消排队或执行中的任务，失败只记录日志
    async fn cancel(&self, request_id: &str, cancel_url: &str) {
        match self
            .send(self.client.put(cancel_url).timeout(CANCEL_TIMEOUT))
            .await
        {
            Ok(_) => tracing::warn!(request_id = %request_id, "fal.ai job cancelled after timeout"),
            Err(e) => tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Failed to cancel timed out fal.ai job"
            ),
        }
    }
}

#[async_trait]
impl SeparationBackendPort for FalQueueClient {
    fn name(&self) -> &str {
        "fal"
    }

    async fn submit(
        &self,
        arguments: &BackendArguments,
        observer: &dyn QueueObserver,
    ) -> Result<BackendResponse, BackendError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);

        tracing::debug!(
            url = %self.submit_url(),
            acceleration = %arguments.acceleration,
            "Submitting job to fal.ai queue"
        );

        let reply: SubmitReply = self
            .read_json(self.client.post(self.submit_url()).json(arguments))
            .await?;

        let request_url = self.request_url(&reply.request_id);
        let status_url = reply
            .status_url
            .unwrap_or_else(|| format!("{}/status", request_url));
        let cancel_url = reply
            .cancel_url
            .unwrap_or_else(|| format!("{}/cancel", request_url));
        let response_url = reply.response_url.unwrap_or(request_url);

        tracing::info!(request_id = %reply.request_id, "fal.ai job accepted");

        match self
            .wait_for_completion(&status_url, deadline, observer)
            .await
        {
            Ok(()) => {}
            Err(BackendError::Timeout) => {
                self.cancel(&reply.request_id, &cancel_url).await;
                return Err(BackendError::Timeout);
            }
            Err(e) => return Err(e),
        }

        let response: BackendResponse = self.read_json(self.client.get(&response_url)).await?;

        tracing::debug!(
            request_id = %reply.request_id,
            sample_rate = ?response.sample_rate,
            duration = ?response.duration,
            "fal.ai result received"
        );

        Ok(response)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Connection(format!("Cannot connect to fal.ai: {}", e))
    } else {
        BackendError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::separation::{is_retryable, RetryPolicy, RetryingSubmitter};
    use crate::test_support::RecordingObserver;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post, put},
        Json, Router,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    const MODEL_PATH: &str = "/fal-ai/sam-audio/separate";

    #[derive(Default)]
    struct FakeQueue {
        polls: AtomicU32,
        submitted: Mutex<Option<serde_json::Value>>,
        auth: Mutex<Option<String>>,
    }

    async fn submit_job(
        State(queue): State<Arc<FakeQueue>>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        *queue.auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *queue.submitted.lock().unwrap() = Some(body);
        Json(serde_json::json!({"request_id": "req-1"}))
    }

    async fn job_status(
        State(queue): State<Arc<FakeQueue>>,
        Path(id): Path<String>,
    ) -> Json<serde_json::Value> {
        assert_eq!(id, "req-1");
        match queue.polls.fetch_add(1, Ordering::SeqCst) {
            0 => Json(serde_json::json!({"status": "IN_QUEUE", "queue_position": 2})),
            1 => Json(serde_json::json!({
                "status": "IN_PROGRESS",
                "logs": [{"message": "loading model", "level": "INFO"}]
            })),
            _ => Json(serde_json::json!({"status": "COMPLETED"})),
        }
    }

    async fn job_result(Path(_id): Path<String>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "target": {"url": "https://fal.media/target.wav", "content_type": "audio/wav"},
            "residual": {"url": "https://fal.media/residual.wav", "content_type": "audio/wav"},
            "sample_rate": 48000,
            "duration": 10.5
        }))
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> FalQueueClient {
        FalQueueClient::new(
            FalQueueClientConfig::new("test-key")
                .with_queue_url(base_url)
                .with_timeout(10)
                .with_poll_interval(10),
        )
        .unwrap()
    }

    fn arguments() -> BackendArguments {
        BackendArguments::translate("https://example.com/a.wav", "a dog barking", "small", true, 12)
    }

    #[test]
    fn test_config_default() {
        let config = FalQueueClientConfig::default();
        assert_eq!(config.queue_url, "https://queue.fal.run");
        assert_eq!(config.model_id, "fal-ai/sam-audio/separate");
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_urls() {
        let client = client("https://queue.example/");
        assert_eq!(client.submit_url(), "https://queue.example/fal-ai/sam-audio/separate");
        assert_eq!(
            client.request_url("abc"),
            "https://queue.example/fal-ai/sam-audio/separate/requests/abc"
        );
    }

    #[tokio::test]
    async fn test_submit_poll_and_fetch() {
        let queue = Arc::new(FakeQueue::default());
        let router = Router::new()
            .route(MODEL_PATH, post(submit_job))
            .route(&format!("{}/requests/:id/status", MODEL_PATH), get(job_status))
            .route(&format!("{}/requests/:id", MODEL_PATH), get(job_result))
            .with_state(queue.clone());
        let base_url = spawn(router).await;

        let observer = RecordingObserver::default();
        let response = client(&base_url).submit(&arguments(), &observer).await.unwrap();

        assert_eq!(response.target_url(), Some("https://fal.media/target.wav"));
        assert_eq!(response.residual_url(), Some("https://fal.media/residual.wav"));
        assert_eq!(response.sample_rate, Some(48000));

        assert_eq!(queue.auth.lock().unwrap().as_deref(), Some("Key test-key"));
        let submitted = queue.submitted.lock().unwrap().clone().unwrap();
        assert_eq!(submitted["acceleration"], "fast");
        assert_eq!(submitted["reranking_candidates"], 7);
        assert_eq!(submitted["output_format"], "wav");

        assert_eq!(
            observer.updates(),
            vec![
                QueueUpdate::Queued { position: Some(2) },
                QueueUpdate::InProgress {
                    logs: vec!["loading model".to_string()]
                },
                QueueUpdate::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_http_errors_keep_status_text() {
        let router = Router::new()
            .route(
                MODEL_PATH,
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
            );
        let base_url = spawn(router).await;

        let err = client(&base_url)
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable: overloaded");
        assert!(is_retryable(&err.to_string()));
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retryable() {
        let router = Router::new().route(
            MODEL_PATH,
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid key") }),
        );
        let base_url = spawn(router).await;

        let err = client(&base_url)
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BackendError::Http { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
        assert!(!is_retryable(&err.to_string()));
    }

    #[tokio::test]
    async fn test_completed_with_error() {
        let router = Router::new()
            .route(
                MODEL_PATH,
                post(|| async { Json(serde_json::json!({"request_id": "req-9"})) }),
            )
            .route(
                &format!("{}/requests/:id/status", MODEL_PATH),
                get(|| async {
                    Json(serde_json::json!({
                        "status": "COMPLETED",
                        "error": "Invalid prompt format"
                    }))
                }),
            );
        let base_url = spawn(router).await;

        let err = client(&base_url)
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Service("Invalid prompt format".to_string()));
    }

    #[derive(Default)]
    struct StuckQueue {
        submits: AtomicU32,
        cancels: AtomicU32,
    }

    fn stuck_queue_router(queue: Arc<StuckQueue>) -> Router {
        Router::new()
            .route(
                MODEL_PATH,
                post(|State(queue): State<Arc<StuckQueue>>| async move {
                    let n = queue.submits.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(serde_json::json!({"request_id": format!("req-{}", n)}))
                }),
            )
            .route(
                &format!("{}/requests/:id/status", MODEL_PATH),
                get(|| async {
                    Json(serde_json::json!({"status": "IN_QUEUE", "queue_position": 5}))
                }),
            )
            .route(
                &format!("{}/requests/:id/cancel", MODEL_PATH),
                put(|State(queue): State<Arc<StuckQueue>>| async move {
                    queue.cancels.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::ACCEPTED,
                        Json(serde_json::json!({"status": "CANCELLATION_REQUESTED"})),
                    )
                }),
            )
            .with_state(queue)
    }

    fn short_deadline_client(base_url: &str) -> FalQueueClient {
        FalQueueClient::new(
            FalQueueClientConfig::new("test-key")
                .with_queue_url(base_url)
                .with_timeout(1)
                .with_poll_interval(20),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_deadline_cancels_job() {
        let queue = Arc::new(StuckQueue::default());
        let base_url = spawn(stuck_queue_router(queue.clone())).await;

        let started = std::time::Instant::now();
        let err = short_deadline_client(&base_url)
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Timeout);
        assert_eq!(queue.submits.load(Ordering::SeqCst), 1);
        assert_eq!(queue.cancels.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_retried_timeouts_leave_no_running_jobs() {
        let queue = Arc::new(StuckQueue::default());
        let base_url = spawn(stuck_queue_router(queue.clone())).await;

        let submitter = RetryingSubmitter::new(
            Arc::new(short_deadline_client(&base_url)),
            RetryPolicy::new(3, Duration::from_millis(10)),
        );
        let err = submitter
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Request timeout"), "{}", err);
        assert_eq!(queue.submits.load(Ordering::SeqCst), 3);
        assert_eq!(queue.cancels.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_url_from_submit_reply() {
        let queue = Arc::new(StuckQueue::default());
        let cancel_queue = queue.clone();
        let router = Router::new()
            .route(
                MODEL_PATH,
                post(|headers: HeaderMap| async move {
                    let host = headers
                        .get("host")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(serde_json::json!({
                        "request_id": "req-7",
                        "status_url": format!("http://{}/jobs/req-7/status", host),
                        "cancel_url": format!("http://{}/jobs/req-7/stop", host),
                    }))
                }),
            )
            .route(
                "/jobs/req-7/status",
                get(|| async { Json(serde_json::json!({"status": "IN_PROGRESS"})) }),
            )
            .route(
                "/jobs/req-7/stop",
                put(move || {
                    let queue = cancel_queue.clone();
                    async move {
                        queue.cancels.fetch_add(1, Ordering::SeqCst);
                        StatusCode::ACCEPTED
                    }
                }),
            );
        let base_url = spawn(router).await;

        let err = short_deadline_client(&base_url)
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Timeout);
        assert_eq!(queue.cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable() {
        // 绑定后立即释放端口
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .submit(&arguments(), &RecordingObserver::default())
            .await
            .unwrap_err();

        assert!(is_retryable(&err.to_string()), "{}", err);
    }
}
