//! 测试替身：脚本化后端、内存下载器、内存对象存储、记录型观察者

use async_trait::async_trait;
use http::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::application::ports::{
    AssetDownloaderPort, BackendError, BackendResponse, BlobStoreError, BlobStorePort,
    DownloadError, OutputAsset, QueueObserver, QueueUpdate, SeparationBackendPort,
};
use crate::domain::separation::BackendArguments;

pub const TARGET_URL: &str = "https://fal.media/files/target.wav";
pub const RESIDUAL_URL: &str = "https://fal.media/files/residual.wav";

/// 按顺序返回预设结果，最后一个结果重复使用
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<BackendResponse, BackendError>>>,
    calls: AtomicU32,
    arguments: Mutex<Vec<BackendArguments>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<BackendResponse, BackendError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
            arguments: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(response: BackendResponse) -> Self {
        Self::new(vec![Ok(response)])
    }

    pub fn failing(error: BackendError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_arguments(&self) -> Option<BackendArguments> {
        self.arguments.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SeparationBackendPort for ScriptedBackend {
    fn name(&self) -> &str {
        "fal"
    }

    async fn submit(
        &self,
        arguments: &BackendArguments,
        observer: &dyn QueueObserver,
    ) -> Result<BackendResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.arguments.lock().unwrap().push(arguments.clone());
        observer.on_update(&QueueUpdate::Queued { position: Some(0) });

        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        next.unwrap_or_else(|| Err(BackendError::Service("script exhausted".to_string())))
    }
}

/// 完整的成功响应
pub fn complete_response(sample_rate: Option<u32>) -> BackendResponse {
    BackendResponse {
        target: Some(OutputAsset {
            url: Some(TARGET_URL.to_string()),
            content_type: Some("audio/wav".to_string()),
        }),
        residual: Some(OutputAsset {
            url: Some(RESIDUAL_URL.to_string()),
            content_type: Some("audio/wav".to_string()),
        }),
        sample_rate,
        duration: Some(10.5),
        ..Default::default()
    }
}

/// URL -> 字节的内存下载器，可为指定 URL 注入若干次失败
#[derive(Default)]
pub struct MemoryDownloader {
    assets: HashMap<String, Vec<u8>>,
    failures: Mutex<HashMap<String, u32>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, url: &str, data: &[u8]) -> Self {
        self.assets.insert(url.to_string(), data.to_vec());
        self
    }

    pub fn failing_first(self, url: &str, times: u32) -> Self {
        self.failures.lock().unwrap().insert(url.to_string(), times);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl AssetDownloaderPort for MemoryDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(remaining) = self.failures.lock().unwrap().get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DownloadError::Status(StatusCode::SERVICE_UNAVAILABLE));
            }
        }

        self.assets
            .get(url)
            .cloned()
            .ok_or(DownloadError::Status(StatusCode::NOT_FOUND))
    }
}

/// 内存对象存储
#[derive(Default)]
pub struct MemoryBlobStore {
    fail: bool,
    stored: Mutex<Vec<(String, Vec<u8>, String)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Vec<(String, Vec<u8>, String)> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStorePort for MemoryBlobStore {
    async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        if self.fail {
            return Err(BlobStoreError::ServiceError("blob store offline".to_string()));
        }
        self.stored
            .lock()
            .unwrap()
            .push((pathname.to_string(), data, content_type.to_string()));
        Ok(format!("https://blob.test/{}", pathname))
    }
}

/// 记录所有状态通知
#[derive(Default)]
pub struct RecordingObserver {
    updates: Mutex<Vec<QueueUpdate>>,
}

impl RecordingObserver {
    pub fn updates(&self) -> Vec<QueueUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl QueueObserver for RecordingObserver {
    fn on_update(&self, update: &QueueUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}
