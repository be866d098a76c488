//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 推理后端配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 结果下载配置
    #[serde(default)]
    pub download: DownloadConfig,

    /// 对象存储配置
    #[serde(default)]
    pub blob: BlobConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 允许跨域的来源，逗号分隔
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }

    /// 解析跨域来源列表
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 推理后端服务商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// fal.ai 托管推理市场
    Fal,
    /// Modal 无服务器 GPU（本服务未实现）
    Modal,
}

impl BackendProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fal => "fal",
            Self::Modal => "modal",
        }
    }
}

impl Default for BackendProvider {
    fn default() -> Self {
        Self::Fal
    }
}

/// 推理后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub provider: BackendProvider,

    /// 队列 API 基础 URL
    #[serde(default = "default_queue_url")]
    pub queue_url: String,

    /// 模型 ID
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// API Key（FAL_KEY）
    #[serde(default)]
    pub api_key: String,

    /// 单次提交超时时间（秒）
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    /// 状态轮询间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_queue_url() -> String {
    "https://queue.fal.run".to_string()
}

fn default_model_id() -> String {
    "fal-ai/sam-audio/separate".to_string()
}

fn default_submit_timeout() -> u64 {
    300
}

fn default_poll_interval() -> u64 {
    500
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            queue_url: default_queue_url(),
            model_id: default_model_id(),
            api_key: String::new(),
            submit_timeout_secs: default_submit_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// 结果下载配置
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_download_timeout")]
    pub timeout_secs: u64,
}

fn default_download_timeout() -> u64 {
    60
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_download_timeout(),
        }
    }
}

/// 对象存储服务商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobProvider {
    /// Vercel Blob
    Vercel,
    /// 本地目录，经 /blobs 静态托管
    File,
}

impl Default for BlobProvider {
    fn default() -> Self {
        Self::Vercel
    }
}

/// 对象存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    #[serde(default)]
    pub provider: BlobProvider,

    /// Vercel Blob API URL
    #[serde(default = "default_blob_api_url")]
    pub api_url: String,

    /// Vercel Blob 读写 Token（BLOB_READ_WRITE_TOKEN）
    #[serde(default)]
    pub token: String,

    /// 本地存储目录
    #[serde(default = "default_blob_dir")]
    pub dir: PathBuf,

    /// 本地存储对外 Base URL，未设置时使用服务器的公开地址
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_blob_api_url() -> String {
    "https://blob.vercel-storage.com".to_string()
}

fn default_blob_dir() -> PathBuf {
    PathBuf::from("data/blobs")
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            provider: BlobProvider::default(),
            api_url: default_blob_api_url(),
            token: String::new(),
            dir: default_blob_dir(),
            public_base_url: None,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
