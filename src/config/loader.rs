//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量（CLEARAUDIO_ 前缀）
//! 2. 配置文件（config.toml）
//! 3. 服务商约定的环境变量（FAL_KEY 等）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, BackendProvider, BlobProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 服务商约定的环境变量 -> 配置键
const CONVENTIONAL_ENV_VARS: &[(&str, &str)] = &[
    ("FAL_KEY", "backend.api_key"),
    ("AUDIO_BACKEND", "backend.provider"),
    ("BLOB_READ_WRITE_TOKEN", "blob.token"),
    ("ALLOWED_ORIGINS", "server.allowed_origins"),
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `CLEARAUDIO_SERVER__PORT=9000`
/// - `CLEARAUDIO_BACKEND__API_KEY=...`（或 `FAL_KEY=...`）
/// - `CLEARAUDIO_BLOB__PROVIDER=file`
/// - `CLEARAUDIO_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.allowed_origins", "http://localhost:3000")?
        .set_default("backend.provider", "fal")?
        .set_default("backend.queue_url", "https://queue.fal.run")?
        .set_default("backend.model_id", "fal-ai/sam-audio/separate")?
        .set_default("backend.api_key", "")?
        .set_default("backend.submit_timeout_secs", 300)?
        .set_default("backend.poll_interval_ms", 500)?
        .set_default("download.timeout_secs", 60)?
        .set_default("blob.provider", "vercel")?
        .set_default("blob.api_url", "https://blob.vercel-storage.com")?
        .set_default("blob.token", "")?
        .set_default("blob.dir", "data/blobs")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 服务商约定的环境变量，作为默认值覆盖
    for (var, key) in CONVENTIONAL_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            let value = if *var == "AUDIO_BACKEND" {
                value.to_lowercase()
            } else {
                value
            };
            builder = builder.set_default(*key, value)?;
        }
    }

    // 3. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 4. 环境变量（最高优先级）
    // 前缀: CLEARAUDIO_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("CLEARAUDIO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.backend.provider == BackendProvider::Modal {
        return Err(ConfigError::ValidationError(
            "The 'modal' backend is not available in this build; set backend.provider to 'fal'"
                .to_string(),
        ));
    }

    if config.backend.queue_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Backend queue URL cannot be empty".to_string(),
        ));
    }

    if config.backend.model_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "Backend model id cannot be empty".to_string(),
        ));
    }

    if config.backend.submit_timeout_secs == 0
        || config.backend.poll_interval_ms == 0
        || config.download.timeout_secs == 0
    {
        return Err(ConfigError::ValidationError(
            "Timeouts and poll interval must be greater than 0".to_string(),
        ));
    }

    if config.blob.provider == BlobProvider::Vercel && config.blob.token.is_empty() {
        return Err(ConfigError::ValidationError(
            "Vercel blob store requires a token (BLOB_READ_WRITE_TOKEN)".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Allowed Origins: {:?}", config.server.allowed_origins());
    tracing::info!("Audio Backend: {}", config.backend.provider.as_str());
    tracing::info!("Backend Model: {}", config.backend.model_id);
    tracing::info!("Backend Queue URL: {}", config.backend.queue_url);
    tracing::info!("Submit Timeout: {}s", config.backend.submit_timeout_secs);
    tracing::info!("Download Timeout: {}s", config.download.timeout_secs);
    tracing::info!("Blob Store: {:?}", config.blob.provider);
    if config.blob.provider == BlobProvider::File {
        tracing::info!("Blob Directory: {:?}", config.blob.dir);
    }
    if config.backend.api_key.is_empty() {
        tracing::warn!("Backend API key is empty; requests will be rejected by the provider");
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
