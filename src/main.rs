//! ClearAudio - 文本提示音频分离 HTTP 服务
//!
//! - Domain: separation/
//! - Application: separation (retry, fetch, orchestrate), commands, queries, ports
//! - Infrastructure: http, adapters (fal, download, blob)

use std::sync::Arc;

use clearaudio::application::{BlobStorePort, SeparateAudioHandler, SeparationOrchestrator};
use clearaudio::config::{load_config, print_config, AppConfig, BlobProvider};
use clearaudio::infrastructure::adapters::{
    FalQueueClient, FalQueueClientConfig, FileBlobStore, HttpAssetDownloader,
    HttpAssetDownloaderConfig, TracingQueueObserver, VercelBlobStore, VercelBlobStoreConfig,
};
use clearaudio::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},clearaudio={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn create_blob_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStorePort>> {
    let store: Arc<dyn BlobStorePort> = match config.blob.provider {
        BlobProvider::Vercel => Arc::new(VercelBlobStore::new(VercelBlobStoreConfig {
            api_url: config.blob.api_url.clone(),
            token: config.blob.token.clone(),
            timeout_secs: config.download.timeout_secs,
        })?),
        BlobProvider::File => {
            let public_base_url = config
                .blob
                .public_base_url
                .clone()
                .unwrap_or_else(|| config.server.public_base_url());
            Arc::new(FileBlobStore::new(&config.blob.dir, public_base_url).await?)
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 约定环境变量 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("ClearAudio Engine v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 创建 fal.ai 队列客户端
    let backend_config = FalQueueClientConfig::new(config.backend.api_key.clone())
        .with_queue_url(config.backend.queue_url.clone())
        .with_model_id(config.backend.model_id.clone())
        .with_timeout(config.backend.submit_timeout_secs)
        .with_poll_interval(config.backend.poll_interval_ms);
    let backend = Arc::new(FalQueueClient::new(backend_config)?);

    // 创建 CDN 下载器
    let downloader = Arc::new(HttpAssetDownloader::new(HttpAssetDownloaderConfig {
        timeout_secs: config.download.timeout_secs,
    })?);

    // 创建对象存储
    let blob_store = create_blob_store(&config).await?;

    let orchestrator = Arc::new(SeparationOrchestrator::new(
        backend,
        downloader,
        Arc::new(TracingQueueObserver),
    ));
    let backend_name = orchestrator.backend_name().to_string();
    let separate_handler = SeparateAudioHandler::new(orchestrator, blob_store);

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_allowed_origins(config.server.allowed_origins());
    if config.blob.provider == BlobProvider::File {
        server_config = server_config.with_blob_dir(&config.blob.dir);
    }
    let state = AppState::new(backend_name, separate_handler);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
