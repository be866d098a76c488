//! HTTP Routes
//!
//! API Endpoints:
//! - /               GET   服务信息
//! - /health         GET   健康检查
//! - /api/models     GET   列出模型档位
//! - /api/separate   POST  文本提示音频分离

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/models", get(handlers::list_models))
        .route("/separate", post(handlers::separate_audio))
}
