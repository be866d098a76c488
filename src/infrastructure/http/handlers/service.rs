//! Service Handlers
//!
//! 服务信息与健康检查

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{HealthDto, ServiceInfoDto};
use crate::infrastructure::http::state::AppState;

const SERVICE_NAME: &str = "ClearAudio Engine";

/// 服务信息
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfoDto> {
    Json(ServiceInfoDto {
        status: "ok",
        service: SERVICE_NAME,
        backend: state.backend_name.clone(),
    })
}

/// 健康检查
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy",
        backend: state.backend_name.clone(),
    })
}
