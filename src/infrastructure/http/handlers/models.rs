//! Model Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::ListModels;
use crate::infrastructure::http::dto::ModelsResponseDto;
use crate::infrastructure::http::state::AppState;

/// 列出可选模型档位
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponseDto> {
    let catalog = state.list_models_handler.handle(ListModels);
    Json(catalog.into())
}
