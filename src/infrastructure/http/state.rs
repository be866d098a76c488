//! Application State
//!
//! 路由共享的 Command/Query Handlers

use crate::application::{ListModelsHandler, SeparateAudioHandler};

/// 应用状态
pub struct AppState {
    /// 当前使用的推理后端名称
    pub backend_name: String,

    // ========== Command Handlers ==========
    pub separate_handler: SeparateAudioHandler,

    // ========== Query Handlers ==========
    pub list_models_handler: ListModelsHandler,
}

impl AppState {
    pub fn new(backend_name: impl Into<String>, separate_handler: SeparateAudioHandler) -> Self {
        let backend_name = backend_name.into();
        Self {
            list_models_handler: ListModelsHandler::new(backend_name.clone()),
            backend_name,
            separate_handler,
        }
    }
}
