//! Model Query Handlers

use crate::application::queries::ListModels;
use crate::domain::separation::ModelSize;

// ============================================================================
// Response DTOs
// ============================================================================

/// 模型条目
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub backend_acceleration: &'static str,
}

impl From<ModelSize> for ModelInfo {
    fn from(size: ModelSize) -> Self {
        Self {
            id: size.as_str(),
            name: size.display_name(),
            description: size.description(),
            backend_acceleration: size.acceleration().as_str(),
        }
    }
}

/// 模型目录
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pub models: Vec<ModelInfo>,
    pub default: ModelSize,
    pub backend: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListModels Handler
pub struct ListModelsHandler {
    backend: String,
}

impl ListModelsHandler {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }

    pub fn handle(&self, _query: ListModels) -> ModelCatalog {
        ModelCatalog {
            models: ModelSize::ALL.into_iter().map(ModelInfo::from).collect(),
            default: ModelSize::default(),
            backend: self.backend.clone(),
        }
    }
}
