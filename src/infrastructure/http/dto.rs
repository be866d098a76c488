//! Data Transfer Objects

use serde::Serialize;

use crate::application::{ModelCatalog, ModelInfo, SeparateAudioResponse};

// ============================================================================
// Service DTOs
// ============================================================================

/// `GET /` 响应
#[derive(Debug, Serialize)]
pub struct ServiceInfoDto {
    pub status: &'static str,
    pub service: &'static str,
    pub backend: String,
}

/// `GET /health` 响应
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub backend: String,
}

// ============================================================================
// Model DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ModelDto {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub backend_acceleration: &'static str,
}

impl From<ModelInfo> for ModelDto {
    fn from(info: ModelInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            description: info.description,
            backend_acceleration: info.backend_acceleration,
        }
    }
}

/// `GET /api/models` 响应
#[derive(Debug, Serialize)]
pub struct ModelsResponseDto {
    pub models: Vec<ModelDto>,
    pub default: &'static str,
    pub backend: String,
}

impl From<ModelCatalog> for ModelsResponseDto {
    fn from(catalog: ModelCatalog) -> Self {
        Self {
            models: catalog.models.into_iter().map(ModelDto::from).collect(),
            default: catalog.default.as_str(),
            backend: catalog.backend,
        }
    }
}

// ============================================================================
// Separation DTOs
// ============================================================================

/// `POST /api/separate` 成功响应
#[derive(Debug, Serialize)]
pub struct SeparateResponseDto {
    pub target_url: String,
    pub residual_url: String,
    pub sample_rate: u32,
}

impl From<SeparateAudioResponse> for SeparateResponseDto {
    fn from(response: SeparateAudioResponse) -> Self {
        Self {
            target_url: response.target_url,
            residual_url: response.residual_url,
            sample_rate: response.sample_rate,
        }
    }
}
