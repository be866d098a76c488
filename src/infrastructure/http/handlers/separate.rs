//! Separate Handler
//!
//! `POST /api/separate`，接受 urlencoded 或 multipart 表单

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::SeparateAudioCommand;
use crate::domain::separation::{ModelSize, DEFAULT_RERANKING_CANDIDATES};
use crate::infrastructure::http::dto::SeparateResponseDto;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Form
// ============================================================================

/// 分离请求表单
///
/// 缺失的必填字段解析为空字符串，由领域层校验并返回 400
#[derive(Debug, Clone, PartialEq)]
pub struct SeparateForm {
    pub audio_url: String,
    pub description: String,
    pub model_size: String,
    pub high_quality: bool,
    pub reranking_candidates: i64,
}

impl SeparateForm {
    fn from_fields(mut fields: HashMap<String, String>) -> Result<Self, ApiError> {
        let audio_url = fields.remove("audio_url").unwrap_or_default();
        let description = fields.remove("description").unwrap_or_default();
        let model_size = fields
            .remove("model_size")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| ModelSize::default().as_str().to_string());

        let high_quality = match fields.remove("high_quality") {
            Some(value) => parse_bool("high_quality", &value)?,
            None => false,
        };

        let reranking_candidates = match fields.remove("reranking_candidates") {
            Some(value) => value.trim().parse::<i64>().map_err(|_| {
                ApiError::Unprocessable(format!(
                    "reranking_candidates must be an integer, got {:?}",
                    value
                ))
            })?,
            None => i64::from(DEFAULT_RERANKING_CANDIDATES),
        };

        Ok(Self {
            audio_url,
            description,
            model_size,
            high_quality,
            reranking_candidates,
        })
    }

    async fn read_multipart(mut multipart: Multipart) -> Result<HashMap<String, String>, ApiError> {
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(|e| {
                ApiError::BadRequest(format!("Failed to read field {}: {}", name, e))
            })?;
            fields.insert(name, value);
        }

        Ok(fields)
    }
}

#[async_trait]
impl<S> FromRequest<S> for SeparateForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        let fields = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Self::read_multipart(multipart).await?
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Unprocessable(e.body_text()))?;
            fields
        };

        Self::from_fields(fields)
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ApiError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApiError::Unprocessable(format!(
            "{} must be a boolean, got {:?}",
            field, value
        ))),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 分离音频：提交后端 -> 下载两轨 -> 上传对象存储
pub async fn separate_audio(
    State(state): State<Arc<AppState>>,
    form: SeparateForm,
) -> Result<Json<SeparateResponseDto>, ApiError> {
    let cmd = SeparateAudioCommand {
        audio_url: form.audio_url,
        description: form.description,
        model_size: form.model_size,
        high_quality: form.high_quality,
        reranking_candidates: form.reranking_candidates,
    };

    let result = state.separate_handler.handle(cmd).await?;

    Ok(Json(result.into()))
}
