//! Separation Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::SeparationDomainError;

/// 公开 API 允许的最小候选数
pub const MIN_RERANKING_CANDIDATES: u32 = 2;

/// 公开 API 允许的最大候选数
pub const MAX_RERANKING_CANDIDATES: u32 = 32;

/// 后端接受的最大候选数（硬上限）
pub const BACKEND_MAX_RERANKING_CANDIDATES: u32 = 7;

pub const DEFAULT_RERANKING_CANDIDATES: u32 = 8;

/// 模型规格
///
/// 托管后端只运行单一模型，规格通过 [`Acceleration`] 映射为速度/质量档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelSize {
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "large")]
    Large,
    #[serde(rename = "large-tv")]
    LargeTv,
}

impl ModelSize {
    /// 目录展示顺序
    pub const ALL: [ModelSize; 4] = [Self::Small, Self::Base, Self::Large, Self::LargeTv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Base => "base",
            Self::Large => "large",
            Self::LargeTv => "large-tv",
        }
    }

    /// 固定查找表
    pub fn acceleration(&self) -> Acceleration {
        match self {
            Self::Small => Acceleration::Fast,
            Self::Base => Acceleration::Balanced,
            Self::Large | Self::LargeTv => Acceleration::Quality,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Small => "Fast",
            Self::Base => "Balanced",
            Self::Large => "Best Quality",
            Self::LargeTv => "Video Optimized",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Small => "Quick processing, good for simple audio",
            Self::Base => "Good balance of speed and quality",
            Self::Large => "Highest quality separation (recommended)",
            Self::LargeTv => "Best for separating audio from video files",
        }
    }
}

impl Default for ModelSize {
    fn default() -> Self {
        Self::Large
    }
}

impl FromStr for ModelSize {
    type Err = SeparationDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "base" => Ok(Self::Base),
            "large" => Ok(Self::Large),
            "large-tv" => Ok(Self::LargeTv),
            other => Err(SeparationDomainError::UnknownModelSize(other.to_string())),
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 加速档位（后端的速度/质量旋钮）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acceleration {
    Fast,
    Balanced,
    Quality,
}

impl Acceleration {
    /// 按模型规格字符串查表，未识别的值降级为 `Balanced`
    pub fn for_model_size(model_size: &str) -> Self {
        model_size
            .parse::<ModelSize>()
            .map(|size| size.acceleration())
            .unwrap_or(Self::Balanced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Quality => "quality",
        }
    }
}

impl std::fmt::Display for Acceleration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 输出编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Wav
    }
}

/// 将候选数收敛到后端接受的 `[1, 7]`
pub fn clamp_reranking_candidates(candidates: u32) -> u32 {
    candidates.clamp(1, BACKEND_MAX_RERANKING_CANDIDATES)
}
