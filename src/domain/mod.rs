//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Separation Context: 文本提示音频分离（参数翻译、请求校验、结果值对象）

pub mod separation;
