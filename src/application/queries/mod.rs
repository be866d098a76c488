//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：模型目录

mod model_queries;

pub mod handlers;

pub use model_queries::*;
