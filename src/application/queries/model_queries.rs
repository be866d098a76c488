//! Model Queries - 模型目录查询

/// 列出可选模型规格
#[derive(Debug, Clone, Default)]
pub struct ListModels;
