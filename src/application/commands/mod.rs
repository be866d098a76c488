//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：音频分离

mod separate_commands;

pub mod handlers;

pub use separate_commands::*;
