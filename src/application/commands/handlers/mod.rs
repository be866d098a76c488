//! Command Handlers 实现

mod separate_handlers;

pub use separate_handlers::*;
