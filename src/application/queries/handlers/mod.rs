//! Query Handlers 实现

mod model_handlers;

pub use model_handlers::*;
