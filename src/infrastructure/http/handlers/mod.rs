//! HTTP Handlers

mod models;
mod separate;
mod service;

pub use models::*;
pub use separate::*;
pub use service::*;
