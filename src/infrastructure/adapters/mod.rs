//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod blob;
pub mod download;
pub mod fal;

pub use blob::*;
pub use download::*;
pub use fal::*;
