//! fal.ai Adapter - 托管推理市场后端

mod fal_queue_client;
mod tracing_observer;

pub use fal_queue_client::{FalQueueClient, FalQueueClientConfig};
pub use tracing_observer::TracingQueueObserver;
