//! Tracing Queue Observer - 将队列状态写入日志

use crate::application::ports::{QueueObserver, QueueUpdate};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingQueueObserver;

impl QueueObserver for TracingQueueObserver {
    fn on_update(&self, update: &QueueUpdate) {
        match update {
            QueueUpdate::Queued { position } => {
                tracing::info!(position = ?position, "Separation job queued");
            }
            QueueUpdate::InProgress { logs } => {
                for line in logs {
                    tracing::debug!(target: "clearaudio::backend_log", "{}", line);
                }
            }
            QueueUpdate::Completed => {
                tracing::debug!("Separation job completed");
            }
        }
    }
}
