//! Durable record of deferred background-sync work.
//!
//! Sync tasks are created by the client while offline and pushed here; the
//! engine's drain routine reads them back when a connectivity trigger fires
//! and acknowledges them only after the server confirmed the batch.

pub mod backend;
pub mod queue;
pub mod serializers;
pub mod task;

pub use crate::backend::InMemorySyncQueue;
pub use crate::queue::{AbstractSyncQueue, SyncQueue};
pub use crate::serializers::{JsonSerializer, TaskSerializer};
pub use crate::task::{SyncTask, SyncTaskId};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncQueueError {
    #[error("Queue error: {0}")]
    QueueError(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Task not found: {0}")]
    TaskNotFound(SyncTaskId),
    #[error("Queue is empty")]
    QueueEmpty,
}
