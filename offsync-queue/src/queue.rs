//! This module provides a trait for interacting with sync task storage.
//! The storage allows tasks to be pushed to and popped from a queue; a
//! popped task stays in storage until acknowledged, so a failed drain can
//! restore the queue exactly.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt::Debug, sync::Arc};

use super::SyncQueueError;
use crate::task::{SyncTask, SyncTaskId};

#[async_trait]
pub trait SyncQueue<Data>
where
    Data: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn push(&self, task: &SyncTask<Data>) -> Result<(), SyncQueueError>;
    async fn pop(&self) -> Result<SyncTask<Data>, SyncQueueError>;
    async fn ack(&self, task_id: &SyncTaskId) -> Result<(), SyncQueueError>;
    async fn len(&self) -> Result<usize, SyncQueueError>;
}

pub type AbstractSyncQueue<D> = Arc<dyn SyncQueue<D> + Send + Sync>;
