//! Background-sync drain.
//!
//! Deferred work recorded while offline is transmitted when a connectivity
//! trigger fires. The drain is all-or-nothing: the whole batch goes to the
//! server in one request, tasks are acknowledged only after the server
//! confirmed it, and a failed transmission restores the queue exactly so
//! the next trigger retries the identical batch.

use crate::fetcher::AbstractFetcher;
use crate::EngineError;
use offsync_queue::{AbstractSyncQueue, SyncQueueError, SyncTask};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info, warn};
use url::Url;

pub struct SyncDrain<D>
where
    D: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    queue: AbstractSyncQueue<D>,
    fetcher: AbstractFetcher,
    endpoint: Url,
    tag: String,
}

impl<D> SyncDrain<D>
where
    D: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        queue: AbstractSyncQueue<D>,
        fetcher: AbstractFetcher,
        endpoint: Url,
        tag: String,
    ) -> Self {
        Self {
            queue,
            fetcher,
            endpoint,
            tag,
        }
    }

    /// Handle a connectivity-regained trigger. Returns how many tasks were
    /// transmitted; a tag the drain was not registered for is ignored.
    pub async fn on_trigger(&self, tag: &str) -> Result<usize, EngineError> {
        if tag != self.tag {
            debug!(tag, "ignoring sync trigger for unknown tag");
            return Ok(0);
        }

        let mut batch = Vec::new();
        loop {
            match self.queue.pop().await {
                Ok(task) => batch.push(task),
                Err(SyncQueueError::QueueEmpty) => break,
                Err(err) => return Err(err.into()),
            }
        }

        if batch.is_empty() {
            debug!("sync trigger with nothing pending");
            return Ok(0);
        }

        let payloads: Vec<&D> = batch.iter().map(SyncTask::get_payload).collect();
        let body = serde_json::to_value(&payloads)?;

        match self.fetcher.post_json(&self.endpoint, &body).await {
            Ok(response) if response.is_success() => {
                for task in &batch {
                    self.queue.ack(&task.task_id).await?;
                }
                info!(count = batch.len(), "sync batch transmitted");
                Ok(batch.len())
            }
            outcome => {
                // Restore the queue exactly; the next trigger retries
                // the same batch.
                for task in &batch {
                    self.queue.push(task).await?;
                }
                let reason = match outcome {
                    Ok(response) => format!("server replied {}", response.status),
                    Err(err) => err.to_string(),
                };
                warn!(count = batch.len(), "sync batch rejected: {reason}");
                Err(EngineError::Sync(reason))
            }
        }
    }
}
