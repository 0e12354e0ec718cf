//! In-memory implementation of the SyncQueue trait. Popped tasks stay in
//! the storage map until acknowledged; re-pushing a popped task restores it
//! to the pending list without duplicating storage.
use crate::task::{SyncTask, SyncTaskId};
use crate::{SyncQueue, SyncQueueError, TaskSerializer};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use std::sync::Mutex;

pub struct InMemorySyncQueue<D, S>
where
    S: TaskSerializer,
{
    pub hashmap: Mutex<HashMap<SyncTaskId, Vec<u8>>>,
    pub list: Mutex<VecDeque<SyncTaskId>>,
    _marker: PhantomData<(D, S)>,
}

impl<D, S> InMemorySyncQueue<D, S>
where
    S: TaskSerializer,
{
    pub fn new() -> Self {
        Self {
            hashmap: Mutex::new(HashMap::new()),
            list: Mutex::new(VecDeque::new()),
            _marker: PhantomData,
        }
    }
}

impl<D, S> Default for InMemorySyncQueue<D, S>
where
    S: TaskSerializer,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D, S> SyncQueue<D> for InMemorySyncQueue<D, S>
where
    D: std::fmt::Debug
        + Clone
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
    S: TaskSerializer + Send + Sync,
{
    async fn push(&self, task: &SyncTask<D>) -> Result<(), SyncQueueError> {
        let mut list = self
            .list
            .lock()
            .map_err(|e| SyncQueueError::QueueError(e.to_string()))?;
        let mut hashmap = self
            .hashmap
            .lock()
            .map_err(|e| SyncQueueError::QueueError(e.to_string()))?;

        let task_bytes = S::serialize_task(task)?;
        hashmap.insert(task.task_id, task_bytes);
        list.push_back(task.task_id);
        Ok(())
    }

    async fn pop(&self) -> Result<SyncTask<D>, SyncQueueError> {
        let mut list = self
            .list
            .lock()
            .map_err(|e| SyncQueueError::QueueError(e.to_string()))?;
        let hashmap = self
            .hashmap
            .lock()
            .map_err(|e| SyncQueueError::QueueError(e.to_string()))?;

        if let Some(task_id) = list.pop_front() {
            let task_bytes = hashmap
                .get(&task_id)
                .ok_or(SyncQueueError::TaskNotFound(task_id))?;
            S::deserialize_task(task_bytes)
        } else {
            Err(SyncQueueError::QueueEmpty)
        }
    }

    async fn ack(&self, task_id: &SyncTaskId) -> Result<(), SyncQueueError> {
        let mut hashmap = self
            .hashmap
            .lock()
            .map_err(|e| SyncQueueError::QueueError(e.to_string()))?;
        hashmap
            .remove(task_id)
            .ok_or(SyncQueueError::TaskNotFound(*task_id))?;
        Ok(())
    }

    async fn len(&self) -> Result<usize, SyncQueueError> {
        let list = self
            .list
            .lock()
            .map_err(|e| SyncQueueError::QueueError(e.to_string()))?;
        Ok(list.len())
    }
}

impl<D, S> std::fmt::Debug for InMemorySyncQueue<D, S>
where
    S: TaskSerializer,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hashmap = self.hashmap.lock().unwrap();
        let list = self.list.lock().unwrap();

        f.debug_struct("InMemorySyncQueue")
            .field("hashmap_size", &hashmap.len())
            .field("list", &*list)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonSerializer;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        value: u32,
    }

    #[tokio::test]
    async fn test_push_and_pop() {
        let queue = InMemorySyncQueue::<TestData, JsonSerializer>::new();
        let task = SyncTask::new(TestData { value: 42 });

        queue.push(&task).await.unwrap();
        let popped_task = queue.pop().await.unwrap();

        assert_eq!(popped_task.payload, TestData { value: 42 });
    }

    #[tokio::test]
    async fn test_queue_empty() {
        let queue = InMemorySyncQueue::<TestData, JsonSerializer>::new();

        match queue.pop().await {
            Err(SyncQueueError::QueueEmpty) => (),
            _ => panic!("Expected QueueEmpty error"),
        }
    }

    #[tokio::test]
    async fn test_ack() {
        let queue = InMemorySyncQueue::<TestData, JsonSerializer>::new();
        let task = SyncTask::new(TestData { value: 42 });

        queue.push(&task).await.unwrap();
        let popped_task = queue.pop().await.unwrap();
        queue.ack(&popped_task.task_id).await.unwrap();

        // The queue should be empty after ack
        assert!(matches!(queue.pop().await, Err(SyncQueueError::QueueEmpty)));
        assert_eq!(queue.hashmap.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_repush_after_pop_restores_task() {
        let queue = InMemorySyncQueue::<TestData, JsonSerializer>::new();
        let task = SyncTask::new(TestData { value: 42 });

        queue.push(&task).await.unwrap();
        let popped_task = queue.pop().await.unwrap();

        // Drain failed: the task goes back into the pending list
        queue.push(&popped_task).await.unwrap();
        assert_eq!(queue.len().await.unwrap(), 1);

        let again = queue.pop().await.unwrap();
        assert_eq!(again.task_id, task.task_id);
        // Storage still holds exactly one copy
        assert_eq!(queue.hashmap.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_multiple_tasks_fifo_order() {
        let queue = InMemorySyncQueue::<TestData, JsonSerializer>::new();
        let tasks = vec![
            SyncTask::new(TestData { value: 1 }),
            SyncTask::new(TestData { value: 2 }),
            SyncTask::new(TestData { value: 3 }),
        ];

        for task in &tasks {
            queue.push(task).await.unwrap();
        }
        assert_eq!(queue.len().await.unwrap(), 3);

        for expected_task in tasks {
            let popped_task = queue.pop().await.unwrap();
            assert_eq!(popped_task.payload, expected_task.payload);
        }

        // Queue should be empty now
        assert!(matches!(queue.pop().await, Err(SyncQueueError::QueueEmpty)));
    }

    #[tokio::test]
    async fn test_task_not_found() {
        let queue = InMemorySyncQueue::<TestData, JsonSerializer>::new();
        let non_existent_task_id = SyncTaskId::new();

        match queue.ack(&non_existent_task_id).await {
            Err(SyncQueueError::TaskNotFound(_)) => (),
            _ => panic!("Expected TaskNotFound error"),
        }
    }
}
