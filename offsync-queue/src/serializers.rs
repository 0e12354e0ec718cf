use super::{SyncQueueError, SyncTask};
use serde::{de::DeserializeOwned, Serialize};

pub trait TaskSerializer: Send + Sync {
    fn serialize_task<T>(task: &SyncTask<T>) -> Result<Vec<u8>, SyncQueueError>
    where
        T: Clone + Serialize + DeserializeOwned;

    fn deserialize_task<T>(data: &[u8]) -> Result<SyncTask<T>, SyncQueueError>
    where
        T: Clone + Serialize + DeserializeOwned;
}

#[derive(Debug, Clone, Copy)]
pub struct JsonSerializer;

impl TaskSerializer for JsonSerializer {
    fn serialize_task<T>(task: &SyncTask<T>) -> Result<Vec<u8>, SyncQueueError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        serde_json::to_vec(task)
            .map_err(|e| SyncQueueError::Serialization(e.to_string()))
    }

    fn deserialize_task<T>(data: &[u8]) -> Result<SyncTask<T>, SyncQueueError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        serde_json::from_slice(data)
            .map_err(|e| SyncQueueError::Deserialization(e.to_string()))
    }
}
