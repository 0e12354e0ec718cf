use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncTaskId(Uuid);

/// A `SyncTask` is a single unit of deferred work: an opaque payload of type
/// `D` recorded while the application was offline, waiting to be pushed to
/// the server. The payload is never inspected by the queue; it is read and
/// transmitted wholesale by the drain routine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncTask<D: Clone> {
    pub task_id: SyncTaskId,
    pub payload: D,
    pub queued_at: DateTime<Utc>,
}

impl<D: Clone> SyncTask<D> {
    pub fn new(payload: D) -> Self {
        SyncTask {
            task_id: SyncTaskId::new(),
            payload,
            queued_at: Utc::now(),
        }
    }

    pub fn get_payload(&self) -> &D {
        &self.payload
    }
}

//*****************************************************************************
// SyncTaskId with ser/de traits implemented (to convert underlaying Uuid)
//*****************************************************************************

impl SyncTaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for SyncTaskId {
    fn default() -> Self {
        Self::new()
    }
}

// Custom serialization for SyncTaskId.
impl serde::Serialize for SyncTaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Directly serialize the inner Uuid.
        self.0.serialize(serializer)
    }
}

// Custom deserialization for SyncTaskId.
impl<'de> serde::Deserialize<'de> for SyncTaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Deserialize a Uuid and then wrap it in a SyncTaskId.
        let uuid = Uuid::deserialize(deserializer)?;
        Ok(SyncTaskId(uuid))
    }
}

impl std::fmt::Display for SyncTaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyncTaskId({})", self.0)
    }
}

//*****************************************************************************
// Tests
//*****************************************************************************
