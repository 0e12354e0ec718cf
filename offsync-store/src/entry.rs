use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stored response snapshot.
///
/// Key material (method + absolute URL) lives with the namespace map; the
/// snapshot carries everything needed to replay the response byte-identically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseSnapshot {
    /// HTTP response status code
    pub status: u16,
    /// HTTP response headers
    pub headers: HashMap<String, String>,
    /// The HTTP response body
    pub body: Vec<u8>,
    /// When this snapshot was stored
    pub stored_at: DateTime<Utc>,
}

impl ResponseSnapshot {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: Utc::now(),
        }
    }

    /// Whether the snapshotted response carried a success status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
