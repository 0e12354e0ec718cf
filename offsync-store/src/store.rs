use crate::{ResponseSnapshot, StoreError};
use async_trait::async_trait;
use std::sync::Arc;

/// Core cache store trait that backends must implement.
///
/// A store holds any number of named namespaces, each mapping a request key
/// (the absolute URL; only GET responses are ever stored) to a response
/// snapshot. Absence of an entry or a namespace is a normal `None`/`false`
/// result, never an error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store a snapshot, overwriting any existing entry for the same key.
    /// Creates the namespace if it does not exist yet.
    async fn put(
        &self,
        namespace: &str,
        key: &str,
        snapshot: ResponseSnapshot,
    ) -> Result<(), StoreError>;

    /// Look up a snapshot. Pure read, no side effects.
    async fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<ResponseSnapshot>, StoreError>;

    /// Check whether an entry exists without copying the snapshot out.
    async fn contains(&self, namespace: &str, key: &str) -> Result<bool, StoreError>;

    /// Remove a whole namespace atomically. Returns `false` when the
    /// namespace did not exist.
    async fn delete_namespace(&self, namespace: &str) -> Result<bool, StoreError>;

    /// Names of all namespaces currently held by the store.
    async fn namespaces(&self) -> Result<Vec<String>, StoreError>;
}

pub type AbstractCacheStore = Arc<dyn CacheStore + Send + Sync>;
