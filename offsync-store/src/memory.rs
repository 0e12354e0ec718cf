//! In-memory implementation of the CacheStore trait. Namespaces are plain
//! maps behind a single mutex; deleting a namespace is one map removal, so
//! it is atomic from the caller's point of view.
use crate::{CacheStore, ResponseSnapshot, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

type NamespaceMap = HashMap<String, HashMap<String, ResponseSnapshot>>;

#[derive(Default)]
pub struct MemoryCacheStore {
    namespaces: Mutex<NamespaceMap>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, NamespaceMap>, StoreError> {
        self.namespaces
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn put(
        &self,
        namespace: &str,
        key: &str,
        snapshot: ResponseSnapshot,
    ) -> Result<(), StoreError> {
        let mut namespaces = self.lock()?;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), snapshot);
        Ok(())
    }

    async fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<ResponseSnapshot>, StoreError> {
        let namespaces = self.lock()?;
        Ok(namespaces
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn contains(&self, namespace: &str, key: &str) -> Result<bool, StoreError> {
        let namespaces = self.lock()?;
        Ok(namespaces
            .get(namespace)
            .is_some_and(|entries| entries.contains_key(key)))
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<bool, StoreError> {
        let mut namespaces = self.lock()?;
        Ok(namespaces.remove(namespace).is_some())
    }

    async fn namespaces(&self) -> Result<Vec<String>, StoreError> {
        let namespaces = self.lock()?;
        Ok(namespaces.keys().cloned().collect())
    }
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let namespaces = self.namespaces.lock().unwrap();
        let mut dbg = f.debug_struct("MemoryCacheStore");
        for (name, entries) in namespaces.iter() {
            dbg.field(name, &entries.len());
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn snapshot(body: &str) -> ResponseSnapshot {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());
        ResponseSnapshot::new(200, headers, body.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_put_and_get_roundtrip() {
        let store = MemoryCacheStore::new();
        let snap = snapshot("<html>hello</html>");

        store
            .put("static-v2", "http://localhost:5000/mobile/improved", snap.clone())
            .await
            .unwrap();

        let got = store
            .get("static-v2", "http://localhost:5000/mobile/improved")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.status, snap.status);
        assert_eq!(got.headers, snap.headers);
        assert_eq!(got.body, snap.body);
    }

    #[tokio::test]
    async fn test_miss_is_none_not_error() {
        let store = MemoryCacheStore::new();
        let got = store.get("static-v2", "http://localhost:5000/missing").await;
        assert!(matches!(got, Ok(None)));
    }

    #[tokio::test]
    async fn test_put_overwrites_same_key() {
        let store = MemoryCacheStore::new();
        let key = "http://localhost:5000/api/categories";

        store.put("api-v2", key, snapshot("old")).await.unwrap();
        store.put("api-v2", key, snapshot("new")).await.unwrap();

        let got = store.get("api-v2", key).await.unwrap().unwrap();
        assert_eq!(got.body, b"new");
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let store = MemoryCacheStore::new();
        let key = "http://localhost:5000/thing";

        store.put("static-v2", key, snapshot("a")).await.unwrap();
        assert!(!store.contains("api-v2", key).await.unwrap());
        assert!(store.contains("static-v2", key).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_namespace() {
        let store = MemoryCacheStore::new();
        store
            .put("static-v1", "http://localhost:5000/a", snapshot("a"))
            .await
            .unwrap();

        assert!(store.delete_namespace("static-v1").await.unwrap());
        // Second delete is a normal false, not an error
        assert!(!store.delete_namespace("static-v1").await.unwrap());
        assert!(store
            .get("static-v1", "http://localhost:5000/a")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_namespace_listing() {
        let store = MemoryCacheStore::new();
        store
            .put("static-v2", "http://localhost:5000/a", snapshot("a"))
            .await
            .unwrap();
        store
            .put("api-v2", "http://localhost:5000/b", snapshot("b"))
            .await
            .unwrap();

        let mut names = store.namespaces().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["api-v2", "static-v2"]);
    }
}
