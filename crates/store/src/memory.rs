//! In-process blob store. Used for development and as the test double.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::blob::{validate_key, BlobError, BlobStore};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        validate_key(key)?;
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), BlobError> {
        validate_key(key)?;
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        let objects = self.objects.read().await;
        // BTreeMap keys are already sorted.
        Ok(objects
            .range(prefix.to_string()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryBlobStore::new();
        store.put("a/b.json", b"{}".to_vec()).await.unwrap();
        assert_eq!(store.get("a/b.json").await.unwrap(), Some(b"{}".to_vec()));
        store.delete("a/b.json").await.unwrap();
        assert_eq!(store.get("a/b.json").await.unwrap(), None);
        // Idempotent.
        store.delete("a/b.json").await.unwrap();
    }

    #[tokio::test]
    async fn list_is_prefix_scoped_and_sorted() {
        let store = MemoryBlobStore::new();
        for key in ["updated/b.json", "default/z.json", "default/a.json", "defaults.txt"] {
            store.put(key, Vec::new()).await.unwrap();
        }
        assert_eq!(
            store.list("default/").await.unwrap(),
            vec!["default/a.json", "default/z.json"]
        );
        assert_eq!(store.list("").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn rejects_invalid_keys() {
        let store = MemoryBlobStore::new();
        assert_matches!(
            store.put("../escape", Vec::new()).await,
            Err(BlobError::InvalidKey(_))
        );
    }
}
