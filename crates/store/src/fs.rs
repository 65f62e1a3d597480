//! Local filesystem blob store.
//!
//! Keys map onto paths below a root directory. Writes go to a hidden temp
//! file in the target directory and are renamed into place, so readers
//! never observe a partially written object.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::blob::{validate_key, BlobError, BlobStore};

/// Prefix of in-flight temp files. Never returned by `list`.
const TEMP_PREFIX: &str = ".tmp-";

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        validate_key(key)?;
        if key.split('/').any(|segment| segment.starts_with(TEMP_PREFIX)) {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    /// Every file below `dir`, as `/`-joined keys relative to the root.
    async fn walk(&self, dir: PathBuf) -> Result<Vec<String>, BlobError> {
        let mut keys = Vec::new();
        let mut pending = vec![dir];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                if name.to_string_lossy().starts_with(TEMP_PREFIX) {
                    continue;
                }
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    if let Some(key) = self.key_for(&entry.path()) {
                        keys.push(key);
                    }
                }
            }
        }
        Ok(keys)
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Option<Vec<&str>> = relative.iter().map(|s| s.to_str()).collect();
        Some(segments?.join("/"))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        let dir = path
            .parent()
            .ok_or_else(|| BlobError::InvalidKey(key.to_string()))?;
        tokio::fs::create_dir_all(dir).await?;

        let temp = dir.join(format!("{TEMP_PREFIX}{}", uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&temp, &body).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        // Only walk the deepest directory the prefix fully names.
        let start = match prefix.rfind('/') {
            Some(idx) => {
                let dir = &prefix[..idx];
                validate_key(dir)?;
                dir.split('/').fold(self.root.clone(), |path, s| path.join(s))
            }
            None => self.root.clone(),
        };

        let mut keys: Vec<String> = self
            .walk(start)
            .await?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn ping(&self) -> Result<(), BlobError> {
        let meta = tokio::fs::metadata(&self.root).await?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(BlobError::Backend(format!(
                "storage root {} is not a directory",
                self.root.display()
            )))
        }
    }
}
