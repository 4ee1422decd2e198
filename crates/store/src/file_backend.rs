//! File-based blob backend — the corpus document on the local filesystem.
//!
//! A document at (bucket, key) lives at `{root}/{bucket}/{key}`. Writes go
//! to a sibling temp file which is then renamed over the target, so a
//! reader never observes a half-written corpus.
//!
//! Default root: `~/.qbank/data`

use async_trait::async_trait;
use qbank_core::blob::{BlobBackend, DocumentLocation};
use qbank_core::error::StoreError;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A blob backend rooted at a local directory.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a location to a path under the root.
    ///
    /// Bucket and key must be relative paths without `..` components.
    fn path_for(&self, location: &DocumentLocation) -> Result<PathBuf, StoreError> {
        let relative = Path::new(&location.bucket).join(&location.key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || location.key.is_empty() {
            return Err(StoreError::BackendUnavailable(format!(
                "invalid document location: {location}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_document(&self, location: &DocumentLocation) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(location)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Read corpus document");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::DocumentNotFound {
                bucket: location.bucket.clone(),
                key: location.key.clone(),
            }),
            Err(e) => Err(StoreError::BackendUnavailable(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn put_document(
        &self,
        location: &DocumentLocation,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        let path = self.path_for(location)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::BackendUnavailable(format!("Failed to create directory: {e}"))
            })?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            StoreError::BackendUnavailable(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            StoreError::BackendUnavailable(format!("Failed to replace {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote corpus document");
        Ok(())
    }
}
