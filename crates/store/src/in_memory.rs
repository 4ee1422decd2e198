//! In-memory backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use qbank_core::blob::{BlobBackend, DocumentLocation};
use qbank_core::error::StoreError;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// An in-memory backend that keeps documents in a HashMap.
/// Useful for testing and sessions where persistence isn't needed.
pub struct InMemoryBackend {
    documents: Arc<RwLock<HashMap<DocumentLocation, Vec<u8>>>>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            offline: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Create a backend pre-seeded with one document.
    pub fn with_document(location: DocumentLocation, bytes: impl Into<Vec<u8>>) -> Self {
        let mut documents = HashMap::new();
        documents.insert(location, bytes.into());
        Self {
            documents: Arc::new(RwLock::new(documents)),
            ..Self::new()
        }
    }

    /// Current bytes of a document, if any.
    pub async fn document(&self, location: &DocumentLocation) -> Option<Vec<u8>> {
        self.documents.read().await.get(location).cloned()
    }

    /// Simulate a transport failure on every subsequent call.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful `put_document` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::BackendUnavailable(
                "in-memory backend is offline".into(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobBackend for InMemoryBackend {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get_document(&self, location: &DocumentLocation) -> Result<Vec<u8>, StoreError> {
        self.check_online()?;
        self.documents
            .read()
            .await
            .get(location)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound {
                bucket: location.bucket.clone(),
                key: location.key.clone(),
            })
    }

    async fn put_document(
        &self,
        location: &DocumentLocation,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.documents.write().await.insert(location.clone(), bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
