//! Blob backend trait — the opaque document store under the corpus.
//!
//! The corpus lives in a single document addressed by (bucket, key). A
//! backend only moves bytes; parsing and schema checks happen in the
//! corpus store. There is no partial write: `put_document` replaces the
//! whole document.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;

/// Where the corpus document lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub bucket: String,
    pub key: String,
}

impl DocumentLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// The core BlobBackend trait.
///
/// Implementations: local file, Google Cloud Storage, in-memory (for testing).
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// The backend name (e.g., "file", "gcs", "in_memory").
    fn name(&self) -> &str;

    /// Fetch the full document.
    ///
    /// Returns `DocumentNotFound` when the document does not exist and
    /// `BackendUnavailable` on transport or auth failure.
    async fn get_document(&self, location: &DocumentLocation) -> Result<Vec<u8>, StoreError>;

    /// Overwrite the full document.
    async fn put_document(
        &self,
        location: &DocumentLocation,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_displays_as_path() {
        let loc = DocumentLocation::new("qbank", "questions.json");
        assert_eq!(loc.to_string(), "qbank/questions.json");
    }
}
