//! Error types for the qbank domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Storage and generation failures are separate bounded contexts so the
//! caller can tell "couldn't fetch" apart from "couldn't create".

use thiserror::Error;

/// The top-level error type for all qbank operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Write rejected by the duplicate guard ---
    #[error(
        "A similar question already exists for subject '{subject}' ({company_type}, {experience})"
    )]
    DuplicateEntry {
        subject: String,
        company_type: String,
        experience: String,
    },

    // --- Request errors ---
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// True when the failure came from the blob store or the persisted corpus.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// True when the failure came from the text-generation provider.
    pub fn is_generation(&self) -> bool {
        matches!(self, Error::Generation(_))
    }

    /// True when the duplicate guard rejected the write.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::DuplicateEntry { .. })
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Document not found: {bucket}/{key}")]
    DocumentNotFound { bucket: String, key: String },

    #[error("Corpus is corrupt: {0}")]
    CorpusCorrupt(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Failed to encode corpus: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed payload from provider: {0}")]
    MalformedPayload(String),
}
