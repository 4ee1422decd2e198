//! QuestionGenerator trait — the abstraction over text-generation providers.
//!
//! A generator turns a [`QuestionKey`] into a fresh question plus the
//! provider's own assessment criteria. Implementations must surface a
//! payload missing required fields as `GenerationError::MalformedPayload`.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::question::{GeneratedQuestion, QuestionKey};

/// The core QuestionGenerator trait.
///
/// The question bank calls `generate()` on a cache miss without knowing
/// which provider sits behind it.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// A human-readable name for this generator (e.g., "openai").
    fn name(&self) -> &str;

    /// Generate one question for the given key.
    async fn generate(&self, key: &QuestionKey) -> Result<GeneratedQuestion, GenerationError>;
}
