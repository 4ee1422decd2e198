//! Corpus store — the whole question corpus as one JSON document.
//!
//! Every operation works on a fresh copy: [`CorpusStore::load`] reads and
//! validates the full document, callers mutate the returned `Vec`, and
//! [`CorpusStore::save`] overwrites the full document. Nothing is cached
//! between calls.
//!
//! The store itself does not coordinate writers. Two load-mutate-save
//! cycles that interleave lose the earlier save (last writer wins); the
//! question bank serializes its own cycles to avoid that within a process.

use qbank_core::blob::{BlobBackend, DocumentLocation};
use qbank_core::error::StoreError;
use qbank_core::question::QuestionEntry;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::sync::Arc;
use tracing::{debug, warn};

const REQUIRED_KEYS: [&str; 4] = ["subject", "tags", "company_type", "experience"];

/// Loads and saves the corpus through a [`BlobBackend`].
#[derive(Clone)]
pub struct CorpusStore {
    backend: Arc<dyn BlobBackend>,
    location: DocumentLocation,
}

impl CorpusStore {
    pub fn new(backend: Arc<dyn BlobBackend>, location: DocumentLocation) -> Self {
        Self { backend, location }
    }

    pub fn location(&self) -> &DocumentLocation {
        &self.location
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Fetch and validate the full corpus.
    ///
    /// A document that does not exist yet is an empty corpus. Invalid JSON
    /// or an entry failing [`validate`] is `CorpusCorrupt`.
    pub async fn load(&self) -> Result<Vec<QuestionEntry>, StoreError> {
        let bytes = match self.backend.get_document(&self.location).await {
            Ok(bytes) => bytes,
            Err(StoreError::DocumentNotFound { .. }) => {
                warn!(location = %self.location, "Corpus document not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let corpus = parse_corpus(&bytes)?;
        debug!(
            location = %self.location,
            backend = self.backend.name(),
            entries = corpus.len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    /// Serialize the full corpus and overwrite the backing document.
    pub async fn save(&self, corpus: &[QuestionEntry]) -> Result<(), StoreError> {
        let bytes = encode_corpus(corpus)?;
        self.backend.put_document(&self.location, bytes).await?;
        debug!(location = %self.location, entries = corpus.len(), "Corpus saved");
        Ok(())
    }
}

/// Parse a corpus document into validated entries.
pub fn parse_corpus(bytes: &[u8]) -> Result<Vec<QuestionEntry>, StoreError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::CorpusCorrupt(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = document else {
        return Err(StoreError::CorpusCorrupt(
            "top-level value must be an array of entries".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            validate(item).map_err(|e| StoreError::CorpusCorrupt(format!("entry {i}: {e}")))
        })
        .collect()
}

/// Serialize the corpus as UTF-8 JSON with 4-space indentation.
pub fn encode_corpus(corpus: &[QuestionEntry]) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    corpus
        .serialize(&mut serializer)
        .map_err(|e| StoreError::Encode(e.to_string()))?;
    Ok(out)
}

/// Normalize one raw entry and check it against the entry schema.
///
/// - all of `subject`, `tags`, `company_type`, `experience` must be present
/// - a `null` `tags` becomes an empty list
/// - every experience record must be an object with a `question`
/// - a missing `difficulty_score` becomes `null`; a present one must be 1–10
pub fn validate(mut entry: Value) -> Result<QuestionEntry, StoreError> {
    let Some(object) = entry.as_object_mut() else {
        return Err(StoreError::SchemaViolation("entry must be an object".into()));
    };

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::SchemaViolation(format!(
            "missing required keys: {}",
            missing.join(", ")
        )));
    }

    if object.get("tags").is_some_and(Value::is_null) {
        object.insert("tags".into(), Value::Array(Vec::new()));
    }

    let Some(experience) = object.get_mut("experience").and_then(Value::as_object_mut) else {
        return Err(StoreError::SchemaViolation(
            "experience must be an object".into(),
        ));
    };

    for (range, details) in experience.iter_mut() {
        let Some(record) = details.as_object_mut() else {
            return Err(StoreError::SchemaViolation(format!(
                "malformed experience entry for range: {range}"
            )));
        };
        if !record.contains_key("question") {
            return Err(StoreError::SchemaViolation(format!(
                "malformed experience entry for range: {range}"
            )));
        }

        let score = record.entry("difficulty_score").or_insert(Value::Null);
        if !score.is_null() && !score.as_u64().is_some_and(|s| (1..=10).contains(&s)) {
            return Err(StoreError::SchemaViolation(format!(
                "difficulty_score for range {range} must be an integer 1-10, got {score}"
            )));
        }
    }

    serde_json::from_value(entry).map_err(|e| StoreError::SchemaViolation(e.to_string()))
}
