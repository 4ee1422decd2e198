//! Shared test helpers for engine tests.

use async_trait::async_trait;
use qbank_core::blob::{BlobBackend, DocumentLocation};
use qbank_core::error::{GenerationError, StoreError};
use qbank_core::generator::QuestionGenerator;
use qbank_core::question::{CriteriaCategory, GeneratedQuestion, QuestionKey};
use std::sync::{Arc, Mutex};

/// A generator that returns a sequence of scripted outcomes.
///
/// Each call to `generate` returns the next outcome in the queue.
/// Panics if more calls are made than outcomes provided.
pub struct ScriptedGenerator {
    outcomes: Mutex<Vec<Result<GeneratedQuestion, GenerationError>>>,
    call_count: Mutex<usize>,
}

impl ScriptedGenerator {
    pub fn new(outcomes: Vec<Result<GeneratedQuestion, GenerationError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            call_count: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl QuestionGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _key: &QuestionKey) -> Result<GeneratedQuestion, GenerationError> {
        let mut count = self.call_count.lock().unwrap();
        let outcomes = self.outcomes.lock().unwrap();

        if *count >= outcomes.len() {
            panic!(
                "ScriptedGenerator: no more outcomes (call #{}, have {})",
                *count,
                outcomes.len()
            );
        }

        let outcome = outcomes[*count].clone();
        *count += 1;
        outcome
    }
}

/// A provider reply with one criteria category of its own.
pub fn generated(question: &str) -> GeneratedQuestion {
    GeneratedQuestion {
        question: question.into(),
        assessment_criteria: vec![CriteriaCategory::new(
            "Provider Criteria",
            vec!["Answers the question".into()],
        )],
    }
}

/// Wraps a backend and yields to the scheduler after every read, so
/// concurrent load-mutate-save cycles interleave deterministically.
pub struct YieldingBackend<B> {
    inner: Arc<B>,
}

impl<B> YieldingBackend<B> {
    pub fn new(inner: Arc<B>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BlobBackend> BlobBackend for YieldingBackend<B> {
    fn name(&self) -> &str {
        "yielding"
    }

    async fn get_document(&self, location: &DocumentLocation) -> Result<Vec<u8>, StoreError> {
        let bytes = self.inner.get_document(location).await;
        tokio::task::yield_now().await;
        bytes
    }

    async fn put_document(
        &self,
        location: &DocumentLocation,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.inner.put_document(location, bytes).await
    }
}
