//! The question bank — generate-or-fetch over the corpus.
//!
//! Control flow for a request key:
//!
//! 1. **Lookup**: load the corpus, scan for equivalent entries
//! 2. **Hit**: return every match
//! 3. **Miss**: call the generator, enrich, upsert, save
//!
//! Every operation loads the corpus fresh; nothing is cached between calls.
//! Load-upsert-save cycles from one `QuestionBank` are serialized by a
//! write lock, so concurrent `generate_and_store` calls never lose each
//! other's updates. Separate processes writing the same document are not
//! coordinated and the last save wins.

use std::sync::Arc;

use qbank_core::error::Result;
use qbank_core::generator::QuestionGenerator;
use qbank_core::question::{EnrichedQuestion, MatchResult, QuestionKey};
use qbank_store::CorpusStore;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::enrich::enrich;
use crate::lookup::find;
use crate::merge::{CriteriaPolicy, UpsertOutcome, upsert};

/// Generate-or-fetch service over one corpus document.
pub struct QuestionBank {
    store: CorpusStore,
    generator: Arc<dyn QuestionGenerator>,
    criteria_policy: CriteriaPolicy,
    write_lock: Mutex<()>,
}

impl QuestionBank {
    pub fn new(store: CorpusStore, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self {
            store,
            generator,
            criteria_policy: CriteriaPolicy::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Choose whether generated assessment criteria are persisted.
    pub fn with_criteria_policy(mut self, policy: CriteriaPolicy) -> Self {
        self.criteria_policy = policy;
        self
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Stored questions for `key`; empty on a miss.
    pub async fn lookup(&self, key: &QuestionKey) -> Result<Vec<MatchResult>> {
        let corpus = self.store.load().await?;
        let matches = find(&corpus, key);
        if matches.is_empty() {
            info!(subject = %key.subject, experience = %key.experience, "No stored question found");
        } else {
            info!(subject = %key.subject, count = matches.len(), "Returning stored questions");
        }
        Ok(matches)
    }

    /// Generate a question for `key`, enrich it, and persist it.
    ///
    /// Fails with `DuplicateEntry` when an equivalent question is already
    /// stored; the corpus is then left unchanged.
    pub async fn generate_and_store(
        &self,
        key: &QuestionKey,
        tags: &[String],
    ) -> Result<EnrichedQuestion> {
        debug!(
            generator = self.generator.name(),
            subject = %key.subject,
            "Generating question"
        );
        let generated = self.generator.generate(key).await?;
        let enriched = enrich(generated, &key.experience, &key.subject, &key.company_type);
        self.store_enriched(key, tags, &enriched).await?;
        Ok(enriched)
    }

    /// Upsert an already-enriched question and save the corpus.
    pub async fn store_enriched(
        &self,
        key: &QuestionKey,
        tags: &[String],
        enriched: &EnrichedQuestion,
    ) -> Result<UpsertOutcome> {
        let _guard = self.write_lock.lock().await;

        let mut corpus = self.store.load().await?;
        let outcome = upsert(&mut corpus, key, tags, enriched, self.criteria_policy)?;
        self.store.save(&corpus).await?;

        info!(
            subject = %key.subject,
            experience = %key.experience,
            ?outcome,
            "Question persisted"
        );
        Ok(outcome)
    }

    /// Stored questions on a hit, otherwise one freshly generated question.
    pub async fn fetch_or_generate(
        &self,
        key: &QuestionKey,
        tags: &[String],
    ) -> Result<Vec<MatchResult>> {
        let matches = self.lookup(key).await?;
        if !matches.is_empty() {
            return Ok(matches);
        }

        info!(subject = %key.subject, "Generating question dynamically");
        let enriched = self.generate_and_store(key, tags).await?;
        Ok(vec![enriched.into()])
    }
}
