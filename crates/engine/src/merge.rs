//! Merge/insert engine — fold a new question into the corpus.
//!
//! Order of checks, first match wins:
//!
//! 1. **Duplicate guard**: any entry equivalent to the key (similar subject,
//!    same company type, range present) rejects the write with
//!    `DuplicateEntry`. The corpus is untouched.
//! 2. **Subject merge**: the first entry with a similar subject gets the
//!    record under the key's range. Company type is not checked here, so a
//!    new company for a known subject lands in the existing entry.
//! 3. **Fresh insert**: no similar subject at all appends a new entry.

use qbank_core::error::{Error, Result};
use qbank_core::question::{EnrichedQuestion, ExperienceRecord, QuestionEntry, QuestionKey};
use tracing::{debug, warn};

use crate::lookup::is_equivalent;
use crate::matcher::similar;

/// Whether enriched assessment criteria are written into the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CriteriaPolicy {
    /// Store only question and difficulty score
    #[default]
    Discard,
    /// Store the criteria alongside the question
    Persist,
}

/// What `upsert` did to the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Record added to (or replaced in) the entry at `index`
    Merged { index: usize },
    /// New entry appended at `index`
    Inserted { index: usize },
}

/// Apply one enriched question to the in-memory corpus.
///
/// The caller persists the corpus afterwards.
pub fn upsert(
    corpus: &mut Vec<QuestionEntry>,
    key: &QuestionKey,
    tags: &[String],
    enriched: &EnrichedQuestion,
    policy: CriteriaPolicy,
) -> Result<UpsertOutcome> {
    if let Some(existing) = corpus.iter().find(|entry| is_equivalent(entry, key)) {
        warn!(
            subject = %key.subject,
            existing = %existing.subject,
            company_type = %key.company_type,
            experience = %key.experience,
            "Rejecting duplicate question"
        );
        return Err(Error::DuplicateEntry {
            subject: key.subject.clone(),
            company_type: key.company_type.clone(),
            experience: key.experience.clone(),
        });
    }

    let mut record = ExperienceRecord::new(
        enriched.question.clone(),
        Some(enriched.difficulty_score),
    );
    if policy == CriteriaPolicy::Persist {
        record = record.with_criteria(enriched.assessment_criteria.clone());
    }

    if let Some(index) = corpus
        .iter()
        .position(|entry| similar(&key.subject, &entry.subject))
    {
        let entry = &mut corpus[index];
        debug!(
            subject = %key.subject,
            into = %entry.subject,
            experience = %key.experience,
            "Merging into existing subject"
        );
        entry.experience.insert(key.experience.clone(), record);
        return Ok(UpsertOutcome::Merged { index });
    }

    corpus.push(QuestionEntry::new(
        key.subject.clone(),
        tags.to_vec(),
        key.company_type.clone(),
        key.experience.clone(),
        record,
    ));
    debug!(subject = %key.subject, "Inserted new subject");
    Ok(UpsertOutcome::Inserted {
        index: corpus.len() - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::assessment_criteria;

    fn record(question: &str) -> ExperienceRecord {
        ExperienceRecord::new(question, Some(5))
    }

    fn corpus() -> Vec<QuestionEntry> {
        vec![QuestionEntry::new(
            "Python",
            vec!["backend".into()],
            "Startup",
            "2-4 years",
            record("Q1"),
        )]
    }

    fn enriched(question: &str, score: u8) -> EnrichedQuestion {
        EnrichedQuestion {
            question: question.into(),
            difficulty_score: score,
            assessment_criteria: assessment_criteria("Subject", "Company"),
        }
    }

    fn key(subject: &str, experience: &str, company: &str) -> QuestionKey {
        QuestionKey::new(subject, experience, company).unwrap()
    }

    #[test]
    fn new_subject_is_appended() {
        let mut corpus = corpus();
        let tags = vec!["sql".to_string()];
        let outcome = upsert(
            &mut corpus,
            &key("Databases", "2-4 years", "Startup"),
            &tags,
            &enriched("Q2", 5),
            CriteriaPolicy::Discard,
        )
        .unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted { index: 1 });
        let entry = &corpus[1];
        assert_eq!(entry.subject, "Databases");
        assert_eq!(entry.tags, tags);
        assert_eq!(entry.company_type, "Startup");
        assert_eq!(entry.experience["2-4 years"].question, "Q2");
        assert_eq!(entry.experience["2-4 years"].difficulty_score, Some(5));
    }

    #[test]
    fn new_range_for_known_subject_merges() {
        let mut corpus = corpus();
        let outcome = upsert(
            &mut corpus,
            &key("python", "8-12 years", "Startup"),
            &[],
            &enriched("Q-senior", 8),
            CriteriaPolicy::Discard,
        )
        .unwrap();

        assert_eq!(outcome, UpsertOutcome::Merged { index: 0 });
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].subject, "Python");
        assert_eq!(corpus[0].experience.len(), 2);
        assert_eq!(corpus[0].experience["8-12 years"].difficulty_score, Some(8));
        assert_eq!(corpus[0].experience["2-4 years"].question, "Q1");
    }

    #[test]
    fn equivalent_key_is_rejected_without_mutation() {
        let mut corpus = corpus();
        let before = corpus.clone();
        let err = upsert(
            &mut corpus,
            &key("Python programming", "2-4 years", "STARTUP"),
            &[],
            &enriched("Q-dup", 5),
            CriteriaPolicy::Discard,
        )
        .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(corpus, before);
    }

    #[test]
    fn second_identical_upsert_is_rejected() {
        let mut corpus = corpus();
        let k = key("Databases", "2-4 years", "Startup");
        upsert(&mut corpus, &k, &[], &enriched("Q2", 5), CriteriaPolicy::Discard).unwrap();
        let after_first = corpus.clone();

        let err = upsert(&mut corpus, &k, &[], &enriched("Q2", 5), CriteriaPolicy::Discard)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { .. }));
        assert_eq!(corpus, after_first);
    }

    #[test]
    fn criteria_are_discarded_by_default() {
        let mut corpus = corpus();
        upsert(
            &mut corpus,
            &key("Databases", "2-4 years", "Startup"),
            &[],
            &enriched("Q2", 5),
            CriteriaPolicy::default(),
        )
        .unwrap();
        upsert(
            &mut corpus,
            &key("Python", "0-1 years", "Startup"),
            &[],
            &enriched("Q0", 3),
            CriteriaPolicy::default(),
        )
        .unwrap();

        assert!(corpus[1].experience["2-4 years"].assessment_criteria.is_empty());
        assert!(corpus[0].experience["0-1 years"].assessment_criteria.is_empty());
    }

    #[test]
    fn criteria_persist_when_requested() {
        let mut corpus = corpus();
        upsert(
            &mut corpus,
            &key("Databases", "2-4 years", "Startup"),
            &[],
            &enriched("Q2", 5),
            CriteriaPolicy::Persist,
        )
        .unwrap();
        upsert(
            &mut corpus,
            &key("Python", "0-1 years", "Startup"),
            &[],
            &enriched("Q0", 3),
            CriteriaPolicy::Persist,
        )
        .unwrap();

        assert_eq!(corpus[1].experience["2-4 years"].assessment_criteria.len(), 2);
        assert_eq!(corpus[0].experience["0-1 years"].assessment_criteria.len(), 2);
    }

    #[test]
    fn other_company_merges_into_existing_subject() {
        // Guard checks company type, merge does not: the Enterprise question
        // replaces the Startup record held under the same range.
        let mut corpus = corpus();
        let outcome = upsert(
            &mut corpus,
            &key("Python", "2-4 years", "Enterprise"),
            &[],
            &enriched("Q-enterprise", 5),
            CriteriaPolicy::Discard,
        )
        .unwrap();

        assert_eq!(outcome, UpsertOutcome::Merged { index: 0 });
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].company_type, "Startup");
        assert_eq!(corpus[0].experience["2-4 years"].question, "Q-enterprise");
    }

    #[test]
    fn merge_targets_first_similar_subject() {
        let mut corpus = corpus();
        corpus.push(QuestionEntry::new(
            "Python programming",
            vec![],
            "Enterprise",
            "4-8 years",
            record("Q-ent"),
        ));

        let outcome = upsert(
            &mut corpus,
            &key("Python", "0-1 years", "Enterprise"),
            &[],
            &enriched("Q-junior", 3),
            CriteriaPolicy::Discard,
        )
        .unwrap();
        assert_eq!(outcome, UpsertOutcome::Merged { index: 0 });
        assert!(corpus[0].experience.contains_key("0-1 years"));
        assert!(!corpus[1].experience.contains_key("0-1 years"));
    }
}
