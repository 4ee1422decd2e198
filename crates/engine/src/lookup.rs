//! Lookup engine — linear fuzzy scan over the loaded corpus.

use qbank_core::question::{MatchResult, QuestionEntry, QuestionKey};
use tracing::debug;

use crate::matcher::similar;

/// Does `entry` answer `key`?
///
/// All three must hold: similar subject, same company type (ignoring
/// case), and the exact experience-range label present.
pub fn is_equivalent(entry: &QuestionEntry, key: &QuestionKey) -> bool {
    similar(&key.subject, &entry.subject)
        && entry.company_matches(&key.company_type)
        && entry.has_experience(&key.experience)
}

/// Every stored question that answers `key`, in corpus order.
///
/// An empty result is a cache miss, not an error.
pub fn find(corpus: &[QuestionEntry], key: &QuestionKey) -> Vec<MatchResult> {
    let matches: Vec<MatchResult> = corpus
        .iter()
        .filter(|entry| is_equivalent(entry, key))
        .filter_map(|entry| entry.experience.get(&key.experience))
        .map(|record| MatchResult {
            question: record.question.clone(),
            difficulty_score: record.difficulty_score,
            assessment_criteria: record.assessment_criteria.clone(),
        })
        .collect();

    debug!(
        subject = %key.subject,
        scanned = corpus.len(),
        matched = matches.len(),
        "Corpus scan complete"
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank_core::question::{CriteriaCategory, ExperienceRecord};

    fn record(question: &str, score: Option<u8>) -> ExperienceRecord {
        ExperienceRecord::new(question, score)
    }

    fn corpus() -> Vec<QuestionEntry> {
        vec![
            QuestionEntry::new("Python", vec![], "Startup", "2-4 years", record("Q1", Some(5))),
            QuestionEntry::new(
                "Databases",
                vec![],
                "Enterprise",
                "4-8 years",
                record("Q2", Some(7)),
            ),
        ]
    }

    fn key(subject: &str, experience: &str, company: &str) -> QuestionKey {
        QuestionKey::new(subject, experience, company).unwrap()
    }

    #[test]
    fn hit_is_case_insensitive() {
        let results = find(&corpus(), &key("python", "2-4 years", "startup"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question, "Q1");
        assert_eq!(results[0].difficulty_score, Some(5));
        assert!(results[0].assessment_criteria.is_empty());
    }

    #[test]
    fn unknown_subject_misses() {
        assert!(find(&corpus(), &key("Databases", "2-4 years", "Startup")).is_empty());
    }

    #[test]
    fn company_must_match_exactly() {
        assert!(find(&corpus(), &key("Python", "2-4 years", "Enterprise")).is_empty());
        assert!(find(&corpus(), &key("Python", "2-4 years", "Startups")).is_empty());
    }

    #[test]
    fn overlapping_ranges_are_distinct_keys() {
        assert!(find(&corpus(), &key("Python", "3-5 years", "Startup")).is_empty());
    }

    #[test]
    fn empty_corpus_misses() {
        assert!(find(&[], &key("Python", "2-4 years", "Startup")).is_empty());
    }

    #[test]
    fn every_similar_entry_is_returned() {
        let mut corpus = corpus();
        corpus.push(QuestionEntry::new(
            "Python programming",
            vec![],
            "Startup",
            "2-4 years",
            ExperienceRecord::new("Q3", Some(5)).with_criteria(vec![CriteriaCategory::new(
                "Technical Knowledge",
                vec!["Knows decorators".into()],
            )]),
        ));

        let results = find(&corpus, &key("Python", "2-4 years", "Startup"));
        assert_eq!(results.len(), 2);
        let q3 = results.iter().find(|r| r.question == "Q3").unwrap();
        assert_eq!(q3.assessment_criteria.len(), 1);
    }

    #[test]
    fn unscored_record_is_returned_as_is() {
        let corpus = vec![QuestionEntry::new(
            "Rust",
            vec![],
            "Startup",
            "0-1 years",
            record("What is a borrow?", None),
        )];
        let results = find(&corpus, &key("rust", "0-1 years", "Startup"));
        assert_eq!(results[0].difficulty_score, None);
    }
}
