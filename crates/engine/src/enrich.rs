//! Enrichment stage — difficulty score and assessment criteria.
//!
//! Pure template expansion, no provider call. The difficulty table is keyed
//! by the same exact experience-range labels the lookup uses.

use qbank_core::question::{CriteriaCategory, EnrichedQuestion, GeneratedQuestion};

/// Score used for any range not in [`DIFFICULTY_BY_EXPERIENCE`].
pub const DEFAULT_DIFFICULTY: u8 = 5;

pub const DIFFICULTY_BY_EXPERIENCE: [(&str, u8); 7] = [
    ("0-1 years", 3),
    ("1-2 years", 4),
    ("2-4 years", 5),
    ("4-8 years", 7),
    ("8-12 years", 8),
    ("12-20 years", 9),
    ("20+ years", 10),
];

/// Difficulty for an experience-range label.
pub fn difficulty_for(experience_range: &str) -> u8 {
    DIFFICULTY_BY_EXPERIENCE
        .iter()
        .find(|(range, _)| *range == experience_range)
        .map_or(DEFAULT_DIFFICULTY, |(_, score)| *score)
}

/// The two fixed criteria categories for a subject and company type.
pub fn assessment_criteria(subject: &str, company_type: &str) -> Vec<CriteriaCategory> {
    vec![
        CriteriaCategory::new(
            "Technical Knowledge",
            vec![
                format!("Demonstrates understanding of {subject} concepts."),
                format!("Provides examples relevant to {company_type} challenges."),
            ],
        ),
        CriteriaCategory::new(
            "Problem-Solving Skills",
            vec![
                "Articulates a clear approach to tackling the question.".into(),
                "Shows critical thinking and adaptability in responses.".into(),
            ],
        ),
    ]
}

/// Attach a difficulty score and the templated criteria.
///
/// The provider's own criteria are replaced, not merged.
pub fn enrich(
    question: GeneratedQuestion,
    experience_range: &str,
    subject: &str,
    company_type: &str,
) -> EnrichedQuestion {
    EnrichedQuestion {
        question: question.question,
        difficulty_score: difficulty_for(experience_range),
        assessment_criteria: assessment_criteria(subject, company_type),
    }
}
