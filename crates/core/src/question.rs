//! The question corpus model.
//!
//! One [`QuestionEntry`] exists per distinct subject. Each entry holds one
//! [`ExperienceRecord`] per experience-range label. Range labels are exact
//! string keys, never intervals: "2-4 years" and "3-5 years" are unrelated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::Error;

/// One subject in the persisted corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// Free-text subject, the fuzzy-match key
    pub subject: String,

    /// Informational labels, never used for matching
    #[serde(default)]
    pub tags: Vec<String>,

    /// Company type, compared case-insensitively
    pub company_type: String,

    /// Experience-range label → record
    pub experience: BTreeMap<String, ExperienceRecord>,

    /// Keys this model does not know, carried through load and save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionEntry {
    /// Create an entry holding a single experience record.
    pub fn new(
        subject: impl Into<String>,
        tags: Vec<String>,
        company_type: impl Into<String>,
        experience_range: impl Into<String>,
        record: ExperienceRecord,
    ) -> Self {
        let mut experience = BTreeMap::new();
        experience.insert(experience_range.into(), record);
        Self {
            subject: subject.into(),
            tags,
            company_type: company_type.into(),
            experience,
            extra: Map::new(),
        }
    }

    /// Case-insensitive exact comparison against this entry's company type.
    pub fn company_matches(&self, company_type: &str) -> bool {
        self.company_type.to_lowercase() == company_type.to_lowercase()
    }

    /// Exact-key lookup of an experience range.
    pub fn has_experience(&self, experience_range: &str) -> bool {
        self.experience.contains_key(experience_range)
    }
}

/// The question stored for one experience range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub question: String,

    /// 1–10; `None` only for raw records that were never scored
    #[serde(default)]
    pub difficulty_score: Option<u8>,

    /// Present when the record came from generation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assessment_criteria: Vec<CriteriaCategory>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExperienceRecord {
    pub fn new(question: impl Into<String>, difficulty_score: Option<u8>) -> Self {
        Self {
            question: question.into(),
            difficulty_score,
            assessment_criteria: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_criteria(mut self, criteria: Vec<CriteriaCategory>) -> Self {
        self.assessment_criteria = criteria;
        self
    }
}

/// A named group of assessment points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaCategory {
    pub category: String,
    pub points: Vec<String>,
}

impl CriteriaCategory {
    pub fn new(category: impl Into<String>, points: Vec<String>) -> Self {
        Self {
            category: category.into(),
            points,
        }
    }
}

/// The (subject, experience range, company type) triple a request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionKey {
    pub subject: String,
    pub experience: String,
    pub company_type: String,
}

/// Longest accepted value for any request key field.
pub const MAX_KEY_FIELD_CHARS: usize = 200;

impl QuestionKey {
    /// Build a key, rejecting blank or oversized fields.
    pub fn new(
        subject: impl Into<String>,
        experience: impl Into<String>,
        company_type: impl Into<String>,
    ) -> Result<Self, Error> {
        let key = Self {
            subject: subject.into(),
            experience: experience.into(),
            company_type: company_type.into(),
        };
        if key.subject.trim().is_empty()
            || key.experience.trim().is_empty()
            || key.company_type.trim().is_empty()
        {
            return Err(Error::InvalidRequest(
                "Missing required fields: subject, experience, or company_type".into(),
            ));
        }
        for (field, value) in [
            ("subject", &key.subject),
            ("experience", &key.experience),
            ("company_type", &key.company_type),
        ] {
            if value.chars().count() > MAX_KEY_FIELD_CHARS {
                return Err(Error::InvalidRequest(format!(
                    "{field} is longer than {MAX_KEY_FIELD_CHARS} characters"
                )));
            }
        }
        Ok(key)
    }
}

/// A question found by the lookup engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub question: String,
    pub difficulty_score: Option<u8>,
    pub assessment_criteria: Vec<CriteriaCategory>,
}

/// Raw provider output before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub assessment_criteria: Vec<CriteriaCategory>,
}

/// A generated question with its difficulty score and assessment criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedQuestion {
    pub question: String,
    pub difficulty_score: u8,
    pub assessment_criteria: Vec<CriteriaCategory>,
}

impl From<EnrichedQuestion> for MatchResult {
    fn from(q: EnrichedQuestion) -> Self {
        Self {
            question: q.question,
            difficulty_score: Some(q.difficulty_score),
            assessment_criteria: q.assessment_criteria,
        }
    }
}
