//! The qbank engine — fuzzy-keyed generate-or-fetch over a question corpus.
//!
//! A request key is (subject, experience range, company type):
//!
//! 1. **Match** subjects with a partial-ratio score (threshold 80)
//! 2. **Look up** entries with a similar subject, the same company type,
//!    and the exact experience-range label
//! 3. **On a miss**, generate a question, **enrich** it with a difficulty
//!    score and assessment criteria, and **merge** it into the corpus
//!    (reject duplicates, extend a known subject, or insert a new one)
//!
//! The corpus is small and loaded whole for every operation; the scan is
//! linear.

pub mod bank;
pub mod enrich;
pub mod lookup;
pub mod matcher;
pub mod merge;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use bank::QuestionBank;
pub use enrich::{assessment_criteria, difficulty_for, enrich};
pub use lookup::{find, is_equivalent};
pub use matcher::{SIMILARITY_THRESHOLD, partial_ratio, similar};
pub use merge::{CriteriaPolicy, UpsertOutcome, upsert};
