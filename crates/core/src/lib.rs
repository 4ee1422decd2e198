//! # qbank core
//!
//! Domain types, traits, and error definitions for the qbank interview
//! question bank. This crate does no I/O of its own: it defines the corpus
//! model and the two collaborator seams the other crates implement.
//!
//! - [`BlobBackend`]: an opaque document store (local file, GCS, in-memory)
//! - [`QuestionGenerator`]: an external text-generation provider

pub mod blob;
pub mod error;
pub mod generator;
pub mod question;

pub use blob::{BlobBackend, DocumentLocation};
pub use error::{Error, GenerationError, Result, StoreError};
pub use generator::QuestionGenerator;
pub use question::{
    CriteriaCategory, EnrichedQuestion, ExperienceRecord, GeneratedQuestion, MatchResult,
    QuestionEntry, QuestionKey,
};
