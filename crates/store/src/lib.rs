//! Storage for the qbank question corpus.
//!
//! Blob backends move the raw document; [`CorpusStore`] turns it into
//! validated [`qbank_core::QuestionEntry`] values and back.

pub mod corpus;
pub mod file_backend;
pub mod gcs;
pub mod in_memory;

pub use corpus::{CorpusStore, encode_corpus, parse_corpus, validate};
pub use file_backend::FileBackend;
pub use gcs::GcsBackend;
pub use in_memory::InMemoryBackend;
