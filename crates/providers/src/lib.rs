//! Text-generation providers for qbank.
//!
//! All providers implement the `qbank_core::QuestionGenerator` trait.

pub mod openai_compat;

pub use openai_compat::{OpenAiCompatGenerator, build_prompt, parse_payload};
