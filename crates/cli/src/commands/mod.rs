//! Subcommand implementations and the wiring they share.

pub mod ask;
pub mod check;
pub mod config_cmd;
pub mod generate;
pub mod init;
pub mod lookup;

use std::path::Path;
use std::sync::Arc;

use qbank_config::AppConfig;
use qbank_core::blob::{BlobBackend, DocumentLocation};
use qbank_core::error::StoreError;
use qbank_core::question::QuestionKey;
use qbank_engine::{CriteriaPolicy, QuestionBank};
use qbank_providers::OpenAiCompatGenerator;
use qbank_store::{CorpusStore, FileBackend, GcsBackend, InMemoryBackend};

use crate::KeyArgs;

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load config from `path` when given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> CmdResult<AppConfig> {
    let config = match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env_overrides(|name| std::env::var(name).ok());
            config.validate()?;
            config
        }
        None => AppConfig::load()?,
    };
    Ok(config)
}

/// Build the blob backend named by `storage.backend`.
pub fn build_backend(config: &AppConfig) -> Result<Arc<dyn BlobBackend>, StoreError> {
    let storage = &config.storage;
    let backend: Arc<dyn BlobBackend> = match storage.backend.as_str() {
        "gcs" => Arc::new(GcsBackend::new(
            storage.endpoint.clone(),
            storage.access_token.clone(),
        )?),
        "memory" => Arc::new(InMemoryBackend::new()),
        _ => Arc::new(FileBackend::new(storage.root.clone())),
    };
    Ok(backend)
}

pub fn build_store(config: &AppConfig) -> CmdResult<CorpusStore> {
    let backend = build_backend(config)?;
    let location = DocumentLocation::new(&config.storage.bucket, &config.storage.object);
    tracing::debug!(backend = backend.name(), %location, "Corpus store ready");
    Ok(CorpusStore::new(backend, location))
}

/// Build a bank with the configured generator. Fails without an API key.
pub fn build_bank(config: &AppConfig) -> CmdResult<QuestionBank> {
    let store = build_store(config)?;
    let generator = OpenAiCompatGenerator::from_config(&config.generator)?;
    let policy = if config.storage.persist_assessment_criteria {
        CriteriaPolicy::Persist
    } else {
        CriteriaPolicy::Discard
    };
    Ok(QuestionBank::new(store, Arc::new(generator)).with_criteria_policy(policy))
}

pub fn request_key(args: &KeyArgs) -> CmdResult<QuestionKey> {
    Ok(QuestionKey::new(
        &args.subject,
        &args.experience,
        &args.company_type,
    )?)
}
