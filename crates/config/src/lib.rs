//! Configuration loading, validation, and management for qbank.
//!
//! Loads configuration from `~/.qbank/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage backends understood by [`StorageConfig::backend`].
pub const STORAGE_BACKENDS: &[&str] = &["file", "gcs", "memory"];

/// The root configuration structure.
///
/// Maps directly to `~/.qbank/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the question corpus is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Text-generation provider settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "file", "gcs", or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// GCS bucket, or sub-directory of `root` for the file backend
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Key of the corpus document inside the bucket
    #[serde(default = "default_object")]
    pub object: String,

    /// Root directory for the file backend
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// GCS API endpoint (override for emulators)
    #[serde(default = "default_gcs_endpoint")]
    pub endpoint: String,

    /// OAuth bearer token for GCS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Also store generated assessment criteria in the corpus
    #[serde(default)]
    pub persist_assessment_criteria: bool,
}

fn default_storage_backend() -> String {
    "file".into()
}
fn default_bucket() -> String {
    "qbank".into()
}
fn default_object() -> String {
    "questions.json".into()
}
fn default_root() -> PathBuf {
    AppConfig::config_dir().join("data")
}
fn default_gcs_endpoint() -> String {
    "https://storage.googleapis.com".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            bucket: default_bucket(),
            object: default_object(),
            root: default_root(),
            endpoint: default_gcs_endpoint(),
            access_token: None,
            persist_assessment_criteria: false,
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("bucket", &self.bucket)
            .field("object", &self.object)
            .field("root", &self.root)
            .field("endpoint", &self.endpoint)
            .field("access_token", &redact(&self.access_token))
            .field(
                "persist_assessment_criteria",
                &self.persist_assessment_criteria,
            )
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Provider name, used in logs
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP timeout for one generation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    300
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.qbank/config.toml),
    /// then apply environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (highest priority).
    ///
    /// `lookup` resolves a variable name; [`AppConfig::load`] passes
    /// `std::env::var`.
    ///
    /// - `QBANK_API_KEY`, then `OPENAI_API_KEY` → `generator.api_key`
    /// - `QBANK_MODEL` → `generator.model`
    /// - `QBANK_STORAGE_BACKEND` → `storage.backend`
    /// - `GCP_BUCKET_NAME` → `storage.bucket`
    /// - `GCP_FILE_NAME` → `storage.object`
    /// - `GCS_ACCESS_TOKEN` → `storage.access_token`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("QBANK_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.generator.api_key = Some(key);
        }
        if let Some(model) = lookup("QBANK_MODEL") {
            self.generator.model = model;
        }
        if let Some(backend) = lookup("QBANK_STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Some(bucket) = lookup("GCP_BUCKET_NAME") {
            self.storage.bucket = bucket;
        }
        if let Some(object) = lookup("GCP_FILE_NAME") {
            self.storage.object = object;
        }
        if let Some(token) = lookup("GCS_ACCESS_TOKEN") {
            self.storage.access_token = Some(token);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".qbank")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(ConfigError::ValidationError(
                "generator.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generator.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generator.max_tokens must be > 0".into(),
            ));
        }

        if !STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "storage.backend must be one of {STORAGE_BACKENDS:?}, got '{}'",
                self.storage.backend
            )));
        }

        if self.storage.bucket.trim().is_empty() || self.storage.object.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.bucket and storage.object must be set".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
