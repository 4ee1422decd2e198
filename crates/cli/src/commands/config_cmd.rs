//! `qbank config` — Configuration management commands.

use std::path::Path;

use qbank_config::AppConfig;

use super::load_config;

pub async fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match load_config(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.generator.api_key.is_none() {
                warnings.push("No API key set (set QBANK_API_KEY or OPENAI_API_KEY env var)");
            }

            if config.storage.backend == "gcs" && config.storage.access_token.is_none() {
                warnings.push("GCS backend without an access token (set GCS_ACCESS_TOKEN)");
            }

            if config.storage.backend == "memory" {
                warnings.push("Memory backend keeps nothing between runs");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.generator.provider);
            println!("   Model:     {}", config.generator.model);
            println!("   Storage:   {}", config.storage.backend);
            println!(
                "   Document:  {}/{}",
                config.storage.bucket, config.storage.object
            );
            println!(
                "   Criteria:  {}",
                if config.storage.persist_assessment_criteria {
                    "persisted"
                } else {
                    "response only"
                }
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e);
        }
    }

    Ok(())
}

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    redact_secrets(&mut config);
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

fn redact_secrets(config: &mut AppConfig) {
    for secret in [
        &mut config.generator.api_key,
        &mut config.storage.access_token,
    ] {
        if secret.is_some() {
            *secret = Some("[REDACTED]".into());
        }
    }
}
