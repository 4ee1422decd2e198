//! `qbank generate` — Generate a question and store it.

use std::path::Path;

use super::{build_bank, load_config, request_key};
use crate::KeyArgs;

pub async fn run(
    config_path: Option<&Path>,
    args: KeyArgs,
    tags: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let key = request_key(&args)?;
    let bank = build_bank(&config)?;

    match bank.generate_and_store(&key, &tags).await {
        Ok(enriched) => {
            println!("{}", serde_json::to_string_pretty(&enriched)?);
            Ok(())
        }
        Err(e) if e.is_duplicate() => {
            eprintln!("⚠️  {e}");
            eprintln!("   Use `qbank lookup` to read the stored question.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
