//! `qbank ask` — Return stored questions, or generate and store one.

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

    let results = bank.fetch_or_generate(&key, &tags).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
