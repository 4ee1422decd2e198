//! `qbank lookup` — Search stored questions without generating.

use std::path::Path;

use qbank_engine::find;

use super::{build_store, load_config, request_key};
use crate::KeyArgs;

pub async fn run(
    config_path: Option<&Path>,
    args: KeyArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let key = request_key(&args)?;
    let store = build_store(&config)?;

    let corpus = store.load().await?;
    let matches = find(&corpus, &key);
    if matches.is_empty() {
        eprintln!(
            "No stored question for {} / {} / {}",
            key.subject, key.experience, key.company_type
        );
    }
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
