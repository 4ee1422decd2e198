//! `qbank check` — Load and validate the stored corpus.

use std::path::Path;

use super::{build_store, load_config};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let store = build_store(&config)?;

    println!("🔍 Checking corpus");
    println!("==================");
    println!("  Backend:   {}", store.backend_name());
    println!("  Document:  {}", store.location());

    let corpus = match store.load().await {
        Ok(corpus) => corpus,
        Err(e) => {
            println!("  ❌ {e}");
            return Err(e.into());
        }
    };

    let records: usize = corpus.iter().map(|entry| entry.experience.len()).sum();
    let unscored = corpus
        .iter()
        .flat_map(|entry| entry.experience.values())
        .filter(|record| record.difficulty_score.is_none())
        .count();

    println!("  Subjects:  {}", corpus.len());
    println!("  Questions: {records}");
    if unscored > 0 {
        println!("  ⚠️  {unscored} question(s) without a difficulty score");
    }
    println!("  ✅ Corpus is valid");
    Ok(())
}
