//! `qbank init` — Write a default config file.

use std::path::Path;

use qbank_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::config_dir().join("config.toml"),
    };

    println!("🗂️  qbank — Setup");
    println!("=================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set OPENAI_API_KEY (or generator.api_key in the config)");
    println!("   2. Pick a storage backend: file (default) or gcs");
    println!("   3. Run: qbank ask --subject Python --experience \"2-4 years\" -c Startup");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        run(Some(path.as_path())).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[storage]"));

        std::fs::write(&path, "# edited\n").unwrap();
        run(Some(path.as_path())).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
    }
}
