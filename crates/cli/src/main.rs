//! qbank CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a default config file
//! - `ask`      — Return stored questions, or generate and store one
//! - `lookup`   — Search stored questions only
//! - `generate` — Generate and store a question
//! - `check`    — Load and validate the corpus
//! - `config`   — Show, validate, or locate the configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "qbank",
    about = "qbank — interview question bank with fuzzy lookup and on-demand generation",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.qbank/config.toml
    #[arg(long, global = true, env = "QBANK_CONFIG")]
    config: Option<PathBuf>,
}

/// The (subject, experience, company type) triple a request asks for.
#[derive(Args)]
pub struct KeyArgs {
    /// Interview subject, e.g. "Python"
    #[arg(short, long)]
    subject: String,

    /// Experience-range label, e.g. "2-4 years"
    #[arg(short, long)]
    experience: String,

    /// Company type, e.g. "Startup"
    #[arg(short = 'c', long)]
    company_type: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Return stored questions, or generate and store one on a miss
    Ask {
        #[command(flatten)]
        key: KeyArgs,

        /// Tag for a newly created entry (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Search stored questions without generating
    Lookup {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Generate a question and store it
    Generate {
        #[command(flatten)]
        key: KeyArgs,

        /// Tag for a newly created entry (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Load and validate the stored corpus
    Check,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets omitted)
    Show,
    /// Validate the configuration
    Validate,
    /// Print the default config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::init::run(config_path).await?,
        Commands::Ask { key, tags } => commands::ask::run(config_path, key, tags).await?,
        Commands::Lookup { key } => commands::lookup::run(config_path, key).await?,
        Commands::Generate { key, tags } => commands::generate::run(config_path, key, tags).await?,
        Commands::Check => commands::check::run(config_path).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
