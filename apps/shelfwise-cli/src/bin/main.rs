use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelfwise_core::config::Config;
use shelfwise_hybrid::BookService;

#[derive(Parser)]
#[command(name = "shelfwise", about = "Book recommendations and title autocomplete over prebuilt artifacts")]
struct Cli {
    /// Directory holding config.toml; defaults to the current directory.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank books by similarity to a free-text query.
    Recommend {
        query: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Title suggestions and next-term prediction for a partial query.
    Autocomplete { query: String },
    /// Report which capabilities loaded.
    Status,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config_dir {
        Some(dir) => Config::load_from(dir),
        None => Config::load(),
    }
    .context("loading configuration")?;
    let service = BookService::from_config(&config)?;

    let output = match cli.command {
        Command::Recommend { query, top_k } => serde_json::to_string_pretty(&service.recommend(&query, top_k)?)?,
        Command::Autocomplete { query } => serde_json::to_string_pretty(&service.autocomplete(&query)?)?,
        Command::Status => {
            let readiness = service.readiness();
            println!("{}", serde_json::to_string_pretty(&readiness)?);
            if !readiness.is_ready() {
                bail!("one or more capabilities are unavailable");
            }
            return Ok(());
        }
    };
    println!("{output}");
    Ok(())
}
