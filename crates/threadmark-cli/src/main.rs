use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use threadmark_config::Config;
use threadmark_engine::{Lookups, NoLookups, PostProcessor, parse, tokenize};

mod fixtures;

use fixtures::FixtureLookups;

/// Tokenize, parse and render forum post markup
#[derive(Parser)]
#[command(name = "threadmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a message as JSON
    Tokenize {
        /// Message file; reads stdin when absent or `-`
        file: Option<PathBuf>,
    },
    /// Print the parsed node tree of a message as JSON
    Parse {
        /// Message file; reads stdin when absent or `-`
        file: Option<PathBuf>,
    },
    /// Parse a message, resolve references and embeds, roll dice
    Render {
        /// Message file; reads stdin when absent or `-`
        file: Option<PathBuf>,
        /// JSON file with the posts and embeds to resolve against
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Seed for dice rolls
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tokenize { file } => {
            let text = read_message(file.as_deref())?;
            print_json(&tokenize(&text))
        }
        Commands::Parse { file } => {
            let text = read_message(file.as_deref())?;
            print_json(&parse(&tokenize(&text)))
        }
        Commands::Render {
            file,
            fixtures,
            seed,
        } => {
            let text = read_message(file.as_deref())?;
            render(&text, fixtures, seed).await
        }
        Commands::InitConfig { force } => init_config(force),
    }
}

async fn render(text: &str, fixtures: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let config = Config::load()?.unwrap_or_default();

    let lookups: Arc<dyn Lookups> = match fixtures.or(config.fixtures_path) {
        Some(path) => Arc::new(FixtureLookups::load(&path)?),
        None => {
            log::info!("No fixtures given, references will render as text");
            Arc::new(NoLookups)
        }
    };
    let mut rng = match seed.or(config.dice_seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let nodes = parse(&tokenize(text));
    let processor =
        PostProcessor::new(lookups).with_max_concurrent_lookups(config.max_concurrent_lookups);
    let rendered = processor
        .process_until(&nodes, &mut rng, interrupted())
        .await?;
    print_json(&rendered)
}

/// Completes on Ctrl-C. Never completes when the signal cannot be watched.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

fn init_config(force: bool) -> Result<()> {
    let config_path = Config::config_path();
    if config_path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }
    Config::default().save_to_path(&config_path)?;
    log::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

fn read_message(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message at {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read message from stdin")?;
            Ok(text)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
