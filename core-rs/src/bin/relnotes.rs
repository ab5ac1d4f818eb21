//! relnotes - release notes CLI
//!
//! Command-line front end for the release notes reader

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use relnotes_core::{
    DocumentFormat, FileStore, LocalRepository, Product, RelNotesConfig, ReleaseNotesReader,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name = "relnotes")]
#[command(version)]
#[command(about = "Show release notes bundled in product packages", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/relnotes/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Package repository directory (overrides the config file)
    #[arg(long, global = true)]
    repository: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the release notes of a product
    Show {
        /// Product name (e.g., SLES)
        product: String,
        /// Language (e.g., de_DE); defaults to RELNOTES_LANG or the config
        #[arg(long, short)]
        lang: Option<String>,
        /// Content format: txt, rtf, html, md or any other file extension
        #[arg(long, short)]
        format: Option<DocumentFormat>,
    },
    /// Show which package carries the release notes of a product
    Resolve {
        /// Product name
        product: String,
    },
    /// Inspect the release notes cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// List cached release notes
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = load_config(&cli)?;
    let store = FileStore::new(config.cache_dir()?);

    match cli.command {
        Commands::Show { product, lang, format } => {
            let reader = build_reader(&config, store)?;
            let product = Product::new(product);
            let language = lang.unwrap_or_else(|| config.language());
            let format = format.unwrap_or_else(|| config.format());

            match reader.release_notes_for(&product, &language, format) {
                Some(document) => {
                    if document.is_fallback() {
                        eprintln!(
                            "{} no release notes in '{}', showing '{}'",
                            "note:".yellow(),
                            language,
                            document.resolved_language()
                        );
                    }
                    print!("{}", document.content());
                }
                None => {
                    eprintln!("No release notes found for {}", product);
                    std::process::exit(1);
                }
            }
        }

        Commands::Resolve { product } => {
            let reader = build_reader(&config, store)?;
            let product = Product::new(product);

            match reader.resolver().resolve(&product) {
                Some(candidate) => {
                    println!("{} {}", "✓".green(), product);
                    println!("  Package: {}", candidate.name);
                    println!("  Version: {}", candidate.version);
                    println!("  Status:  {}", candidate.status);
                }
                None => {
                    eprintln!("{} no release notes package for {}", "✗".red(), product);
                    std::process::exit(1);
                }
            }
        }

        Commands::Cache { command } => match command {
            CacheCommands::List => {
                let entries = store.entries()?;
                if entries.is_empty() {
                    println!("Cache is empty ({})", store.cache_dir().display());
                    return Ok(());
                }

                println!(
                    "{:<24} {:<10} {:<10} {:<6} {:<24} {}",
                    "PRODUCT", "REQUESTED", "RESOLVED", "FORMAT", "VERSION", "CACHED"
                );
                for entry in entries {
                    println!(
                        "{:<24} {:<10} {:<10} {:<6} {:<24} {}",
                        entry.key.product_name,
                        entry.key.language,
                        entry.resolved_language,
                        entry.key.format,
                        entry.key.version,
                        entry.cached_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        },
    }

    Ok(())
}

/// Config file, with --repository taking precedence
fn load_config(cli: &Cli) -> anyhow::Result<RelNotesConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => RelNotesConfig::default_path()?,
    };

    if path.exists() {
        let mut config = RelNotesConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        if let Some(repository) = &cli.repository {
            config.repository = repository.clone();
        }
        return Ok(config);
    }

    match &cli.repository {
        Some(repository) => Ok(RelNotesConfig::new(repository.clone())),
        None => bail!(
            "No repository configured: pass --repository or create {}",
            path.display()
        ),
    }
}

fn build_reader(config: &RelNotesConfig, store: FileStore) -> anyhow::Result<ReleaseNotesReader> {
    let repository = Arc::new(
        LocalRepository::open(&config.repository)
            .with_context(|| format!("Failed to open repository {}", config.repository.display()))?,
    );

    Ok(
        ReleaseNotesReader::new(repository.clone(), repository, Arc::new(store))
            .with_defaults(config.language(), config.format()),
    )
}
