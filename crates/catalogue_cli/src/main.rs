//! Catalogue store command line.
//!
//! # Responsibility
//! - Provision a store file with the current schema.
//! - Load product documents from a JSON array into a store.
//!
//! The HTTP server only ever reads; this tool is the writer side.

use anyhow::Context;
use catalogue_core::db::open_db;
use catalogue_core::{core_version, init_logging, load_products, Product};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "catalogue-cli", version, about = "Manage product catalogue stores")]
struct Cli {
    /// Log level for diagnostics written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or migrate a store file.
    Init {
        #[arg(long)]
        store: PathBuf,
    },
    /// Load products from a JSON array file, replacing documents with the same sku.
    Load {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the core crate version.
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, None).map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::Init { store } => {
            open_db(&store).with_context(|| format!("failed to open {}", store.display()))?;
            println!("store ready: {}", store.display());
        }
        Command::Load { store, file } => {
            let count = load_file(&store, &file)?;
            println!("loaded {count} product(s) into {}", store.display());
        }
        Command::Version => println!("catalogue_core version={}", core_version()),
    }
    Ok(())
}

fn load_file(store: &Path, file: &Path) -> anyhow::Result<usize> {
    let products = read_products(file)?;
    let mut conn =
        open_db(store).with_context(|| format!("failed to open {}", store.display()))?;
    let count = load_products(&mut conn, &products)
        .with_context(|| format!("failed to load {}", file.display()))?;
    Ok(count)
}

fn read_products(file: &Path) -> anyhow::Result<Vec<Product>> {
    let raw =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let products = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of products", file.display()))?;
    Ok(products)
}
