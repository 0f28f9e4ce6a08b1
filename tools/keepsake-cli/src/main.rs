//! Keepsake CLI - Inspect and manage save slots
//!
//! # Commands
//!
//! - `keepsake list` - Show every slot with its description and map
//! - `keepsake path <slot>` - Print the file backing a slot
//! - `keepsake info <slot>` - Print the full header of one save
//! - `keepsake copy <from> <to>` - Copy a slot byte for byte
//! - `keepsake clear <slot>` - Delete a slot
//! - `keepsake config` - Print the effective configuration
//!
//! Slots live in the directory configured in `keepsake.toml`; `--root`
//! points every command at another directory instead.

mod clear;
mod config;
mod copy;
mod info;
mod list;
mod path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use keepsake_core::{Archiver, Config};
use std::path::PathBuf;

/// Keepsake CLI - Inspect and manage save slots
#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Inspect and manage keepsake save slots")]
#[command(version)]
struct Cli {
    /// Slot directory (overrides keepsake.toml)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every slot with its description and map
    List,

    /// Print the file backing a slot
    Path(path::PathArgs),

    /// Print the full header of one save
    Info(info::InfoArgs),

    /// Copy a slot byte for byte
    Copy(copy::CopyArgs),

    /// Delete a slot
    Clear(clear::ClearArgs),

    /// Print the effective configuration
    Config,
}

/// Load keepsake.toml and apply command-line overrides
fn load_config(root: Option<PathBuf>) -> Config {
    let mut config = keepsake_core::config::load();
    if let Some(root) = root {
        config.slots.root = root;
    }
    config
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.root);
    tracing::debug!("slot root: {}", config.slots.root.display());

    let archiver = Archiver::from_config(config.clone());

    match cli.command {
        Commands::List => list::execute(&archiver),
        Commands::Path(args) => path::execute(&archiver, args),
        Commands::Info(args) => info::execute(&archiver, args),
        Commands::Copy(args) => copy::execute(&archiver, args),
        Commands::Clear(args) => clear::execute(&archiver, args),
        Commands::Config => config::execute(&config),
    }
}
