//! Copy command - duplicate a slot

use anyhow::{Context, Result};
use clap::Args;
use keepsake_core::Archiver;

/// Arguments for the copy command
#[derive(Args)]
pub struct CopyArgs {
    /// Source slot
    pub from: u32,

    /// Destination slot (replaced if it holds a save)
    pub to: u32,
}

/// Execute the copy command
pub fn execute(archiver: &Archiver, args: CopyArgs) -> Result<()> {
    archiver
        .copy_slot(args.from, args.to)
        .with_context(|| format!("Failed to copy slot {} to slot {}", args.from, args.to))?;
    tracing::info!("copied slot {} to slot {}", args.from, args.to);
    Ok(())
}
