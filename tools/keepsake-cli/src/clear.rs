//! Clear command - delete a slot

use anyhow::{Context, Result};
use clap::Args;
use keepsake_core::Archiver;

/// Arguments for the clear command
#[derive(Args)]
pub struct ClearArgs {
    /// Slot to delete
    pub slot: u32,
}

/// Execute the clear command
pub fn execute(archiver: &Archiver, args: ClearArgs) -> Result<()> {
    archiver
        .clear_slot(args.slot)
        .with_context(|| format!("Failed to clear slot {}", args.slot))?;
    tracing::info!("cleared slot {}", args.slot);
    Ok(())
}
