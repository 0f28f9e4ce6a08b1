//! Path command - print the file backing a slot

use anyhow::Result;
use clap::Args;
use keepsake_core::Archiver;

/// Arguments for the path command
#[derive(Args)]
pub struct PathArgs {
    /// Slot to locate
    pub slot: u32,
}

/// Execute the path command
pub fn execute(archiver: &Archiver, args: PathArgs) -> Result<()> {
    let path = archiver.store().path_for(args.slot)?;
    println!("{}", path.display());
    if !path.is_file() {
        tracing::info!("slot {} is empty", args.slot);
    }
    Ok(())
}
