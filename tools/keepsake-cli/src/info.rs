//! Info command - print one save's header

use anyhow::{Context, Result};
use clap::Args;
use keepsake_core::Archiver;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Slot to inspect
    pub slot: u32,
}

/// Execute the info command
pub fn execute(archiver: &Archiver, args: InfoArgs) -> Result<()> {
    let path = archiver.store().path_for(args.slot)?;
    let header = archiver
        .slot_header(args.slot)
        .with_context(|| format!("Failed to read slot {}", args.slot))?;

    let players: Vec<String> = header
        .in_game
        .iter()
        .enumerate()
        .filter(|(_, in_game)| **in_game)
        .map(|(slot, _)| slot.to_string())
        .collect();
    let rules = &header.rules;

    println!("=== Slot {} ===", args.slot);
    println!("  File:        {}", path.display());
    println!("  Description: {}", header.description);
    println!("  Map:         {}", header.map);
    println!("  Version:     {}", header.version);
    println!("  Skill:       {}", rules.skill);
    println!(
        "  Mode:        {}{}",
        match rules.deathmatch {
            0 => "cooperative",
            1 => "deathmatch",
            _ => "altdeath",
        },
        if rules.netgame { " (netgame)" } else { "" }
    );
    println!("  Players:     {}", players.join(", "));
    println!("  Deferred:    {} scripts", header.store.len());
    Ok(())
}
