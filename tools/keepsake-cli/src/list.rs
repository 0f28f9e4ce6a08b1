//! List command - one line per save slot

use anyhow::Result;
use keepsake_core::{ArchiveError, Archiver, SaveHeader};

/// Execute the list command
pub fn execute(archiver: &Archiver) -> Result<()> {
    let store = archiver.store();
    println!("Slots in {}:", store.config().root.display());
    for slot in 0..store.config().slot_count {
        let line = slot_line(slot, role(archiver, slot), archiver.slot_header(slot));
        println!("{}", line);
    }
    Ok(())
}

/// Reserved purpose of a slot, if any
fn role(archiver: &Archiver, slot: u32) -> Option<&'static str> {
    if slot == archiver.store().base_slot() {
        Some("base")
    } else if slot == archiver.store().reborn_slot() {
        Some("reborn")
    } else {
        None
    }
}

fn slot_line(slot: u32, role: Option<&str>, header: keepsake_core::Result<SaveHeader>) -> String {
    let label = match role {
        Some(role) => format!("{:>2} ({})", slot, role),
        None => format!("{:>2}", slot),
    };
    match header {
        Ok(header) => format!("  {:<12} {:<24} {}", label, header.description, header.map),
        Err(ArchiveError::EmptySlot(_)) => format!("  {:<12} <empty>", label),
        Err(e) => {
            tracing::warn!("slot {}: {}", slot, e);
            format!("  {:<12} <unreadable: {}>", label, e)
        }
    }
}
