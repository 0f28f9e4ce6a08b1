//! Entity reference table
//!
//! Entities reference each other (and are referenced by players, scripts and
//! sounds) by [`EntityId`](crate::session::EntityId). In a save those links
//! become *archive numbers*: the position of the target in a single sweep of
//! the entity arena.
//!
//! - Save: [`EntityNumbering`] assigns numbers once, before any segment is
//!   written, in the same order the Entities segment writes entities.
//! - Load: [`EntityTable`] grows as entities are read. References found
//!   anywhere are queued in a [`FixupQueue`] and resolved once every segment
//!   has been read.

mod fixup;
mod numbering;
mod table;

pub use fixup::{EntitySlot, FixupQueue, GeometrySlot};
pub use numbering::EntityNumbering;
pub use table::EntityTable;

/// Encoded null reference
pub const NONE: i32 = -1;

/// Encoded reference to the local player's current body
///
/// Only written outside network games. The body is reconnected through the
/// Players segment, so these references resolve after it.
pub const LOCAL_PLAYER: i32 = -2;
