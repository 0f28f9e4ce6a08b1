//! Keepsake Core - Game state archiving engine
//!
//! This crate serializes a running game session (world geometry deltas,
//! entities, movers, script interpreters, players, sound sequences) into a
//! segment-framed save stream and rebuilds an equivalent session from it.
//!
//! # Architecture
//!
//! - [`Session`] - The live state a save captures
//! - [`Archiver`] - Save/load orchestration on top of a [`SlotStore`]
//! - [`passes`] - One archive/unarchive pair per segment
//! - [`registry`] - Tagged, fixed-size thinker records
//! - [`refs`] - Entity numbering and deferred reference fixup

pub mod archiver;
pub mod config;
pub mod error;
#[cfg(test)]
mod integration;
pub mod passes;
pub mod refs;
pub mod registry;
pub mod segment;
pub mod session;
pub mod slots;
pub mod stream;
#[cfg(test)]
pub mod test_utils;

// Re-export the save/load entry points
pub use archiver::{Archiver, LoadReport, archive_session, read_header, unarchive_session};
pub use config::{ArchiveLimits, Config, SlotConfig};
pub use error::{ArchiveError, FormatError, ReferenceError, Result};
pub use passes::{MAGIC, SAVE_VERSION, SaveHeader};
pub use segment::{SEGMENT_ORDER, SegmentTag};
pub use slots::{SlotFlags, SlotStore};

// Re-export session types
pub use session::{
    EntityId, GameRules, Level, MAX_PLAYERS, MapLoader, ScriptModule, Session, Thinker, ThinkerId,
};
