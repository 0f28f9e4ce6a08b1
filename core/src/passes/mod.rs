//! Archive pass drivers
//!
//! One module per segment. Every pass has an `archive_*` half that writes its
//! segment tag then its records, and an `unarchive_*` half that expects the
//! tag then reads the same records into the staging session.
//!
//! Passes run in [`SEGMENT_ORDER`](crate::segment::SEGMENT_ORDER). Load-side
//! passes never resolve entity references: they queue them on
//! [`LoadContext::fixups`] and the archiver resolves the queue after End.

pub mod entities;
pub mod header;
pub mod misc;
pub mod players;
pub mod polyobjs;
pub mod scripts;
pub mod sounds;
pub mod textures;
pub mod thinkers;
pub mod world;

pub use header::{MAGIC, SAVE_VERSION, SaveHeader};
pub use textures::TextureArchive;

use crate::config::ArchiveLimits;
use crate::error::{ArchiveError, Result};
use crate::refs::{EntityNumbering, EntityTable, FixupQueue};
use crate::session::{EntityId, MAX_PLAYERS, ScriptModule, Session};

/// State shared by the save passes
pub struct SaveContext<'a> {
    pub session: &'a Session,
    pub numbering: EntityNumbering,
    pub textures: TextureArchive,
    pub limits: &'a ArchiveLimits,
}

impl<'a> SaveContext<'a> {
    /// Number entities and collect textures for one save
    pub fn new(session: &'a Session, limits: &'a ArchiveLimits) -> Result<Self> {
        Ok(Self {
            session,
            numbering: EntityNumbering::for_session(session),
            textures: TextureArchive::collect(&session.level)?,
            limits,
        })
    }
}

/// State shared by the load passes
pub struct LoadContext<'a> {
    /// Session being rebuilt; swapped in only once the whole load succeeds
    pub session: Session,
    pub table: EntityTable,
    pub fixups: FixupQueue,
    /// Texture names by archive index
    pub textures: Vec<String>,
    /// Entity that claimed each player slot in the Entities segment
    pub bodies: [Option<EntityId>; MAX_PLAYERS],
    pub limits: &'a ArchiveLimits,
    pub scripts: &'a dyn ScriptModule,
    pub header: SaveHeader,
}

impl<'a> LoadContext<'a> {
    pub fn new(
        session: Session,
        header: SaveHeader,
        limits: &'a ArchiveLimits,
        scripts: &'a dyn ScriptModule,
    ) -> Self {
        Self {
            session,
            table: EntityTable::new(),
            fixups: FixupQueue::new(limits.max_local_player_refs),
            textures: Vec::new(),
            bodies: [None; MAX_PLAYERS],
            limits,
            scripts,
            header,
        }
    }
}

/// Fail with [`ArchiveError::Capacity`] when `count` exceeds `max`
pub(crate) fn check_capacity(what: &'static str, count: usize, max: usize) -> Result<()> {
    if count > max {
        return Err(ArchiveError::Capacity { what, count, max });
    }
    Ok(())
}

/// Fail with [`ArchiveError::IndexOutOfRange`] unless `index < count`
///
/// Save passes check every geometry index so a session the loader would
/// reject never reaches a slot.
pub(crate) fn check_index(what: &'static str, index: usize, count: usize) -> Result<()> {
    if index >= count {
        return Err(ArchiveError::IndexOutOfRange { what, index, count });
    }
    Ok(())
}
