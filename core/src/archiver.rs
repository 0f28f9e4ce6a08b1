//! Save/load orchestration
//!
//! [`archive_session`] and [`unarchive_session`] turn a [`Session`] into a
//! save stream and back. [`Archiver`] adds slot storage on top.
//!
//! Loading never touches the live session: segments are read into a staging
//! session built from the base map, references are fixed up, and only a
//! fully successful load is handed back (or swapped in by
//! [`Archiver::unarchive_game`]).

use crate::config::{ArchiveLimits, Config};
use crate::error::{ArchiveError, ReferenceError, Result};
use crate::passes::{
    LoadContext, SaveContext, SaveHeader, entities, header, misc, players, polyobjs, scripts,
    sounds, textures, thinkers, world,
};
use crate::segment::{SEGMENT_ORDER, SegmentTag};
use crate::session::{MapLoader, ScriptModule, Session};
use crate::slots::SlotStore;
use crate::stream::{ByteReader, ByteWriter};

/// Description written to the reborn slot
const REBORN_DESCRIPTION: &str = "reborn";

/// Summary of a completed load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub description: String,
    pub map: String,
    pub entities: usize,
    pub thinkers: usize,
    pub scripts: usize,
    /// Entity references that resolved to nothing and were set to null
    pub unresolved: Vec<ReferenceError>,
}

/// Serialize `session` into a save stream
pub fn archive_session(
    session: &Session,
    limits: &ArchiveLimits,
    description: &str,
) -> Result<Vec<u8>> {
    archive_segments(session, limits, description).map(|(bytes, _)| bytes)
}

/// Serialize `session`, also returning the offset each segment starts at
pub(crate) fn archive_segments(
    session: &Session,
    limits: &ArchiveLimits,
    description: &str,
) -> Result<(Vec<u8>, Vec<(SegmentTag, usize)>)> {
    let ctx = SaveContext::new(session, limits)?;
    let mut w = ByteWriter::new(Vec::new());
    let mut offsets = Vec::with_capacity(SEGMENT_ORDER.len());
    for tag in SEGMENT_ORDER {
        offsets.push((tag, w.position()));
        match tag {
            SegmentTag::Header => header::archive_header(&ctx, description, &mut w)?,
            SegmentTag::MapHeader => header::archive_map_header(&ctx, &mut w)?,
            SegmentTag::TextureArchive => textures::archive_textures(&ctx, &mut w)?,
            SegmentTag::World => world::archive_world(&ctx, &mut w)?,
            SegmentTag::Polyobjects => polyobjs::archive_polyobjs(&ctx, &mut w)?,
            SegmentTag::Entities => entities::archive_entities(&ctx, &mut w)?,
            SegmentTag::Thinkers => thinkers::archive_thinkers(&ctx, &mut w)?,
            SegmentTag::Scripts => scripts::archive_scripts(&ctx, &mut w)?,
            SegmentTag::Players => players::archive_players(&ctx, &mut w)?,
            SegmentTag::Sounds => sounds::archive_sounds(&ctx, &mut w)?,
            SegmentTag::Misc => misc::archive_misc(&ctx, &mut w)?,
            SegmentTag::End => misc::archive_end(&mut w)?,
        }
    }
    Ok((w.into_inner(), offsets))
}

/// Rebuild a session from a save stream
///
/// `maps` supplies the base level named by the header; `script_module` validates
/// interpreter state. `console_player` is the locally controlled slot, used
/// to resolve local player references.
pub fn unarchive_session(
    bytes: &[u8],
    limits: &ArchiveLimits,
    console_player: usize,
    maps: &mut dyn MapLoader,
    script_module: &dyn ScriptModule,
) -> Result<(Session, LoadReport)> {
    let mut r = ByteReader::new(bytes);
    let save_header = header::unarchive_header(&mut r)?;
    let level = maps
        .load_level(&save_header.map)
        .ok_or_else(|| ArchiveError::MapUnavailable(save_header.map.clone()))?;

    let mut staging = Session::new(level);
    staging.console_player = console_player;
    save_header.apply(&mut staging);

    let mut ctx = LoadContext::new(staging, save_header, limits, script_module);
    for tag in SEGMENT_ORDER {
        match tag {
            SegmentTag::Header => {}
            SegmentTag::MapHeader => header::unarchive_map_header(&mut ctx, &mut r)?,
            SegmentTag::TextureArchive => textures::unarchive_textures(&mut ctx, &mut r)?,
            SegmentTag::World => world::unarchive_world(&mut ctx, &mut r)?,
            SegmentTag::Polyobjects => polyobjs::unarchive_polyobjs(&mut ctx, &mut r)?,
            SegmentTag::Entities => entities::unarchive_entities(&mut ctx, &mut r)?,
            SegmentTag::Thinkers => thinkers::unarchive_thinkers(&mut ctx, &mut r)?,
            SegmentTag::Scripts => scripts::unarchive_scripts(&mut ctx, &mut r)?,
            SegmentTag::Players => players::unarchive_players(&mut ctx, &mut r)?,
            SegmentTag::Sounds => sounds::unarchive_sounds(&mut ctx, &mut r)?,
            SegmentTag::Misc => misc::unarchive_misc(&mut ctx, &mut r)?,
            SegmentTag::End => misc::unarchive_end(&mut r)?,
        }
    }

    let LoadContext {
        mut session,
        table,
        fixups,
        header: saved,
        ..
    } = ctx;
    log::debug!("resolving {} deferred references", fixups.len());
    let unresolved = fixups.resolve(&mut session, &table)?;

    let report = LoadReport {
        description: saved.description,
        map: saved.map,
        entities: session.entities.len(),
        thinkers: session.thinkers.len(),
        scripts: session.scripts.interpreters.len(),
        unresolved,
    };
    Ok((session, report))
}

/// Read only the Header segment of a save stream
pub fn read_header(bytes: &[u8]) -> Result<SaveHeader> {
    header::unarchive_header(&mut ByteReader::new(bytes))
}

/// Slot-backed archiver
#[derive(Debug, Clone)]
pub struct Archiver {
    store: SlotStore,
    limits: ArchiveLimits,
}

impl Archiver {
    pub fn new(store: SlotStore, limits: ArchiveLimits) -> Self {
        Self { store, limits }
    }

    /// Build an archiver from loaded configuration
    pub fn from_config(config: Config) -> Self {
        Self::new(SlotStore::new(config.slots), config.limits)
    }

    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    pub fn limits(&self) -> &ArchiveLimits {
        &self.limits
    }

    /// Save `session` into `slot`
    pub fn archive_game(&self, session: &Session, slot: u32, description: &str) -> Result<()> {
        let bytes = archive_session(session, &self.limits, description)?;
        self.store.write(slot, &bytes)?;
        log::info!(
            "saved '{}' ({}, {} entities, {} bytes) to slot {}",
            description,
            session.level.name,
            session.entities.len(),
            bytes.len(),
            slot
        );
        Ok(())
    }

    /// Load `slot`, replacing `session` only if the whole load succeeds
    ///
    /// The caller's `console_player` is kept.
    pub fn unarchive_game(
        &self,
        slot: u32,
        session: &mut Session,
        maps: &mut dyn MapLoader,
        script_module: &dyn ScriptModule,
    ) -> Result<LoadReport> {
        let bytes = self.store.read(slot)?;
        let (restored, report) = unarchive_session(
            &bytes,
            &self.limits,
            session.console_player,
            maps,
            script_module,
        )?;
        *session = restored;
        log::info!(
            "loaded '{}' ({}, {} entities) from slot {}",
            report.description,
            report.map,
            report.entities,
            slot
        );
        if !report.unresolved.is_empty() {
            log::warn!(
                "{} references in slot {} were set to null",
                report.unresolved.len(),
                slot
            );
        }
        Ok(report)
    }

    pub fn copy_slot(&self, from: u32, to: u32) -> Result<()> {
        self.store.copy(from, to)
    }

    pub fn clear_slot(&self, slot: u32) -> Result<()> {
        self.store.clear(slot)
    }

    /// Header of the save in `slot`, without loading it
    pub fn slot_header(&self, slot: u32) -> Result<SaveHeader> {
        read_header(&self.store.read(slot)?)
    }

    /// Save the restart point used after the player dies
    pub fn save_reborn(&self, session: &Session) -> Result<()> {
        self.archive_game(session, self.store.reborn_slot(), REBORN_DESCRIPTION)
    }

    /// Restart from the reborn slot
    pub fn load_reborn(
        &self,
        session: &mut Session,
        maps: &mut dyn MapLoader,
        script_module: &dyn ScriptModule,
    ) -> Result<LoadReport> {
        self.unarchive_game(self.store.reborn_slot(), session, maps, script_module)
    }
}
