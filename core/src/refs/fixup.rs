//! Deferred reference fixups
//!
//! Decoders never resolve references themselves. They record which field
//! needs filling and the encoded value; [`FixupQueue::resolve`] fills them
//! all in once every segment has been read:
//!
//! 1. entity references, through the [`EntityTable`] (and the reconnected
//!    local player body for [`LOCAL_PLAYER`]);
//! 2. sector and polyobject references, against the restored level.

use super::{EntityTable, LOCAL_PLAYER, NONE};
use crate::error::{ArchiveError, FormatError, ReferenceError, Result};
use crate::session::{EntityId, Session, SoundOrigin, SpecialValue};

/// A field holding an entity reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySlot {
    Target(EntityId),
    Tracer(EntityId),
    Special1(EntityId),
    Special2(EntityId),
    /// Index into `scripts.interpreters`
    ScriptActivator(usize),
    /// Player slot
    PlayerAttacker(usize),
    /// Index into `sounds`
    SoundOrigin(usize),
}

/// A field holding a sector or polyobject reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySlot {
    EntitySector(EntityId),
    SoundSector(usize),
    SoundPolyobject(usize),
}

/// Pending reference rewrites for one load
#[derive(Debug, Default)]
pub struct FixupQueue {
    entity_refs: Vec<(EntitySlot, i32)>,
    geometry_refs: Vec<(GeometrySlot, u32)>,
    local_player_refs: usize,
    max_local_player_refs: usize,
}

impl FixupQueue {
    /// Create a queue accepting at most `max_local_player_refs` sentinel references
    pub fn new(max_local_player_refs: usize) -> Self {
        Self {
            max_local_player_refs,
            ..Default::default()
        }
    }

    /// Queue an entity reference
    ///
    /// Null references need no fixup; the field already defaults to null.
    pub fn push_entity(&mut self, slot: EntitySlot, number: i32) -> Result<()> {
        if number == NONE {
            return Ok(());
        }
        if number == LOCAL_PLAYER {
            if self.local_player_refs >= self.max_local_player_refs {
                return Err(ArchiveError::Capacity {
                    what: "local player references",
                    count: self.local_player_refs + 1,
                    max: self.max_local_player_refs,
                });
            }
            self.local_player_refs += 1;
        }
        self.entity_refs.push((slot, number));
        Ok(())
    }

    /// Queue a sector or polyobject reference
    pub fn push_geometry(&mut self, slot: GeometrySlot, index: u32) {
        self.geometry_refs.push((slot, index));
    }

    pub fn len(&self) -> usize {
        self.entity_refs.len() + self.geometry_refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every queued fixup to `session`
    ///
    /// Unresolvable entity references are set to null and returned.
    /// Out-of-range sector or polyobject indices are format errors.
    pub fn resolve(self, session: &mut Session, table: &EntityTable) -> Result<Vec<ReferenceError>> {
        let mut unresolved = Vec::new();
        let local_body = session.local_body();

        for (slot, number) in self.entity_refs {
            let target = match number {
                LOCAL_PLAYER => local_body,
                n => table.entity_of(n),
            };
            if target.is_none() {
                let err = ReferenceError {
                    field: describe(slot),
                    number,
                };
                log::warn!("{}; substituting null", err);
                unresolved.push(err);
            }
            apply_entity(session, slot, target);
        }

        let sectors = session.level.sectors.len();
        let polyobjs = session.level.polyobjs.len();
        for (slot, index) in self.geometry_refs {
            let (what, count) = match slot {
                GeometrySlot::EntitySector(_) | GeometrySlot::SoundSector(_) => ("sector", sectors),
                GeometrySlot::SoundPolyobject(_) => ("polyobject", polyobjs),
            };
            if index as usize >= count {
                return Err(FormatError::BadIndex { what, index, count }.into());
            }
            apply_geometry(session, slot, index as usize);
        }

        Ok(unresolved)
    }
}

fn describe(slot: EntitySlot) -> String {
    match slot {
        EntitySlot::Target(id) => format!("entity {} target", id.index()),
        EntitySlot::Tracer(id) => format!("entity {} tracer", id.index()),
        EntitySlot::Special1(id) => format!("entity {} special1", id.index()),
        EntitySlot::Special2(id) => format!("entity {} special2", id.index()),
        EntitySlot::ScriptActivator(i) => format!("script interpreter {} activator", i),
        EntitySlot::PlayerAttacker(p) => format!("player {} attacker", p),
        EntitySlot::SoundOrigin(i) => format!("sound sequence {} origin", i),
    }
}

fn apply_entity(session: &mut Session, slot: EntitySlot, target: Option<EntityId>) {
    match slot {
        EntitySlot::Target(id) => {
            if let Some(e) = session.entities.get_mut(id) {
                e.target = target;
            }
        }
        EntitySlot::Tracer(id) => {
            if let Some(e) = session.entities.get_mut(id) {
                e.tracer = target;
            }
        }
        EntitySlot::Special1(id) => {
            if let Some(e) = session.entities.get_mut(id) {
                e.special1 = SpecialValue::Entity(target);
            }
        }
        EntitySlot::Special2(id) => {
            if let Some(e) = session.entities.get_mut(id) {
                e.special2 = SpecialValue::Entity(target);
            }
        }
        EntitySlot::ScriptActivator(i) => {
            if let Some(s) = session.scripts.interpreters.get_mut(i) {
                s.activator = target;
            }
        }
        EntitySlot::PlayerAttacker(p) => {
            if let Some(player) = session.players.get_mut(p) {
                player.attacker = target;
            }
        }
        EntitySlot::SoundOrigin(i) => {
            if let Some(seq) = session.sounds.get_mut(i) {
                seq.origin = SoundOrigin::Entity(target);
            }
        }
    }
}

fn apply_geometry(session: &mut Session, slot: GeometrySlot, index: usize) {
    match slot {
        GeometrySlot::EntitySector(id) => {
            if let Some(e) = session.entities.get_mut(id) {
                e.sector = Some(index);
            }
        }
        GeometrySlot::SoundSector(i) => {
            if let Some(seq) = session.sounds.get_mut(i) {
                seq.origin = SoundOrigin::Sector(index);
            }
        }
        GeometrySlot::SoundPolyobject(i) => {
            if let Some(seq) = session.sounds.get_mut(i) {
                seq.origin = SoundOrigin::Polyobject(index);
            }
        }
    }
}
