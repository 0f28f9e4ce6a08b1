//! Simulated entities and their slot arena
//!
//! Entities live in an [`EntityArena`]. An [`EntityId`] pairs a slot index
//! with the slot's generation, so an id held after its entity was removed
//! never resolves to whatever later reuses the slot.

use super::Fixed;

/// Generational handle to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Slot index within the arena
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

bitflags::bitflags! {
    /// Entity behaviour flags
    ///
    /// Unknown bits are preserved through a save/load cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u32 {
        const SPECIAL = 1 << 0;
        const SOLID = 1 << 1;
        const SHOOTABLE = 1 << 2;
        const NOSECTOR = 1 << 3;
        const NOBLOCKMAP = 1 << 4;
        const AMBUSH = 1 << 5;
        const JUSTHIT = 1 << 6;
        const JUSTATTACKED = 1 << 7;
        const SPAWNCEILING = 1 << 8;
        const NOGRAVITY = 1 << 9;
        const DROPOFF = 1 << 10;
        const PICKUP = 1 << 11;
        const NOCLIP = 1 << 12;
        const FLOAT = 1 << 14;
        const MISSILE = 1 << 16;
        const DROPPED = 1 << 17;
        const CORPSE = 1 << 20;
        const COUNTKILL = 1 << 22;
        const COUNTITEM = 1 << 23;
    }
}

/// A type-dependent special field
///
/// Some entity types keep a plain counter in their special fields, others
/// keep a link to another entity (a projectile's owner, a minion's master).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialValue {
    Int(i32),
    Entity(Option<EntityId>),
}

impl Default for SpecialValue {
    fn default() -> Self {
        Self::Int(0)
    }
}

/// A simulated actor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    /// Entity type number
    pub kind: u16,
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: u32,
    pub mom_x: Fixed,
    pub mom_y: Fixed,
    pub mom_z: Fixed,
    pub flags: EntityFlags,
    pub flags2: u32,
    pub health: i32,
    /// Tics remaining in the current state
    pub tics: i32,
    /// Index into the state table
    pub state: u32,
    /// Thing id used by scripts
    pub tid: i16,
    pub special: u8,
    pub args: [u8; 5],
    pub floor_z: Fixed,
    pub ceiling_z: Fixed,
    pub radius: Fixed,
    pub height: Fixed,
    /// Sector the entity currently occupies
    pub sector: Option<usize>,
    pub target: Option<EntityId>,
    pub tracer: Option<EntityId>,
    pub special1: SpecialValue,
    pub special2: SpecialValue,
    /// Owning player slot when this entity is a player body
    pub player: Option<u8>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Index-stable container of live entities
///
/// Iteration is in slot order. That order is the archive numbering order.
#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, reusing a free slot when one exists
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    /// Remove an entity; its id (and every copy of it) goes stale
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_mut())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entity.as_ref().map(|e| {
                (
                    EntityId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    e,
                )
            })
        })
    }

    /// Ids of live entities in slot order
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }
}
