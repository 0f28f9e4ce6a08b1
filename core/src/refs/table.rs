//! Load-side entity table

use crate::session::EntityId;

/// Archive number to restored entity, built while reading the Entities segment
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: Vec<EntityId>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
        }
    }

    /// Record the next restored entity; returns its archive number
    pub fn push(&mut self, id: EntityId) -> i32 {
        self.entities.push(id);
        (self.entities.len() - 1) as i32
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity restored under `number`, if any
    pub fn entity_of(&self, number: i32) -> Option<EntityId> {
        usize::try_from(number)
            .ok()
            .and_then(|n| self.entities.get(n))
            .copied()
    }
}
