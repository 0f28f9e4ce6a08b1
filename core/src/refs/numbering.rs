//! Save-side entity numbering

use hashbrown::HashMap;

use super::{LOCAL_PLAYER, NONE};
use crate::session::{EntityArena, EntityId, Session};

/// Archive numbers for one save operation
pub struct EntityNumbering {
    numbers: HashMap<EntityId, i32>,
    order: Vec<EntityId>,
    local_body: Option<EntityId>,
}

impl EntityNumbering {
    /// Number every live entity in arena iteration order
    ///
    /// References to `local_body` are encoded as [`LOCAL_PLAYER`] instead of
    /// its number.
    pub fn number_entities(arena: &EntityArena, local_body: Option<EntityId>) -> Self {
        let order = arena.ids();
        let numbers = order
            .iter()
            .enumerate()
            .map(|(n, &id)| (id, n as i32))
            .collect();
        Self {
            numbers,
            order,
            local_body,
        }
    }

    /// Number a session's entities, applying the local player rule
    ///
    /// Network games never use the local player sentinel: every peer's body
    /// is an ordinary entity there.
    pub fn for_session(session: &Session) -> Self {
        let local_body = if session.rules.netgame {
            None
        } else {
            session.local_body()
        };
        Self::number_entities(&session.entities, local_body)
    }

    /// Entities in archive number order
    pub fn order(&self) -> &[EntityId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Archive number of a live entity
    pub fn number_of(&self, id: EntityId) -> Option<i32> {
        self.numbers.get(&id).copied()
    }

    /// Encode a reference as its plain archive number, never [`LOCAL_PLAYER`]
    pub fn plain_reference_of(&self, id: Option<EntityId>) -> i32 {
        id.and_then(|id| self.number_of(id)).unwrap_or(NONE)
    }

    /// Encode a reference field
    ///
    /// Ids that are not in the table (removed entities, stale caches) are
    /// written as [`NONE`].
    pub fn reference_of(&self, id: Option<EntityId>) -> i32 {
        let Some(id) = id else {
            return NONE;
        };
        if self.local_body == Some(id) {
            return LOCAL_PLAYER;
        }
        match self.number_of(id) {
            Some(n) => n,
            None => {
                log::debug!("reference to non-live entity {:?} archived as null", id);
                NONE
            }
        }
    }
}
