//! Integration tests for the archiving engine
//!
//! Tests whole-session save/load, reference integrity across segments,
//! corruption handling and slot storage.

#[cfg(test)]
mod slot_tests;

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::{
        archiver::{LoadReport, archive_session, unarchive_session},
        config::ArchiveLimits,
        error::Result,
        session::{Entity, EntityId, Session},
        test_utils::{TestMapLoader, TestScriptModule, base_level},
    };

    /// Save with default limits
    pub fn archive(session: &Session) -> Vec<u8> {
        archive_session(session, &ArchiveLimits::default(), "test save").unwrap()
    }

    /// Load with default limits and collaborators, as player 0
    pub fn restore(bytes: &[u8]) -> Result<(Session, LoadReport)> {
        restore_as(bytes, 0, &ArchiveLimits::default())
    }

    pub fn restore_as(
        bytes: &[u8],
        console_player: usize,
        limits: &ArchiveLimits,
    ) -> Result<(Session, LoadReport)> {
        unarchive_session(
            bytes,
            limits,
            console_player,
            &mut TestMapLoader::default(),
            &TestScriptModule::default(),
        )
    }

    /// Session on the base level with `count` plain entities and player 0's
    /// body spawned first
    pub fn session_with_entities(count: usize) -> (Session, Vec<EntityId>) {
        let mut session = Session::new(base_level());
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            ids.push(session.entities.insert(Entity {
                kind: 100 + i as u16,
                health: i as i32,
                sector: Some(i % 8),
                player: (i == 0).then_some(0),
                ..Default::default()
            }));
        }
        if let Some(&body) = ids.first() {
            session.players[0].in_game = true;
            session.players[0].mo = Some(body);
        }
        (session, ids)
    }
}
