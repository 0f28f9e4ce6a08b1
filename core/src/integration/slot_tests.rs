//! Slot-backed save/load through the Archiver

use std::fs;

use crate::{
    archiver::Archiver,
    config::{ArchiveLimits, Config, SlotConfig},
    error::ArchiveError,
    session::{Session, SoundOrigin, SoundSequence},
    test_utils::{
        TEST_MAP, TestMapLoader, TestScriptModule, assert_sessions_equivalent, base_level,
        fixture_session,
    },
};

fn archiver(dir: &std::path::Path) -> Archiver {
    Archiver::from_config(Config {
        slots: SlotConfig::with_root(dir),
        limits: ArchiveLimits::default(),
    })
}

#[test]
fn test_archive_and_unarchive_game() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    let original = fixture_session();
    archiver.archive_game(&original, 0, "hub two").unwrap();

    let mut live = Session::new(base_level());
    let mut maps = TestMapLoader::default();
    let report = archiver
        .unarchive_game(0, &mut live, &mut maps, &TestScriptModule::default())
        .unwrap();

    assert_eq!(report.description, "hub two");
    assert_eq!(maps.loads, 1);
    assert_sessions_equivalent(&original, &live);
}

#[test]
fn test_slot_header_without_loading() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    archiver.archive_game(&fixture_session(), 3, "before the boss").unwrap();

    let header = archiver.slot_header(3).unwrap();
    assert_eq!(header.description, "before the boss");
    assert_eq!(header.map, TEST_MAP);
}

#[test]
fn test_load_keeps_console_player() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    archiver.archive_game(&fixture_session(), 0, "x").unwrap();

    let mut live = Session::new(base_level());
    live.console_player = 5;
    archiver
        .unarchive_game(0, &mut live, &mut TestMapLoader::default(), &TestScriptModule::default())
        .unwrap();
    assert_eq!(live.console_player, 5);
}

#[test]
fn test_copy_there_and_back_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    archiver.archive_game(&fixture_session(), 1, "x").unwrap();
    let path = archiver.store().path_for(1).unwrap();
    let original = fs::read(&path).unwrap();

    archiver.copy_slot(1, archiver.store().base_slot()).unwrap();
    archiver.copy_slot(archiver.store().base_slot(), 1).unwrap();
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[test]
fn test_clear_slot() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    archiver.archive_game(&fixture_session(), 4, "x").unwrap();
    archiver.clear_slot(4).unwrap();

    let err = archiver.slot_header(4).unwrap_err();
    assert!(matches!(err, ArchiveError::EmptySlot(4)));
}

#[test]
fn test_empty_slot_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    let mut live = fixture_session();
    let err = archiver
        .unarchive_game(2, &mut live, &mut TestMapLoader::default(), &TestScriptModule::default())
        .unwrap_err();
    assert!(matches!(err, ArchiveError::EmptySlot(2)));
    assert_eq!(live.entities.len(), 6);
}

#[test]
fn test_reborn_restarts_from_saved_point() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    let checkpoint = fixture_session();
    archiver.save_reborn(&checkpoint).unwrap();
    assert!(archiver.store().exists(archiver.store().reborn_slot()).unwrap());

    // Play on, then die
    let mut live = fixture_session();
    live.level_time += 700;
    for id in live.entities.ids() {
        live.entities.remove(id);
    }

    let report = archiver
        .load_reborn(&mut live, &mut TestMapLoader::default(), &TestScriptModule::default())
        .unwrap();
    assert_eq!(report.description, "reborn");
    assert_sessions_equivalent(&checkpoint, &live);
}

#[test]
fn test_unsaveable_session_keeps_previous_slot() {
    let dir = tempfile::tempdir().unwrap();
    let archiver = archiver(dir.path());
    let good = fixture_session();
    archiver.archive_game(&good, 1, "good").unwrap();
    let path = archiver.store().path_for(1).unwrap();
    let before = fs::read(&path).unwrap();

    let mut bad = fixture_session();
    let id = bad.entities.ids()[0];
    bad.entities.get_mut(id).unwrap().sector = Some(99);
    bad.sounds.push(SoundSequence {
        origin: SoundOrigin::Polyobject(50),
        ..Default::default()
    });
    let err = archiver.archive_game(&bad, 1, "bad").unwrap_err();
    assert!(matches!(err, ArchiveError::IndexOutOfRange { .. }));
    assert_eq!(fs::read(&path).unwrap(), before);

    let mut live = Session::new(base_level());
    let report = archiver
        .unarchive_game(1, &mut live, &mut TestMapLoader::default(), &TestScriptModule::default())
        .unwrap();
    assert_eq!(report.description, "good");
    assert_sessions_equivalent(&good, &live);
}
