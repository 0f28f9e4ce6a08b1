//! Header segment
//!
//! Everything needed to pick a map and describe the slot: format version,
//! magic, description, map name and game rules. World-persistent script
//! state (world variables, deferred script starts) travels here too.

use std::io::Write;

use super::{LoadContext, SaveContext, check_capacity};
use crate::error::{FormatError, Result};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::{
    DeferredScript, GameRules, MAX_PLAYERS, MAX_SCRIPT_STORE, MAX_WORLD_VARS, Session,
};
use crate::stream::{ByteReader, ByteWriter};

/// Current save format version
pub const SAVE_VERSION: u32 = 2;

/// Identifies a keepsake save stream
pub const MAGIC: [u8; 8] = *b"KEEPSAKE";

/// Width of the description field
pub const DESCRIPTION_LEN: usize = 24;

/// Decoded Header segment
#[derive(Debug, Clone, PartialEq)]
pub struct SaveHeader {
    pub version: u32,
    pub description: String,
    pub map: String,
    pub rules: GameRules,
    pub in_game: [bool; MAX_PLAYERS],
    pub world_vars: [i32; MAX_WORLD_VARS],
    pub store: Vec<DeferredScript>,
}

impl SaveHeader {
    /// Copy header state into a freshly built session
    pub fn apply(&self, session: &mut Session) {
        session.rules = self.rules;
        for (player, &in_game) in session.players.iter_mut().zip(&self.in_game) {
            player.in_game = in_game;
        }
        session.scripts.world_vars = self.world_vars;
        session.scripts.store = self.store.clone();
    }
}

pub fn archive_header<W: Write>(
    ctx: &SaveContext<'_>,
    description: &str,
    w: &mut ByteWriter<W>,
) -> Result<()> {
    let session = ctx.session;
    begin_segment(w, SegmentTag::Header)?;
    w.write_u32(SAVE_VERSION)?;
    w.write_bytes(&MAGIC)?;
    w.write_padded(description, DESCRIPTION_LEN, "description bytes")?;
    w.write_name8(&session.level.name)?;

    let rules = &session.rules;
    w.write_u8(rules.skill)?;
    w.write_u8(rules.deathmatch)?;
    w.write_bool(rules.netgame)?;
    w.write_bool(rules.no_monsters)?;
    w.write_bool(rules.random_classes)?;

    for player in &session.players {
        w.write_bool(player.in_game)?;
    }

    let scripts = &session.scripts;
    w.write_i32_slice(&scripts.world_vars)?;
    check_capacity("deferred scripts", scripts.store.len(), MAX_SCRIPT_STORE)?;
    w.write_u8(scripts.store.len() as u8)?;
    for deferred in &scripts.store {
        w.write_i32(deferred.map)?;
        w.write_i32(deferred.script)?;
        w.write_bytes(&deferred.args)?;
    }
    Ok(())
}

pub fn unarchive_header(r: &mut ByteReader<'_>) -> Result<SaveHeader> {
    expect_segment(r, SegmentTag::Header)?;
    let version = r.read_u32()?;
    if r.read_bytes(MAGIC.len())? != MAGIC {
        return Err(FormatError::BadMagic.into());
    }
    if version != SAVE_VERSION {
        return Err(FormatError::UnsupportedVersion {
            found: version,
            expected: SAVE_VERSION,
        }
        .into());
    }
    let description = r.read_padded(DESCRIPTION_LEN)?;
    let map = r.read_name8()?;

    let rules = GameRules {
        skill: r.read_u8()?,
        deathmatch: r.read_u8()?,
        netgame: r.read_bool()?,
        no_monsters: r.read_bool()?,
        random_classes: r.read_bool()?,
    };

    let mut in_game = [false; MAX_PLAYERS];
    for flag in &mut in_game {
        *flag = r.read_bool()?;
    }

    let mut world_vars = [0; MAX_WORLD_VARS];
    r.read_i32_into(&mut world_vars)?;
    let count = r.read_u8()? as usize;
    check_capacity("deferred scripts", count, MAX_SCRIPT_STORE)?;
    let mut store = Vec::with_capacity(count);
    for _ in 0..count {
        let map = r.read_i32()?;
        let script = r.read_i32()?;
        let mut args = [0u8; 4];
        args.copy_from_slice(r.read_bytes(4)?);
        store.push(DeferredScript { map, script, args });
    }

    log::debug!("header: '{}' on {} (version {})", description, map, version);
    Ok(SaveHeader {
        version,
        description,
        map,
        rules,
        in_game,
        world_vars,
        store,
    })
}

/// Map header: map identity and geometry counts
pub fn archive_map_header<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let session = ctx.session;
    let level = &session.level;
    begin_segment(w, SegmentTag::MapHeader)?;
    w.write_name8(&level.name)?;
    w.write_u32(session.level_time)?;
    w.write_u32(level.sectors.len() as u32)?;
    w.write_u32(level.lines.len() as u32)?;
    w.write_u32(level.sides.len() as u32)?;
    w.write_u32(level.polyobjs.len() as u32)
}

/// Check the saved map against the base level the map loader produced
pub fn unarchive_map_header(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::MapHeader)?;
    let map = r.read_name8()?;
    if map != ctx.header.map {
        return Err(FormatError::MapMismatch {
            expected: ctx.header.map.clone(),
            found: map,
        }
        .into());
    }
    ctx.session.level_time = r.read_u32()?;

    let level = &ctx.session.level;
    let counts = [
        ("sector", level.sectors.len()),
        ("line", level.lines.len()),
        ("side", level.sides.len()),
        ("polyobject", level.polyobjs.len()),
    ];
    for (what, expected) in counts {
        let found = r.read_u32()? as usize;
        if found != expected {
            log::error!("{} count skew: save has {}, map has {}", what, found, expected);
            return Err(FormatError::GeometryMismatch {
                what,
                expected,
                found,
            }
            .into());
        }
    }
    log::debug!("map header: {} at tic {}", map, ctx.session.level_time);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArchiveLimits;
    use crate::error::ArchiveError;
    use crate::session::Level;

    fn encode(session: &Session, description: &str) -> Result<Vec<u8>> {
        let limits = ArchiveLimits::default();
        let ctx = SaveContext::new(session, &limits)?;
        let mut buffer = Vec::new();
        archive_header(&ctx, description, &mut ByteWriter::new(&mut buffer))?;
        Ok(buffer)
    }

    fn sample_session() -> Session {
        let mut session = Session::new(Level::new("MAP05"));
        session.rules = GameRules {
            skill: 3,
            deathmatch: 0,
            netgame: true,
            no_monsters: false,
            random_classes: true,
        };
        session.players[0].in_game = true;
        session.players[2].in_game = true;
        session.scripts.world_vars[0] = 17;
        session.scripts.world_vars[63] = -4;
        session.scripts.store.push(DeferredScript {
            map: 6,
            script: 12,
            args: [1, 2, 3, 4],
        });
        session
    }

    #[test]
    fn test_header_roundtrip() {
        let session = sample_session();
        let bytes = encode(&session, "Before the boss").unwrap();
        let mut r = ByteReader::new(&bytes);
        let header = unarchive_header(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);

        assert_eq!(header.version, SAVE_VERSION);
        assert_eq!(header.description, "Before the boss");
        assert_eq!(header.map, "MAP05");
        assert_eq!(header.rules, session.rules);
        assert_eq!(
            header.in_game,
            [true, false, true, false, false, false, false, false]
        );
        assert_eq!(header.world_vars, session.scripts.world_vars);
        assert_eq!(header.store, session.scripts.store);

        let mut restored = Session::new(Level::new("MAP05"));
        header.apply(&mut restored);
        assert!(restored.players[2].in_game);
        assert_eq!(restored.scripts.store, session.scripts.store);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode(&sample_session(), "x").unwrap();
        bytes[8] ^= 0xff;
        let err = unarchive_header(&mut ByteReader::new(&bytes)).unwrap_err();
        assert_eq!(err.as_format(), Some(&FormatError::BadMagic));
    }

    #[test]
    fn test_version_mismatch() {
        let mut bytes = encode(&sample_session(), "x").unwrap();
        bytes[4..8].copy_from_slice(&(SAVE_VERSION + 1).to_le_bytes());
        let err = unarchive_header(&mut ByteReader::new(&bytes)).unwrap_err();
        assert_eq!(
            err.as_format(),
            Some(&FormatError::UnsupportedVersion {
                found: SAVE_VERSION + 1,
                expected: SAVE_VERSION
            })
        );
    }

    #[test]
    fn test_description_too_long() {
        let err = encode(&sample_session(), "a description that does not fit").unwrap_err();
        assert!(matches!(err, ArchiveError::Capacity { max: 24, .. }));
    }

    #[test]
    fn test_store_capacity() {
        let mut session = sample_session();
        session.scripts.store = vec![DeferredScript::default(); MAX_SCRIPT_STORE + 1];
        let err = encode(&session, "x").unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Capacity {
                what: "deferred scripts",
                ..
            }
        ));
    }
}
