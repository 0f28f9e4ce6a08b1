//! Thinker type registry
//!
//! Every archivable thinker kind has a one-byte wire tag and a fixed payload
//! size. A record on the wire is:
//!
//! ```text
//! tag: u8 | size: u16 | payload[size]
//! ```
//!
//! The registry is the authority on `size`. Decoding checks the declared size
//! against it before a single payload byte is trusted, and encoding checks
//! the produced payload against it so codec drift is caught on save rather
//! than on some later load.

mod polyobj;
mod script;
mod sector;

pub use script::{decode_script, encode_script};

use crate::error::{FormatError, Result};
use crate::session::{Level, Thinker, ThinkerId};
use crate::stream::{ByteReader, ByteWriter};
use std::io::Write;

/// Tag that terminates the Thinkers segment
pub const TAG_END: u8 = 0;

/// Every registered thinker kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThinkerClass {
    Ceiling,
    Door,
    Floor,
    Plat,
    Light,
    Phase,
    Pillar,
    FloorWaggle,
    RotatePoly,
    MovePoly,
    PolyDoor,
    ScriptInterpreter,
}

/// What a thinker kind is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Sector,
    Polyobject,
    Script,
}

/// Registry entry
#[derive(Debug, Clone, Copy)]
pub struct ClassInfo {
    pub class: ThinkerClass,
    pub tag: u8,
    /// Encoded payload size in bytes
    pub size: usize,
    pub name: &'static str,
    pub binding: Binding,
}

/// Registered thinker kinds, most frequent first
pub static THINKER_CLASSES: [ClassInfo; 12] = [
    ClassInfo {
        class: ThinkerClass::Light,
        tag: 5,
        size: 25,
        name: "light",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::Phase,
        tag: 6,
        size: 12,
        name: "phase",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::Door,
        tag: 2,
        size: 28,
        name: "door",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::Floor,
        tag: 3,
        size: 53,
        name: "floor",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::Plat,
        tag: 4,
        size: 35,
        name: "plat",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::Ceiling,
        tag: 1,
        size: 36,
        name: "ceiling",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::ScriptInterpreter,
        tag: 12,
        size: 198,
        name: "script",
        binding: Binding::Script,
    },
    ClassInfo {
        class: ThinkerClass::Pillar,
        tag: 7,
        size: 28,
        name: "pillar",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::FloorWaggle,
        tag: 8,
        size: 33,
        name: "floor waggle",
        binding: Binding::Sector,
    },
    ClassInfo {
        class: ThinkerClass::RotatePoly,
        tag: 9,
        size: 24,
        name: "rotate poly",
        binding: Binding::Polyobject,
    },
    ClassInfo {
        class: ThinkerClass::MovePoly,
        tag: 10,
        size: 24,
        name: "move poly",
        binding: Binding::Polyobject,
    },
    ClassInfo {
        class: ThinkerClass::PolyDoor,
        tag: 11,
        size: 38,
        name: "poly door",
        binding: Binding::Polyobject,
    },
];

impl ThinkerClass {
    /// Class of a live thinker
    pub fn of(thinker: &Thinker) -> Self {
        match thinker {
            Thinker::Ceiling(_) => Self::Ceiling,
            Thinker::Door(_) => Self::Door,
            Thinker::Floor(_) => Self::Floor,
            Thinker::Plat(_) => Self::Plat,
            Thinker::Light(_) => Self::Light,
            Thinker::Phase(_) => Self::Phase,
            Thinker::Pillar(_) => Self::Pillar,
            Thinker::FloorWaggle(_) => Self::FloorWaggle,
            Thinker::RotatePoly(_) => Self::RotatePoly,
            Thinker::MovePoly(_) => Self::MovePoly,
            Thinker::PolyDoor(_) => Self::PolyDoor,
        }
    }

    /// Registry entry for this class
    pub fn info(self) -> &'static ClassInfo {
        let index = match self {
            Self::Light => 0,
            Self::Phase => 1,
            Self::Door => 2,
            Self::Floor => 3,
            Self::Plat => 4,
            Self::Ceiling => 5,
            Self::ScriptInterpreter => 6,
            Self::Pillar => 7,
            Self::FloorWaggle => 8,
            Self::RotatePoly => 9,
            Self::MovePoly => 10,
            Self::PolyDoor => 11,
        };
        &THINKER_CLASSES[index]
    }
}

/// Registry entry for a wire tag
pub fn class_for_tag(tag: u8) -> Option<&'static ClassInfo> {
    THINKER_CLASSES.iter().find(|c| c.tag == tag)
}

/// Frame a finished payload as a registry record
fn write_record<W: Write>(info: &ClassInfo, payload: &[u8], w: &mut ByteWriter<W>) -> Result<()> {
    if payload.len() != info.size {
        log::error!(
            "{} encoder produced {} bytes, registered size is {}",
            info.name,
            payload.len(),
            info.size
        );
        return Err(FormatError::ThinkerSize {
            class: info.name,
            expected: info.size,
            found: payload.len(),
        }
        .into());
    }
    w.write_u8(info.tag)?;
    w.write_u16(info.size as u16)?;
    w.write_bytes(payload)
}

/// Read the size of a record whose tag has been consumed, returning its payload
fn read_payload<'a>(info: &ClassInfo, r: &mut ByteReader<'a>) -> Result<ByteReader<'a>> {
    let declared = r.read_u16()? as usize;
    if declared != info.size {
        return Err(FormatError::ThinkerSize {
            class: info.name,
            expected: info.size,
            found: declared,
        }
        .into());
    }
    r.sub_reader(declared)
}

/// A decoder must use the whole payload
fn finish_payload(info: &ClassInfo, payload: &ByteReader<'_>) -> Result<()> {
    if payload.remaining() != 0 {
        return Err(FormatError::ThinkerSize {
            class: info.name,
            expected: info.size,
            found: info.size - payload.remaining(),
        }
        .into());
    }
    Ok(())
}

/// Encode one thinker as a registry record
pub fn encode_thinker<W: Write>(thinker: &Thinker, w: &mut ByteWriter<W>) -> Result<()> {
    let info = ThinkerClass::of(thinker).info();
    let mut payload = ByteWriter::new(Vec::with_capacity(info.size));
    match thinker {
        Thinker::Ceiling(t) => sector::encode_ceiling(t, &mut payload)?,
        Thinker::Door(t) => sector::encode_door(t, &mut payload)?,
        Thinker::Floor(t) => sector::encode_floor(t, &mut payload)?,
        Thinker::Plat(t) => sector::encode_plat(t, &mut payload)?,
        Thinker::Light(t) => sector::encode_light(t, &mut payload)?,
        Thinker::Phase(t) => sector::encode_phase(t, &mut payload)?,
        Thinker::Pillar(t) => sector::encode_pillar(t, &mut payload)?,
        Thinker::FloorWaggle(t) => sector::encode_waggle(t, &mut payload)?,
        Thinker::RotatePoly(t) | Thinker::MovePoly(t) => {
            polyobj::encode_poly_event(t, &mut payload)?
        }
        Thinker::PolyDoor(t) => polyobj::encode_poly_door(t, &mut payload)?,
    }
    write_record(info, &payload.into_inner(), w)
}

/// Decode the next record of the Thinkers segment
///
/// Returns `None` at [`TAG_END`]. The decoded thinker will be stored as `id`;
/// its sector or polyobject is validated against `level` and linked back to
/// it.
pub fn decode_thinker(
    r: &mut ByteReader<'_>,
    level: &mut Level,
    id: ThinkerId,
) -> Result<Option<Thinker>> {
    let tag = r.read_u8()?;
    if tag == TAG_END {
        return Ok(None);
    }
    let info = class_for_tag(tag).ok_or(FormatError::UnknownThinker(tag))?;
    if info.binding == Binding::Script {
        // Interpreters belong to the Scripts segment
        return Err(FormatError::UnknownThinker(tag).into());
    }
    let mut payload = read_payload(info, r)?;
    let thinker = match info.binding {
        Binding::Sector => sector::decode(info.class, &mut payload, level, id)?,
        _ => polyobj::decode(info.class, &mut payload, level, id)?,
    };
    finish_payload(info, &payload)?;
    log::trace!("restored {} thinker {:?}", info.name, id);
    Ok(Some(thinker))
}

/// Read a sector index and link `id` into it
fn bind_sector(r: &mut ByteReader<'_>, level: &mut Level, id: ThinkerId) -> Result<usize> {
    let index = r.read_u32()?;
    let count = level.sectors.len();
    let sector = level
        .sectors
        .get_mut(index as usize)
        .ok_or(FormatError::BadIndex {
            what: "sector",
            index,
            count,
        })?;
    sector.special_data = Some(id);
    Ok(index as usize)
}

/// Read a polyobject index and link `id` into it
fn bind_polyobj(r: &mut ByteReader<'_>, level: &mut Level, id: ThinkerId) -> Result<usize> {
    let index = r.read_u32()?;
    let count = level.polyobjs.len();
    let po = level
        .polyobjs
        .get_mut(index as usize)
        .ok_or(FormatError::BadIndex {
            what: "polyobject",
            index,
            count,
        })?;
    po.special_data = Some(id);
    Ok(index as usize)
}
