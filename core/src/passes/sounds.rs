//! Sound sequence segment

use std::io::Write;

use super::{LoadContext, SaveContext, check_capacity, check_index};
use crate::error::{FormatError, Result};
use crate::refs::{EntitySlot, GeometrySlot};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::{SoundOrigin, SoundSequence};
use crate::stream::{ByteReader, ByteWriter};

const ORIGIN_NONE: u8 = 0;
const ORIGIN_ENTITY: u8 = 1;
const ORIGIN_SECTOR: u8 = 2;
const ORIGIN_POLYOBJECT: u8 = 3;

pub fn archive_sounds<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let sounds = &ctx.session.sounds;
    let level = &ctx.session.level;
    check_capacity("sound sequences", sounds.len(), ctx.limits.max_sounds)?;
    for seq in sounds {
        match seq.origin {
            SoundOrigin::Sector(index) => check_index("sector", index, level.sectors.len())?,
            SoundOrigin::Polyobject(index) => {
                check_index("polyobject", index, level.polyobjs.len())?
            }
            SoundOrigin::None | SoundOrigin::Entity(_) => {}
        }
    }
    begin_segment(w, SegmentTag::Sounds)?;
    w.write_u32(sounds.len() as u32)?;
    for seq in sounds {
        w.write_u16(seq.sequence)?;
        w.write_u32(seq.script_offset)?;
        w.write_i32(seq.delay_tics)?;
        w.write_f32(seq.volume)?;
        w.write_u32(seq.current_sound)?;
        match seq.origin {
            SoundOrigin::None => {
                w.write_u8(ORIGIN_NONE)?;
                w.write_i32(0)?;
            }
            SoundOrigin::Entity(id) => {
                w.write_u8(ORIGIN_ENTITY)?;
                w.write_i32(ctx.numbering.reference_of(id))?;
            }
            SoundOrigin::Sector(index) => {
                w.write_u8(ORIGIN_SECTOR)?;
                w.write_i32(index as i32)?;
            }
            SoundOrigin::Polyobject(index) => {
                w.write_u8(ORIGIN_POLYOBJECT)?;
                w.write_i32(index as i32)?;
            }
        }
    }
    Ok(())
}

fn geometry_index(value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        FormatError::InvalidValue {
            field: "sound origin index",
            value: value as i64,
        }
        .into()
    })
}

pub fn unarchive_sounds(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Sounds)?;
    let count = r.read_u32()? as usize;
    check_capacity("sound sequences", count, ctx.limits.max_sounds)?;
    for index in 0..count {
        let mut seq = SoundSequence {
            sequence: r.read_u16()?,
            script_offset: r.read_u32()?,
            delay_tics: r.read_i32()?,
            volume: r.read_f32()?,
            current_sound: r.read_u32()?,
            origin: SoundOrigin::None,
        };
        let kind = r.read_u8()?;
        let value = r.read_i32()?;
        match kind {
            ORIGIN_NONE => {}
            ORIGIN_ENTITY => {
                seq.origin = SoundOrigin::Entity(None);
                ctx.fixups.push_entity(EntitySlot::SoundOrigin(index), value)?;
            }
            ORIGIN_SECTOR => ctx
                .fixups
                .push_geometry(GeometrySlot::SoundSector(index), geometry_index(value)?),
            ORIGIN_POLYOBJECT => ctx
                .fixups
                .push_geometry(GeometrySlot::SoundPolyobject(index), geometry_index(value)?),
            other => {
                return Err(FormatError::InvalidValue {
                    field: "sound origin kind",
                    value: other as i64,
                }
                .into());
            }
        }
        ctx.session.sounds.push(seq);
    }
    log::debug!("sound sequences: {}", count);
    Ok(())
}
