//! Sector-bound thinker payloads

use std::io::Write;

use super::{ThinkerClass, bind_sector};
use crate::error::{FormatError, Result};
use crate::session::{
    Ceiling, Door, FloorMove, FloorWaggle, Level, Light, Phase, Pillar, Plat, PlatStatus, Thinker,
    ThinkerId,
};
use crate::stream::{ByteReader, ByteWriter};

pub(super) fn encode_ceiling<W: Write>(t: &Ceiling, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.kind)?;
    w.write_i32(t.bottom_height)?;
    w.write_i32(t.top_height)?;
    w.write_i32(t.speed)?;
    w.write_i32(t.crush)?;
    w.write_i32(t.direction)?;
    w.write_i32(t.tag)?;
    w.write_i32(t.old_direction)
}

pub(super) fn encode_door<W: Write>(t: &Door, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.kind)?;
    w.write_i32(t.speed)?;
    w.write_i32(t.direction)?;
    w.write_i32(t.top_height)?;
    w.write_i32(t.top_wait)?;
    w.write_i32(t.top_countdown)
}

pub(super) fn encode_floor<W: Write>(t: &FloorMove, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.kind)?;
    w.write_i32(t.crush)?;
    w.write_i32(t.direction)?;
    w.write_i32(t.new_special)?;
    w.write_i32(t.floor_dest_height)?;
    w.write_i32(t.speed)?;
    w.write_i32(t.delay_count)?;
    w.write_i32(t.delay_total)?;
    w.write_i32(t.stairs_delay_height)?;
    w.write_i32(t.stairs_delay_height_delta)?;
    w.write_i32(t.reset_height)?;
    w.write_i16(t.reset_delay)?;
    w.write_i16(t.reset_delay_count)?;
    w.write_u8(t.texture_change)
}

pub(super) fn encode_plat<W: Write>(t: &Plat, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.speed)?;
    w.write_i32(t.low)?;
    w.write_i32(t.high)?;
    w.write_i32(t.wait)?;
    w.write_i32(t.count)?;
    w.write_i32(t.crush)?;
    w.write_i32(t.tag)?;
    w.write_u8(t.status as u8)?;
    w.write_u8(t.old_status as u8)?;
    w.write_u8(t.kind)
}

pub(super) fn encode_light<W: Write>(t: &Light, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_u8(t.kind)?;
    w.write_i32(t.value1)?;
    w.write_i32(t.value2)?;
    w.write_i32(t.tics1)?;
    w.write_i32(t.tics2)?;
    w.write_i32(t.count)
}

pub(super) fn encode_phase<W: Write>(t: &Phase, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.index)?;
    w.write_i32(t.base)
}

pub(super) fn encode_pillar<W: Write>(t: &Pillar, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.ceiling_speed)?;
    w.write_i32(t.floor_speed)?;
    w.write_i32(t.floor_dest)?;
    w.write_i32(t.ceiling_dest)?;
    w.write_i32(t.direction)?;
    w.write_i32(t.crush)
}

pub(super) fn encode_waggle<W: Write>(t: &FloorWaggle, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.sector as u32)?;
    w.write_i32(t.original_height)?;
    w.write_i32(t.accumulator)?;
    w.write_i32(t.acc_delta)?;
    w.write_i32(t.target_scale)?;
    w.write_i32(t.scale)?;
    w.write_i32(t.scale_delta)?;
    w.write_i32(t.ticker)?;
    w.write_u8(t.state)
}

fn read_plat_status(r: &mut ByteReader<'_>) -> Result<PlatStatus> {
    let v = r.read_u8()?;
    PlatStatus::from_u8(v).ok_or_else(|| {
        FormatError::InvalidValue {
            field: "plat status",
            value: v as i64,
        }
        .into()
    })
}

/// Decode a sector-bound payload of `class`
pub(super) fn decode(
    class: ThinkerClass,
    r: &mut ByteReader<'_>,
    level: &mut Level,
    id: ThinkerId,
) -> Result<Thinker> {
    let sector = bind_sector(r, level, id)?;
    let thinker = match class {
        ThinkerClass::Ceiling => Thinker::Ceiling(Ceiling {
            sector,
            kind: r.read_i32()?,
            bottom_height: r.read_i32()?,
            top_height: r.read_i32()?,
            speed: r.read_i32()?,
            crush: r.read_i32()?,
            direction: r.read_i32()?,
            tag: r.read_i32()?,
            old_direction: r.read_i32()?,
        }),
        ThinkerClass::Door => Thinker::Door(Door {
            sector,
            kind: r.read_i32()?,
            speed: r.read_i32()?,
            direction: r.read_i32()?,
            top_height: r.read_i32()?,
            top_wait: r.read_i32()?,
            top_countdown: r.read_i32()?,
        }),
        ThinkerClass::Floor => Thinker::Floor(FloorMove {
            sector,
            kind: r.read_i32()?,
            crush: r.read_i32()?,
            direction: r.read_i32()?,
            new_special: r.read_i32()?,
            floor_dest_height: r.read_i32()?,
            speed: r.read_i32()?,
            delay_count: r.read_i32()?,
            delay_total: r.read_i32()?,
            stairs_delay_height: r.read_i32()?,
            stairs_delay_height_delta: r.read_i32()?,
            reset_height: r.read_i32()?,
            reset_delay: r.read_i16()?,
            reset_delay_count: r.read_i16()?,
            texture_change: r.read_u8()?,
        }),
        ThinkerClass::Plat => Thinker::Plat(Plat {
            sector,
            speed: r.read_i32()?,
            low: r.read_i32()?,
            high: r.read_i32()?,
            wait: r.read_i32()?,
            count: r.read_i32()?,
            crush: r.read_i32()?,
            tag: r.read_i32()?,
            status: read_plat_status(r)?,
            old_status: read_plat_status(r)?,
            kind: r.read_u8()?,
        }),
        ThinkerClass::Light => Thinker::Light(Light {
            sector,
            kind: r.read_u8()?,
            value1: r.read_i32()?,
            value2: r.read_i32()?,
            tics1: r.read_i32()?,
            tics2: r.read_i32()?,
            count: r.read_i32()?,
        }),
        ThinkerClass::Phase => Thinker::Phase(Phase {
            sector,
            index: r.read_i32()?,
            base: r.read_i32()?,
        }),
        ThinkerClass::Pillar => Thinker::Pillar(Pillar {
            sector,
            ceiling_speed: r.read_i32()?,
            floor_speed: r.read_i32()?,
            floor_dest: r.read_i32()?,
            ceiling_dest: r.read_i32()?,
            direction: r.read_i32()?,
            crush: r.read_i32()?,
        }),
        ThinkerClass::FloorWaggle => Thinker::FloorWaggle(FloorWaggle {
            sector,
            original_height: r.read_i32()?,
            accumulator: r.read_i32()?,
            acc_delta: r.read_i32()?,
            target_scale: r.read_i32()?,
            scale: r.read_i32()?,
            scale_delta: r.read_i32()?,
            ticker: r.read_i32()?,
            state: r.read_u8()?,
        }),
        other => {
            log::error!("{:?} is not a sector-bound thinker", other);
            return Err(FormatError::UnknownThinker(other.info().tag).into());
        }
    };
    Ok(thinker)
}
