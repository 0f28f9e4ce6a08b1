//! Entity segment
//!
//! Entities are written in numbering order, so the n-th record read back is
//! archive number n. References to other entities are written as archive
//! numbers and queued for fixup on load; they may point forward.

use std::io::Write;

use super::{LoadContext, SaveContext, check_capacity, check_index};
use crate::error::{FormatError, Result};
use crate::refs::{EntityNumbering, EntitySlot, EntityTable, GeometrySlot, NONE};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::{Entity, EntityFlags, EntityId, MAX_PLAYERS, SpecialValue};
use crate::stream::{ByteReader, ByteWriter};

const SPECIAL_INT: u8 = 0;
const SPECIAL_ENTITY: u8 = 1;

/// Wire value for "not a player body"
const NO_PLAYER: u8 = 0xff;

fn write_special<W: Write>(
    value: &SpecialValue,
    numbering: &EntityNumbering,
    w: &mut ByteWriter<W>,
) -> Result<()> {
    match value {
        SpecialValue::Int(v) => {
            w.write_u8(SPECIAL_INT)?;
            w.write_i32(*v)
        }
        SpecialValue::Entity(id) => {
            w.write_u8(SPECIAL_ENTITY)?;
            w.write_i32(numbering.reference_of(*id))
        }
    }
}

fn write_entity<W: Write>(
    entity: &Entity,
    numbering: &EntityNumbering,
    sectors: usize,
    w: &mut ByteWriter<W>,
) -> Result<()> {
    if let Some(sector) = entity.sector {
        check_index("sector", sector, sectors)?;
    }
    w.write_u16(entity.kind)?;
    w.write_i32(entity.x)?;
    w.write_i32(entity.y)?;
    w.write_i32(entity.z)?;
    w.write_u32(entity.angle)?;
    w.write_i32(entity.mom_x)?;
    w.write_i32(entity.mom_y)?;
    w.write_i32(entity.mom_z)?;
    w.write_u32(entity.flags.bits())?;
    w.write_u32(entity.flags2)?;
    w.write_i32(entity.health)?;
    w.write_i32(entity.tics)?;
    w.write_u32(entity.state)?;
    w.write_i16(entity.tid)?;
    w.write_u8(entity.special)?;
    w.write_bytes(&entity.args)?;
    w.write_i32(entity.floor_z)?;
    w.write_i32(entity.ceiling_z)?;
    w.write_i32(entity.radius)?;
    w.write_i32(entity.height)?;
    w.write_i32(entity.sector.map_or(NONE, |s| s as i32))?;
    w.write_i32(numbering.reference_of(entity.target))?;
    w.write_i32(numbering.reference_of(entity.tracer))?;
    write_special(&entity.special1, numbering, w)?;
    write_special(&entity.special2, numbering, w)?;
    w.write_u8(entity.player.unwrap_or(NO_PLAYER))
}

pub fn archive_entities<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let order = ctx.numbering.order();
    check_capacity("entities", order.len(), ctx.limits.max_entities)?;
    begin_segment(w, SegmentTag::Entities)?;
    w.write_u32(order.len() as u32)?;
    for &id in order {
        if let Some(entity) = ctx.session.entities.get(id) {
            write_entity(entity, &ctx.numbering, ctx.session.level.sectors.len(), w)?;
        }
    }
    Ok(())
}

/// Read a special field; entity links are queued against `slot`
fn read_special(
    r: &mut ByteReader<'_>,
    ctx: &mut LoadContext<'_>,
    slot: EntitySlot,
) -> Result<SpecialValue> {
    match r.read_u8()? {
        SPECIAL_INT => Ok(SpecialValue::Int(r.read_i32()?)),
        SPECIAL_ENTITY => {
            ctx.fixups.push_entity(slot, r.read_i32()?)?;
            Ok(SpecialValue::Entity(None))
        }
        kind => Err(FormatError::InvalidValue {
            field: "special kind",
            value: kind as i64,
        }
        .into()),
    }
}

fn read_entity(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<EntityId> {
    let mut entity = Entity {
        kind: r.read_u16()?,
        x: r.read_i32()?,
        y: r.read_i32()?,
        z: r.read_i32()?,
        angle: r.read_u32()?,
        mom_x: r.read_i32()?,
        mom_y: r.read_i32()?,
        mom_z: r.read_i32()?,
        flags: EntityFlags::from_bits_retain(r.read_u32()?),
        flags2: r.read_u32()?,
        health: r.read_i32()?,
        tics: r.read_i32()?,
        state: r.read_u32()?,
        tid: r.read_i16()?,
        special: r.read_u8()?,
        ..Default::default()
    };
    entity.args.copy_from_slice(r.read_bytes(5)?);
    entity.floor_z = r.read_i32()?;
    entity.ceiling_z = r.read_i32()?;
    entity.radius = r.read_i32()?;
    entity.height = r.read_i32()?;

    // Fields that need the entity's id are read before it exists
    let sector = r.read_i32()?;
    let target = r.read_i32()?;
    let tracer = r.read_i32()?;
    let id = ctx.session.entities.insert(entity);
    ctx.table.push(id);

    match sector {
        NONE => {}
        s if s >= 0 => ctx
            .fixups
            .push_geometry(GeometrySlot::EntitySector(id), s as u32),
        s => {
            return Err(FormatError::InvalidValue {
                field: "entity sector",
                value: s as i64,
            }
            .into());
        }
    }
    ctx.fixups.push_entity(EntitySlot::Target(id), target)?;
    ctx.fixups.push_entity(EntitySlot::Tracer(id), tracer)?;
    let special1 = read_special(r, ctx, EntitySlot::Special1(id))?;
    let special2 = read_special(r, ctx, EntitySlot::Special2(id))?;

    let player = match r.read_u8()? {
        NO_PLAYER => None,
        slot if (slot as usize) < MAX_PLAYERS => Some(slot),
        slot => {
            return Err(FormatError::BadIndex {
                what: "player",
                index: slot as u32,
                count: MAX_PLAYERS,
            }
            .into());
        }
    };
    if let Some(slot) = player {
        if let Some(previous) = ctx.bodies[slot as usize].replace(id) {
            log::warn!(
                "player {} claimed by more than one body ({:?}, {:?}); keeping the later",
                slot,
                previous,
                id
            );
        }
    }

    if let Some(e) = ctx.session.entities.get_mut(id) {
        e.special1 = special1;
        e.special2 = special2;
        e.player = player;
    }
    Ok(id)
}

pub fn unarchive_entities(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Entities)?;
    let count = r.read_u32()? as usize;
    check_capacity("entities", count, ctx.limits.max_entities)?;
    ctx.table = EntityTable::with_capacity(count);
    for _ in 0..count {
        read_entity(ctx, r)?;
    }
    log::debug!("entities: {}", count);
    Ok(())
}
