//! World segment: sector, line and side deltas
//!
//! Counts are not repeated here; the MapHeader segment has already checked
//! them against the base level.

use std::io::Write;

use super::textures::texture_name;
use super::{LoadContext, SaveContext};
use crate::error::{FormatError, Result};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::stream::{ByteReader, ByteWriter};

fn texture_index(ctx: &SaveContext<'_>, name: &str) -> Result<u16> {
    // The archive was collected from this same level
    ctx.textures.index_of(name).ok_or_else(|| {
        log::error!("texture '{}' missing from the texture archive", name);
        FormatError::InvalidValue {
            field: "texture name",
            value: -1,
        }
        .into()
    })
}

pub fn archive_world<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let level = &ctx.session.level;
    begin_segment(w, SegmentTag::World)?;

    for sector in &level.sectors {
        w.write_i32(sector.floor_height)?;
        w.write_i32(sector.ceiling_height)?;
        w.write_u16(texture_index(ctx, &sector.floor_texture)?)?;
        w.write_u16(texture_index(ctx, &sector.ceiling_texture)?)?;
        w.write_i16(sector.light_level)?;
        w.write_i16(sector.special)?;
        w.write_i16(sector.tag)?;
        w.write_i16(sector.seq_type)?;
    }

    for line in &level.lines {
        w.write_u16(line.flags)?;
        w.write_u8(line.special)?;
        w.write_bytes(&line.args)?;
    }

    for side in &level.sides {
        w.write_i32(side.texture_offset)?;
        w.write_i32(side.row_offset)?;
        w.write_u16(texture_index(ctx, &side.top_texture)?)?;
        w.write_u16(texture_index(ctx, &side.bottom_texture)?)?;
        w.write_u16(texture_index(ctx, &side.mid_texture)?)?;
    }
    Ok(())
}

pub fn unarchive_world(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::World)?;
    let textures = &ctx.textures;
    let level = &mut ctx.session.level;

    for sector in &mut level.sectors {
        sector.floor_height = r.read_i32()?;
        sector.ceiling_height = r.read_i32()?;
        sector.floor_texture = texture_name(textures, r.read_u16()?)?;
        sector.ceiling_texture = texture_name(textures, r.read_u16()?)?;
        sector.light_level = r.read_i16()?;
        sector.special = r.read_i16()?;
        sector.tag = r.read_i16()?;
        sector.seq_type = r.read_i16()?;
    }

    for line in &mut level.lines {
        line.flags = r.read_u16()?;
        line.special = r.read_u8()?;
        line.args.copy_from_slice(r.read_bytes(5)?);
    }

    for side in &mut level.sides {
        side.texture_offset = r.read_i32()?;
        side.row_offset = r.read_i32()?;
        side.top_texture = texture_name(textures, r.read_u16()?)?;
        side.bottom_texture = texture_name(textures, r.read_u16()?)?;
        side.mid_texture = texture_name(textures, r.read_u16()?)?;
    }

    log::debug!(
        "world: {} sectors, {} lines, {} sides",
        level.sectors.len(),
        level.lines.len(),
        level.sides.len()
    );
    Ok(())
}
