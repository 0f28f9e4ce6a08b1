//! Misc segment and the End terminator

use std::io::Write;

use super::{LoadContext, SaveContext};
use crate::error::Result;
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::MiscFlags;
use crate::stream::{ByteReader, ByteWriter};

pub fn archive_misc<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let misc = &ctx.session.misc;
    begin_segment(w, SegmentTag::Misc)?;
    w.write_u32(misc.world_timer)?;
    w.write_i32_slice(&misc.quake)?;
    w.write_u8(misc.random_index)?;
    w.write_u8(misc.flags.bits())
}

pub fn unarchive_misc(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Misc)?;
    let misc = &mut ctx.session.misc;
    misc.world_timer = r.read_u32()?;
    r.read_i32_into(&mut misc.quake)?;
    misc.random_index = r.read_u8()?;
    misc.flags = MiscFlags::from_bits_retain(r.read_u8()?);
    Ok(())
}

pub fn archive_end<W: Write>(w: &mut ByteWriter<W>) -> Result<()> {
    begin_segment(w, SegmentTag::End)
}

/// Expect the terminator; anything after it is ignored
pub fn unarchive_end(r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::End)?;
    if r.remaining() > 0 {
        log::debug!("ignoring {} trailing bytes after End", r.remaining());
    }
    Ok(())
}
