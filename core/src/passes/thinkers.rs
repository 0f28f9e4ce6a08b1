//! Thinker segment
//!
//! Registry records until [`TAG_END`]. Sector and polyobject back-links are
//! re-established as each record is decoded.

use std::io::Write;

use super::{LoadContext, SaveContext, check_capacity, check_index};
use crate::error::Result;
use crate::registry::{TAG_END, decode_thinker, encode_thinker};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::ThinkerId;
use crate::stream::{ByteReader, ByteWriter};

pub fn archive_thinkers<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let thinkers = &ctx.session.thinkers;
    let level = &ctx.session.level;
    check_capacity("thinkers", thinkers.len(), ctx.limits.max_thinkers)?;
    for thinker in thinkers {
        if let Some(sector) = thinker.sector() {
            check_index("sector", sector, level.sectors.len())?;
        }
        if let Some(po) = thinker.polyobj() {
            check_index("polyobject", po, level.polyobjs.len())?;
        }
    }
    begin_segment(w, SegmentTag::Thinkers)?;
    for thinker in thinkers {
        encode_thinker(thinker, w)?;
    }
    w.write_u8(TAG_END)
}

pub fn unarchive_thinkers(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Thinkers)?;
    let session = &mut ctx.session;
    loop {
        let id = ThinkerId(session.thinkers.len());
        let Some(thinker) = decode_thinker(r, &mut session.level, id)? else {
            break;
        };
        check_capacity("thinkers", session.thinkers.len() + 1, ctx.limits.max_thinkers)?;
        session.thinkers.push(thinker);
    }
    log::debug!("thinkers: {}", session.thinkers.len());
    Ok(())
}
