//! Polyobject segment

use std::io::Write;

use super::{LoadContext, SaveContext};
use crate::error::{FormatError, Result};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::stream::{ByteReader, ByteWriter};

pub fn archive_polyobjs<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let polyobjs = &ctx.session.level.polyobjs;
    begin_segment(w, SegmentTag::Polyobjects)?;
    w.write_u32(polyobjs.len() as u32)?;
    for po in polyobjs {
        w.write_i32(po.tag)?;
        w.write_u32(po.angle)?;
        w.write_i32(po.x)?;
        w.write_i32(po.y)?;
    }
    Ok(())
}

/// Move the base map's polyobjects to their saved transforms
///
/// Polyobjects are matched by position; each saved tag must equal the tag
/// of the polyobject at the same index in the base map.
pub fn unarchive_polyobjs(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Polyobjects)?;
    let polyobjs = &mut ctx.session.level.polyobjs;
    let count = r.read_u32()? as usize;
    if count != polyobjs.len() {
        return Err(FormatError::GeometryMismatch {
            what: "polyobject",
            expected: polyobjs.len(),
            found: count,
        }
        .into());
    }
    for (index, po) in polyobjs.iter_mut().enumerate() {
        let tag = r.read_i32()?;
        if tag != po.tag {
            return Err(FormatError::PolyobjectMismatch {
                index,
                expected: po.tag,
                found: tag,
            }
            .into());
        }
        let angle = r.read_u32()?;
        let x = r.read_i32()?;
        let y = r.read_i32()?;
        po.reposition(angle, x, y);
    }
    log::debug!("polyobjects: {}", count);
    Ok(())
}
