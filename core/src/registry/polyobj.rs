//! Polyobject-bound thinker payloads

use std::io::Write;

use super::{ThinkerClass, bind_polyobj};
use crate::error::{FormatError, Result};
use crate::session::{Level, PolyDoor, PolyDoorKind, PolyEvent, Thinker, ThinkerId};
use crate::stream::{ByteReader, ByteWriter};

pub(super) fn encode_poly_event<W: Write>(t: &PolyEvent, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.polyobj as u32)?;
    w.write_i32(t.speed)?;
    w.write_u32(t.dist)?;
    w.write_u32(t.angle)?;
    w.write_i32(t.x_speed)?;
    w.write_i32(t.y_speed)
}

pub(super) fn encode_poly_door<W: Write>(t: &PolyDoor, w: &mut ByteWriter<W>) -> Result<()> {
    w.write_u32(t.polyobj as u32)?;
    w.write_i32(t.speed)?;
    w.write_i32(t.dist)?;
    w.write_i32(t.total_dist)?;
    w.write_i32(t.direction)?;
    w.write_i32(t.x_speed)?;
    w.write_i32(t.y_speed)?;
    w.write_i32(t.tics)?;
    w.write_i32(t.wait_tics)?;
    w.write_u8(t.kind as u8)?;
    w.write_bool(t.close)
}

fn read_poly_event(polyobj: usize, r: &mut ByteReader<'_>) -> Result<PolyEvent> {
    Ok(PolyEvent {
        polyobj,
        speed: r.read_i32()?,
        dist: r.read_u32()?,
        angle: r.read_u32()?,
        x_speed: r.read_i32()?,
        y_speed: r.read_i32()?,
    })
}

/// Decode a polyobject-bound payload of `class`
pub(super) fn decode(
    class: ThinkerClass,
    r: &mut ByteReader<'_>,
    level: &mut Level,
    id: ThinkerId,
) -> Result<Thinker> {
    let polyobj = bind_polyobj(r, level, id)?;
    match class {
        ThinkerClass::RotatePoly => Ok(Thinker::RotatePoly(read_poly_event(polyobj, r)?)),
        ThinkerClass::MovePoly => Ok(Thinker::MovePoly(read_poly_event(polyobj, r)?)),
        ThinkerClass::PolyDoor => {
            let speed = r.read_i32()?;
            let dist = r.read_i32()?;
            let total_dist = r.read_i32()?;
            let direction = r.read_i32()?;
            let x_speed = r.read_i32()?;
            let y_speed = r.read_i32()?;
            let tics = r.read_i32()?;
            let wait_tics = r.read_i32()?;
            let kind_byte = r.read_u8()?;
            let kind = PolyDoorKind::from_u8(kind_byte).ok_or(FormatError::InvalidValue {
                field: "poly door kind",
                value: kind_byte as i64,
            })?;
            Ok(Thinker::PolyDoor(PolyDoor {
                polyobj,
                speed,
                dist,
                total_dist,
                direction,
                x_speed,
                y_speed,
                tics,
                wait_tics,
                kind,
                close: r.read_bool()?,
            }))
        }
        other => {
            log::error!("{:?} is not a polyobject-bound thinker", other);
            Err(FormatError::UnknownThinker(other.info().tag).into())
        }
    }
}
