//! Script segment: interpreters, the script info table and map variables

use std::io::Write;

use super::{LoadContext, SaveContext, check_capacity, check_index};
use crate::error::{FormatError, Result};
use crate::refs::EntitySlot;
use crate::registry::{decode_script, encode_script};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::{ScriptInfo, ScriptRunState};
use crate::stream::{ByteReader, ByteWriter};

pub fn archive_scripts<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    let scripts = &ctx.session.scripts;
    let max = ctx.limits.max_scripts;
    check_capacity("script interpreters", scripts.interpreters.len(), max)?;
    check_capacity("script infos", scripts.infos.len(), max)?;
    for interpreter in &scripts.interpreters {
        if let Some(line) = interpreter.line {
            check_index("line", line, ctx.session.level.lines.len())?;
        }
    }

    begin_segment(w, SegmentTag::Scripts)?;
    w.write_u32(scripts.interpreters.len() as u32)?;
    for interpreter in &scripts.interpreters {
        let activator = ctx.numbering.reference_of(interpreter.activator);
        encode_script(interpreter, activator, w)?;
    }

    w.write_u32(scripts.infos.len() as u32)?;
    for info in &scripts.infos {
        w.write_i32(info.number)?;
        w.write_u8(info.state as u8)?;
    }
    w.write_i32_slice(&scripts.map_vars)
}

pub fn unarchive_scripts(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Scripts)?;
    let max = ctx.limits.max_scripts;

    let count = r.read_u32()? as usize;
    check_capacity("script interpreters", count, max)?;
    for index in 0..count {
        let (interpreter, activator) = decode_script(r, &ctx.session.level, ctx.scripts)?;
        ctx.session.scripts.interpreters.push(interpreter);
        ctx.fixups
            .push_entity(EntitySlot::ScriptActivator(index), activator)?;
    }

    let info_count = r.read_u32()? as usize;
    check_capacity("script infos", info_count, max)?;
    let mut infos = Vec::with_capacity(info_count);
    for _ in 0..info_count {
        let number = r.read_i32()?;
        let state_byte = r.read_u8()?;
        let state = ScriptRunState::from_u8(state_byte).ok_or(FormatError::InvalidValue {
            field: "script state",
            value: state_byte as i64,
        })?;
        infos.push(ScriptInfo { number, state });
    }
    ctx.session.scripts.infos = infos;
    r.read_i32_into(&mut ctx.session.scripts.map_vars)?;

    log::debug!("scripts: {} running, {} known", count, info_count);
    Ok(())
}
