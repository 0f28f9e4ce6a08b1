//! Script interpreter records

use std::io::Write;

use super::{ThinkerClass, finish_payload, read_payload, write_record};
use crate::error::{FormatError, Result};
use crate::session::{Level, SCRIPT_STACK_DEPTH, ScriptContext, ScriptModule, WaitState};
use crate::stream::{ByteReader, ByteWriter};

/// Encode an interpreter; `activator` is its already-numbered activator reference
pub fn encode_script<W: Write>(
    ctx: &ScriptContext,
    activator: i32,
    w: &mut ByteWriter<W>,
) -> Result<()> {
    let info = ThinkerClass::ScriptInterpreter.info();
    let mut payload = ByteWriter::new(Vec::with_capacity(info.size));
    payload.write_i32(ctx.number)?;
    payload.write_u32(ctx.pc)?;
    payload.write_i32(ctx.delay_count)?;
    payload.write_i32_slice(&ctx.locals)?;
    payload.write_i32_slice(&ctx.stack)?;
    payload.write_u32(ctx.stack_ptr)?;
    payload.write_i32(activator)?;
    payload.write_i32(ctx.line.map_or(-1, |l| l as i32))?;
    payload.write_u8(ctx.side)?;
    let (wait_kind, wait_value) = ctx.wait.to_parts();
    payload.write_u8(wait_kind)?;
    payload.write_i32(wait_value)?;
    write_record(info, &payload.into_inner(), w)
}

/// Decode an interpreter record
///
/// The program counter is checked against `module` and the line index
/// against `level`. Returns the context (activator unset) and the encoded
/// activator reference for the caller to queue as a fixup.
pub fn decode_script(
    r: &mut ByteReader<'_>,
    level: &Level,
    module: &dyn ScriptModule,
) -> Result<(ScriptContext, i32)> {
    let info = ThinkerClass::ScriptInterpreter.info();
    let tag = r.read_u8()?;
    if tag != info.tag {
        return Err(FormatError::UnknownThinker(tag).into());
    }
    let mut p = read_payload(info, r)?;

    let number = p.read_i32()?;
    let pc = p.read_u32()?;
    if module.entry_point(number).is_none() {
        return Err(FormatError::UnknownScript(number).into());
    }
    let len = module.code_len();
    if pc >= len {
        return Err(FormatError::ScriptPc {
            script: number,
            pc,
            len,
        }
        .into());
    }

    let mut ctx = ScriptContext::new(number, pc);
    ctx.delay_count = p.read_i32()?;
    p.read_i32_into(&mut ctx.locals)?;
    p.read_i32_into(&mut ctx.stack)?;
    ctx.stack_ptr = p.read_u32()?;
    if ctx.stack_ptr as usize > SCRIPT_STACK_DEPTH {
        return Err(FormatError::InvalidValue {
            field: "script stack pointer",
            value: ctx.stack_ptr as i64,
        }
        .into());
    }
    let activator = p.read_i32()?;
    ctx.line = match p.read_i32()? {
        -1 => None,
        line if line >= 0 && (line as usize) < level.lines.len() => Some(line as usize),
        line if line >= 0 => {
            return Err(FormatError::BadIndex {
                what: "line",
                index: line as u32,
                count: level.lines.len(),
            }
            .into());
        }
        line => {
            return Err(FormatError::InvalidValue {
                field: "script line",
                value: line as i64,
            }
            .into());
        }
    };
    ctx.side = p.read_u8()?;
    let wait_kind = p.read_u8()?;
    let wait_value = p.read_i32()?;
    ctx.wait = WaitState::from_parts(wait_kind, wait_value).ok_or(FormatError::InvalidValue {
        field: "script wait state",
        value: wait_kind as i64,
    })?;
    finish_payload(info, &p)?;

    Ok((ctx, activator))
}
