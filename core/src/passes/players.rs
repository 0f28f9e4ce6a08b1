//! Player segment
//!
//! One record per in-game slot (as listed in the header). The body is written
//! as a plain archive number, never the local player sentinel, and is
//! resolved as soon as the record is read: the Entities segment has already
//! filled the table.

use std::io::Write;

use super::{LoadContext, SaveContext, check_capacity};
use crate::error::{FormatError, Result};
use crate::refs::{EntitySlot, EntityTable, NONE};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::{
    EntityId, InventorySlot, MAX_INVENTORY_SLOTS, Player, PlayerClass, PlayerState,
};
use crate::stream::{ByteReader, ByteWriter};

fn write_player<W: Write>(
    player: &Player,
    body: i32,
    attacker: i32,
    w: &mut ByteWriter<W>,
) -> Result<()> {
    w.write_u8(player.state as u8)?;
    w.write_u8(player.class as u8)?;
    w.write_i32(player.health)?;
    w.write_i32_slice(&player.armor_points)?;

    check_capacity("inventory slots", player.inventory.len(), MAX_INVENTORY_SLOTS)?;
    w.write_u8(player.inventory.len() as u8)?;
    for slot in &player.inventory {
        w.write_u16(slot.item)?;
        w.write_u16(slot.count)?;
    }
    w.write_u16(player.ready_item)?;

    w.write_u32(player.keys)?;
    w.write_u8(player.weapons)?;
    w.write_u8(player.pieces)?;
    w.write_i32_slice(&player.mana)?;
    w.write_i32_slice(&player.frags)?;
    w.write_i32(player.kill_count)?;
    w.write_i32(player.item_count)?;
    w.write_i32(player.secret_count)?;
    w.write_i32(player.view_z)?;
    w.write_i32(player.view_height)?;
    w.write_i32(player.delta_view_height)?;
    w.write_i32(player.bob)?;
    w.write_i32(player.extra_light)?;
    w.write_i32_slice(&player.powers)?;
    w.write_u32(player.cheats)?;
    w.write_i32(body)?;
    w.write_i32(attacker)
}

pub fn archive_players<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    begin_segment(w, SegmentTag::Players)?;
    for player in ctx.session.players.iter().filter(|p| p.in_game) {
        let body = ctx.numbering.plain_reference_of(player.mo);
        let attacker = ctx.numbering.reference_of(player.attacker);
        write_player(player, body, attacker, w)?;
    }
    Ok(())
}

fn read_enum<T>(r: &mut ByteReader<'_>, field: &'static str, f: fn(u8) -> Option<T>) -> Result<T> {
    let v = r.read_u8()?;
    f(v).ok_or_else(|| {
        FormatError::InvalidValue {
            field,
            value: v as i64,
        }
        .into()
    })
}

/// Read one record into `player`, returning the encoded body and attacker
fn read_player(r: &mut ByteReader<'_>, player: &mut Player) -> Result<(i32, i32)> {
    player.state = read_enum(r, "player state", PlayerState::from_u8)?;
    player.class = read_enum(r, "player class", PlayerClass::from_u8)?;
    player.health = r.read_i32()?;
    r.read_i32_into(&mut player.armor_points)?;

    let count = r.read_u8()? as usize;
    check_capacity("inventory slots", count, MAX_INVENTORY_SLOTS)?;
    player.inventory.clear();
    for _ in 0..count {
        let item = r.read_u16()?;
        let count = r.read_u16()?;
        player.inventory.push(InventorySlot { item, count });
    }
    player.ready_item = r.read_u16()?;

    player.keys = r.read_u32()?;
    player.weapons = r.read_u8()?;
    player.pieces = r.read_u8()?;
    r.read_i32_into(&mut player.mana)?;
    r.read_i32_into(&mut player.frags)?;
    player.kill_count = r.read_i32()?;
    player.item_count = r.read_i32()?;
    player.secret_count = r.read_i32()?;
    player.view_z = r.read_i32()?;
    player.view_height = r.read_i32()?;
    player.delta_view_height = r.read_i32()?;
    player.bob = r.read_i32()?;
    player.extra_light = r.read_i32()?;
    r.read_i32_into(&mut player.powers)?;
    player.cheats = r.read_u32()?;
    let body = r.read_i32()?;
    let attacker = r.read_i32()?;
    Ok((body, attacker))
}

/// Resolve a body number against the complete entity table
fn body_of(table: &EntityTable, number: i32) -> Result<Option<EntityId>> {
    if number == NONE {
        return Ok(None);
    }
    if number < 0 {
        return Err(FormatError::InvalidValue {
            field: "player body",
            value: number as i64,
        }
        .into());
    }
    table.entity_of(number).map(Some).ok_or_else(|| {
        FormatError::BadIndex {
            what: "player body",
            index: number as u32,
            count: table.len(),
        }
        .into()
    })
}

/// Read player records and reconnect each player to its body
pub fn unarchive_players(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::Players)?;
    for slot in 0..ctx.session.players.len() {
        let body = ctx.bodies[slot];
        if !ctx.session.players[slot].in_game {
            if let Some(body) = body {
                log::warn!("body {:?} claims player {}, who is not in the game", body, slot);
            }
            continue;
        }

        let player = &mut ctx.session.players[slot];
        let (number, attacker) = read_player(r, player)?;
        let mo = match body_of(&ctx.table, number)? {
            Some(mo) => {
                if body.is_some_and(|claimed| claimed != mo) {
                    log::warn!(
                        "player {} body is {:?} but {:?} claims the slot; using the body",
                        slot,
                        mo,
                        body
                    );
                }
                Some(mo)
            }
            None => body,
        };
        player.mo = mo;
        if mo.is_none() {
            log::warn!("player {} has no body in the save", slot);
        }
        ctx.fixups
            .push_entity(EntitySlot::PlayerAttacker(slot), attacker)?;
    }
    log::debug!(
        "players: {} in game",
        ctx.session.players.iter().filter(|p| p.in_game).count()
    );
    Ok(())
}
