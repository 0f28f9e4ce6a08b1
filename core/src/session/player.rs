//! Per-slot player state

use smallvec::SmallVec;

use super::{EntityId, Fixed, MAX_PLAYERS};

/// Inventory capacity per player
pub const MAX_INVENTORY_SLOTS: usize = 33;
/// Number of timed powers
pub const NUM_POWERS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Live,
    Dead,
    Reborn,
}

impl PlayerState {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Live),
            1 => Some(Self::Dead),
            2 => Some(Self::Reborn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerClass {
    #[default]
    Fighter,
    Cleric,
    Mage,
}

impl PlayerClass {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Fighter),
            1 => Some(Self::Cleric),
            2 => Some(Self::Mage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventorySlot {
    pub item: u16,
    pub count: u16,
}

/// Inventory, stored inline for the common small case
pub type Inventory = SmallVec<[InventorySlot; 8]>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Player {
    pub in_game: bool,
    pub state: PlayerState,
    pub class: PlayerClass,
    pub health: i32,
    pub armor_points: [i32; 4],
    pub inventory: Inventory,
    pub ready_item: u16,
    /// Key bits
    pub keys: u32,
    /// Owned weapon bits
    pub weapons: u8,
    /// Fourth-weapon pieces collected
    pub pieces: u8,
    pub mana: [i32; 2],
    pub frags: [i32; MAX_PLAYERS],
    pub kill_count: i32,
    pub item_count: i32,
    pub secret_count: i32,
    pub view_z: Fixed,
    pub view_height: Fixed,
    pub delta_view_height: Fixed,
    pub bob: Fixed,
    pub extra_light: i32,
    pub powers: [i32; NUM_POWERS],
    pub cheats: u32,
    /// Last entity that damaged this player
    pub attacker: Option<EntityId>,
    /// Current body
    pub mo: Option<EntityId>,
}
