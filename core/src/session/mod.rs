//! Live simulation state
//!
//! [`Session`] is everything a save captures. It is owned by the simulation
//! thread; the archiver borrows it for the duration of one save and builds a
//! replacement on load.
//!
//! The archiver also talks to two collaborators it does not own:
//! - [`MapLoader`] supplies freshly loaded base geometry for a map.
//! - [`ScriptModule`] describes the loaded script bytecode.

mod entity;
mod level;
mod player;
mod script;
mod sound;
mod thinker;

pub use entity::{Entity, EntityArena, EntityFlags, EntityId, SpecialValue};
pub use level::{Level, Line, Polyobject, Sector, Side};
pub use player::{
    Inventory, InventorySlot, MAX_INVENTORY_SLOTS, NUM_POWERS, Player, PlayerClass, PlayerState,
};
pub use script::{
    DeferredScript, MAX_MAP_VARS, MAX_SCRIPT_STORE, MAX_SCRIPT_VARS, MAX_WORLD_VARS,
    SCRIPT_STACK_DEPTH, ScriptContext, ScriptInfo, ScriptRunState, ScriptState, WaitState,
};
pub use sound::{SoundOrigin, SoundSequence};
pub use thinker::{
    Ceiling, Door, FloorMove, FloorWaggle, Light, Phase, Pillar, Plat, PlatStatus, PolyDoor,
    PolyDoorKind, PolyEvent, Thinker, ThinkerId,
};

/// 16.16 fixed-point value
pub type Fixed = i32;

/// One map unit in fixed point
pub const FRACUNIT: Fixed = 1 << 16;

/// Player slots per session
pub const MAX_PLAYERS: usize = 8;

/// Rules the session was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameRules {
    pub skill: u8,
    /// 0 = cooperative, 1 = deathmatch, 2 = altdeath
    pub deathmatch: u8,
    pub netgame: bool,
    pub no_monsters: bool,
    pub random_classes: bool,
}

bitflags::bitflags! {
    /// Global effect toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MiscFlags: u8 {
        const LIGHTNING = 0b0000_0001;
        const SKY_PAUSED = 0b0000_0010;
    }
}

/// Scalar global state with no references
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiscState {
    /// Tics elapsed in the current hub
    pub world_timer: u32,
    /// Earthquake intensity felt by each player
    pub quake: [i32; MAX_PLAYERS],
    pub random_index: u8,
    pub flags: MiscFlags,
}

/// Complete archivable simulation state
#[derive(Debug)]
pub struct Session {
    pub rules: GameRules,
    /// Player slot controlled locally (not archived)
    pub console_player: usize,
    pub level: Level,
    /// Tics elapsed on the current map
    pub level_time: u32,
    pub entities: EntityArena,
    pub thinkers: Vec<Thinker>,
    pub scripts: ScriptState,
    pub players: [Player; MAX_PLAYERS],
    pub sounds: Vec<SoundSequence>,
    pub misc: MiscState,
}

impl Session {
    /// A fresh session on `level` with nothing spawned
    pub fn new(level: Level) -> Self {
        Self {
            rules: GameRules::default(),
            console_player: 0,
            level,
            level_time: 0,
            entities: EntityArena::new(),
            thinkers: Vec::new(),
            scripts: ScriptState::default(),
            players: std::array::from_fn(|_| Player::default()),
            sounds: Vec::new(),
            misc: MiscState::default(),
        }
    }

    /// Enrol a thinker, linking it to its sector or polyobject
    pub fn add_thinker(&mut self, thinker: Thinker) -> ThinkerId {
        let id = ThinkerId(self.thinkers.len());
        if let Some(sector) = thinker.sector().and_then(|s| self.level.sectors.get_mut(s)) {
            sector.special_data = Some(id);
        }
        if let Some(po) = thinker.polyobj().and_then(|p| self.level.polyobjs.get_mut(p)) {
            po.special_data = Some(id);
        }
        self.thinkers.push(thinker);
        id
    }

    /// Body of the locally controlled player
    pub fn local_body(&self) -> Option<EntityId> {
        self.players.get(self.console_player).and_then(|p| p.mo)
    }
}

/// Supplies base geometry for a map
pub trait MapLoader {
    /// Load `map` fresh from its definition, or `None` if it does not exist
    fn load_level(&mut self, map: &str) -> Option<Level>;
}

/// Read-only view of the loaded script bytecode
pub trait ScriptModule {
    /// Offset of `number`'s entry point, if the script exists
    fn entry_point(&self, number: i32) -> Option<u32>;

    /// Size of the bytecode in bytes
    fn code_len(&self) -> u32;
}
