//! Archivable thinkers
//!
//! Movers reference their sector or polyobject by index. Script
//! interpreters are thinkers too but are kept in
//! [`ScriptState`](super::ScriptState).

use super::Fixed;

/// Position of a thinker in [`Session::thinkers`](super::Session::thinkers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThinkerId(pub usize);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ceiling {
    pub sector: usize,
    pub kind: i32,
    pub bottom_height: Fixed,
    pub top_height: Fixed,
    pub speed: Fixed,
    pub crush: i32,
    pub direction: i32,
    pub tag: i32,
    pub old_direction: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Door {
    pub sector: usize,
    pub kind: i32,
    pub speed: Fixed,
    pub direction: i32,
    pub top_height: Fixed,
    /// Tics to wait at the top
    pub top_wait: i32,
    pub top_countdown: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloorMove {
    pub sector: usize,
    pub kind: i32,
    pub crush: i32,
    pub direction: i32,
    pub new_special: i32,
    pub floor_dest_height: Fixed,
    pub speed: Fixed,
    pub delay_count: i32,
    pub delay_total: i32,
    pub stairs_delay_height: Fixed,
    pub stairs_delay_height_delta: Fixed,
    pub reset_height: Fixed,
    pub reset_delay: i16,
    pub reset_delay_count: i16,
    pub texture_change: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatStatus {
    #[default]
    Up,
    Down,
    Waiting,
    InStasis,
}

impl PlatStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            2 => Some(Self::Waiting),
            3 => Some(Self::InStasis),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plat {
    pub sector: usize,
    pub speed: Fixed,
    pub low: Fixed,
    pub high: Fixed,
    pub wait: i32,
    pub count: i32,
    pub status: PlatStatus,
    pub old_status: PlatStatus,
    pub crush: i32,
    pub tag: i32,
    pub kind: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Light {
    pub sector: usize,
    pub kind: u8,
    pub value1: i32,
    pub value2: i32,
    pub tics1: i32,
    pub tics2: i32,
    pub count: i32,
}

/// Phased (cycling) light
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Phase {
    pub sector: usize,
    pub index: i32,
    pub base: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pillar {
    pub sector: usize,
    pub ceiling_speed: Fixed,
    pub floor_speed: Fixed,
    pub floor_dest: Fixed,
    pub ceiling_dest: Fixed,
    pub direction: i32,
    pub crush: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloorWaggle {
    pub sector: usize,
    pub original_height: Fixed,
    pub accumulator: Fixed,
    pub acc_delta: Fixed,
    pub target_scale: Fixed,
    pub scale: Fixed,
    pub scale_delta: Fixed,
    pub ticker: i32,
    pub state: u8,
}

/// Rotating or translating polyobject
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyEvent {
    pub polyobj: usize,
    pub speed: i32,
    pub dist: u32,
    pub angle: u32,
    pub x_speed: Fixed,
    pub y_speed: Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyDoorKind {
    #[default]
    None,
    Slide,
    Swing,
}

impl PolyDoorKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Slide),
            2 => Some(Self::Swing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyDoor {
    pub polyobj: usize,
    pub speed: i32,
    pub dist: i32,
    pub total_dist: i32,
    pub direction: i32,
    pub x_speed: Fixed,
    pub y_speed: Fixed,
    pub tics: i32,
    pub wait_tics: i32,
    pub kind: PolyDoorKind,
    pub close: bool,
}

/// Every archivable thinker kind except script interpreters
#[derive(Debug, Clone, PartialEq)]
pub enum Thinker {
    Ceiling(Ceiling),
    Door(Door),
    Floor(FloorMove),
    Plat(Plat),
    Light(Light),
    Phase(Phase),
    Pillar(Pillar),
    FloorWaggle(FloorWaggle),
    RotatePoly(PolyEvent),
    MovePoly(PolyEvent),
    PolyDoor(PolyDoor),
}

impl Thinker {
    /// Sector this thinker is bound to, if any
    pub fn sector(&self) -> Option<usize> {
        match self {
            Self::Ceiling(t) => Some(t.sector),
            Self::Door(t) => Some(t.sector),
            Self::Floor(t) => Some(t.sector),
            Self::Plat(t) => Some(t.sector),
            Self::Light(t) => Some(t.sector),
            Self::Phase(t) => Some(t.sector),
            Self::Pillar(t) => Some(t.sector),
            Self::FloorWaggle(t) => Some(t.sector),
            Self::RotatePoly(_) | Self::MovePoly(_) | Self::PolyDoor(_) => None,
        }
    }

    /// Polyobject this thinker is bound to, if any
    pub fn polyobj(&self) -> Option<usize> {
        match self {
            Self::RotatePoly(t) | Self::MovePoly(t) => Some(t.polyobj),
            Self::PolyDoor(t) => Some(t.polyobj),
            _ => None,
        }
    }
}
