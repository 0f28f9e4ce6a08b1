//! Map geometry as seen by the archiver
//!
//! A [`Level`] comes from the map loader with its base geometry. A save only
//! carries the fields that change during play (heights, textures, light,
//! specials, polyobject transforms).

use super::{Fixed, ThinkerId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sector {
    pub floor_height: Fixed,
    pub ceiling_height: Fixed,
    pub floor_texture: String,
    pub ceiling_texture: String,
    pub light_level: i16,
    pub special: i16,
    pub tag: i16,
    /// Sound sequence type
    pub seq_type: i16,
    /// Mover currently acting on this sector
    pub special_data: Option<ThinkerId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Side {
    pub texture_offset: Fixed,
    pub row_offset: Fixed,
    pub top_texture: String,
    pub bottom_texture: String,
    pub mid_texture: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub flags: u16,
    pub special: u8,
    pub args: [u8; 5],
    /// Side indices (not archived; part of the base map)
    pub front: Option<usize>,
    pub back: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyobject {
    pub tag: i32,
    pub angle: u32,
    pub x: Fixed,
    pub y: Fixed,
    /// Mover currently acting on this polyobject
    pub special_data: Option<ThinkerId>,
}

impl Polyobject {
    /// Move an already-spawned polyobject to a saved transform
    pub fn reposition(&mut self, angle: u32, x: Fixed, y: Fixed) {
        self.angle = angle;
        self.x = x;
        self.y = y;
    }
}

/// Geometry of the current map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    /// Map lump name
    pub name: String,
    pub sectors: Vec<Sector>,
    pub lines: Vec<Line>,
    pub sides: Vec<Side>,
    pub polyobjs: Vec<Polyobject>,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn polyobject_count(&self) -> usize {
        self.polyobjs.len()
    }
}
