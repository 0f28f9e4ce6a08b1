//! Ambient sound sequences

use super::EntityId;

/// Where a playing sequence is emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundOrigin {
    #[default]
    None,
    Entity(Option<EntityId>),
    Sector(usize),
    Polyobject(usize),
}

/// A sound sequence in progress
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoundSequence {
    pub sequence: u16,
    /// Offset of the next command in the sequence script
    pub script_offset: u32,
    pub delay_tics: i32,
    pub volume: f32,
    pub current_sound: u32,
    pub origin: SoundOrigin,
}
