//! Error types for archiving and restoring game state
//!
//! Three families:
//! - [`FormatError`] - the save stream is corrupt or from a different build.
//!   Always fatal to a load.
//! - [`ReferenceError`] - an encoded entity reference resolves to nothing.
//!   Recoverable: the reference becomes null and the error is reported in
//!   [`LoadReport`](crate::archiver::LoadReport).
//! - [`ArchiveError`] - everything surfaced to the caller (format, I/O,
//!   capacity, slot errors).

use std::io;

use crate::segment::SegmentTag;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Top-level error for save/load operations
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The save stream is malformed
    #[error("corrupt save: {0}")]
    Format(#[from] FormatError),

    /// Reading or writing a slot file failed
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A fixed-size table would overflow
    #[error("too many {what}: {count} (max {max})")]
    Capacity {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// The session being saved names geometry the level does not have
    #[error("{what} index {index} out of range (level has {count})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        count: usize,
    },

    /// Slot id outside the configured range
    #[error("invalid save slot {slot} (store has {count} slots)")]
    InvalidSlot { slot: u32, count: u32 },

    /// Slot has no backing file
    #[error("save slot {0} is empty")]
    EmptySlot(u32),

    /// The map named by the save could not be provided by the map loader
    #[error("map '{0}' is not available")]
    MapUnavailable(String),
}

impl ArchiveError {
    /// Returns the format error if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Self::Format(e) => Some(e),
            _ => None,
        }
    }
}

/// Corrupt or mismatched save stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("bad magic (not a save file)")]
    BadMagic,

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("expected segment {expected:?}, found tag {found}")]
    SegmentMismatch { expected: SegmentTag, found: u32 },

    #[error("stream truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("unknown thinker tag {0}")]
    UnknownThinker(u8),

    #[error("{class} record is {found} bytes, registered size is {expected}")]
    ThinkerSize {
        class: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} index {index} out of range (count {count})")]
    BadIndex {
        what: &'static str,
        index: u32,
        count: usize,
    },

    #[error("{what} count {found} does not match the loaded map ({expected})")]
    GeometryMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("polyobject {index}: tag {found} does not match map tag {expected}")]
    PolyobjectMismatch { index: usize, expected: i32, found: i32 },

    #[error("invalid {field} value {value}")]
    InvalidValue { field: &'static str, value: i64 },

    #[error("script {script}: program counter {pc} outside module ({len} bytes)")]
    ScriptPc { script: i32, pc: u32, len: u32 },

    #[error("script {0} does not exist in the loaded module")]
    UnknownScript(i32),

    #[error("map header names '{found}', save header names '{expected}'")]
    MapMismatch { expected: String, found: String },

    #[error("slot payload could not be decompressed: {0}")]
    Decompress(String),
}

/// An entity reference that resolved to no entity during fixup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} refers to archive number {number}, which is not a restored entity")]
pub struct ReferenceError {
    /// Human-readable description of the field being fixed up
    pub field: String,
    /// The encoded archive number
    pub number: i32,
}
