//! Segment framing
//!
//! A save is a sequence of segments, each introduced by a 4-byte tag and no
//! length. Segment sizes follow from the pass logic that reads them, so the
//! order in [`SEGMENT_ORDER`] is a hard contract: a reader that finds any
//! other tag than the one it expects aborts immediately.

use crate::error::{FormatError, Result};
use crate::stream::{ByteReader, ByteWriter};
use std::io::Write;

/// Segment identifiers as written to the stream
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentTag {
    Header = 101,
    MapHeader = 102,
    World = 103,
    Polyobjects = 104,
    Entities = 105,
    Thinkers = 106,
    Scripts = 107,
    Players = 108,
    Sounds = 109,
    Misc = 110,
    End = 111,
    TextureArchive = 112,
}

/// The order segments appear in a save stream
///
/// The texture archive precedes the world segment because world records
/// store texture names as indices into it.
pub const SEGMENT_ORDER: [SegmentTag; 12] = [
    SegmentTag::Header,
    SegmentTag::MapHeader,
    SegmentTag::TextureArchive,
    SegmentTag::World,
    SegmentTag::Polyobjects,
    SegmentTag::Entities,
    SegmentTag::Thinkers,
    SegmentTag::Scripts,
    SegmentTag::Players,
    SegmentTag::Sounds,
    SegmentTag::Misc,
    SegmentTag::End,
];

impl SegmentTag {
    /// Wire value of this tag
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Map a wire value back to a tag
    pub fn from_value(value: u32) -> Option<Self> {
        SEGMENT_ORDER.iter().copied().find(|t| t.value() == value)
    }
}

/// Open a new segment
pub fn begin_segment<W: Write>(w: &mut ByteWriter<W>, tag: SegmentTag) -> Result<()> {
    log::trace!("begin segment {:?} at offset {}", tag, w.position());
    w.write_u32(tag.value())
}

/// Consume the next segment tag, failing unless it is `tag`
pub fn expect_segment(r: &mut ByteReader<'_>, tag: SegmentTag) -> Result<()> {
    let offset = r.position();
    let found = r.read_u32()?;
    if found != tag.value() {
        log::error!(
            "segment mismatch at offset {}: expected {:?} ({}), found {}",
            offset,
            tag,
            tag.value(),
            found
        );
        return Err(FormatError::SegmentMismatch {
            expected: tag,
            found,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;

    #[test]
    fn test_tag_values_are_stable() {
        assert_eq!(SegmentTag::Header.value(), 101);
        assert_eq!(SegmentTag::Misc.value(), 110);
        assert_eq!(SegmentTag::End.value(), 111);
        assert_eq!(SegmentTag::TextureArchive.value(), 112);
    }

    #[test]
    fn test_order_has_no_repeats() {
        for (i, a) in SEGMENT_ORDER.iter().enumerate() {
            for b in &SEGMENT_ORDER[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(SEGMENT_ORDER.first(), Some(&SegmentTag::Header));
        assert_eq!(SEGMENT_ORDER.last(), Some(&SegmentTag::End));
    }

    #[test]
    fn test_from_value() {
        assert_eq!(SegmentTag::from_value(105), Some(SegmentTag::Entities));
        assert_eq!(SegmentTag::from_value(100), None);
        assert_eq!(SegmentTag::from_value(113), None);
    }

    #[test]
    fn test_expect_matching_segment() {
        let mut buffer = Vec::new();
        begin_segment(&mut ByteWriter::new(&mut buffer), SegmentTag::World).unwrap();
        assert_eq!(buffer.len(), 4);

        let mut r = ByteReader::new(&buffer);
        expect_segment(&mut r, SegmentTag::World).unwrap();
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_expect_mismatched_segment_fails() {
        let mut buffer = Vec::new();
        begin_segment(&mut ByteWriter::new(&mut buffer), SegmentTag::Thinkers).unwrap();

        let err = expect_segment(&mut ByteReader::new(&buffer), SegmentTag::Entities).unwrap_err();
        match err {
            ArchiveError::Format(FormatError::SegmentMismatch { expected, found }) => {
                assert_eq!(expected, SegmentTag::Entities);
                assert_eq!(found, 106);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
