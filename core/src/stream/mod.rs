//! Byte stream cursor
//!
//! Forward-only typed access to a save buffer. All multi-byte values are
//! little-endian.
//!
//! [`ByteWriter`] wraps any [`std::io::Write`] (normally a `Vec<u8>`).
//! [`ByteReader`] walks a borrowed slice and bounds-checks every read, so a
//! malformed save can only ever produce [`FormatError::Truncated`].
//!
//! [`FormatError::Truncated`]: crate::error::FormatError::Truncated

mod reader;
mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Width of a lump-style name (textures, flats, maps)
pub const NAME_LEN: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArchiveError, FormatError};

    #[test]
    fn test_primitives_roundtrip() {
        let mut buffer = Vec::new();
        {
            let mut w = ByteWriter::new(&mut buffer);
            w.write_u8(0xAB).unwrap();
            w.write_i16(-2).unwrap();
            w.write_u32(0xDEAD_BEEF).unwrap();
            w.write_i32(-65536).unwrap();
            w.write_f32(0.25).unwrap();
            w.write_bytes(&[1, 2, 3]).unwrap();
        }
        assert_eq!(buffer.len(), 1 + 2 + 4 + 4 + 4 + 3);

        let mut r = ByteReader::new(&buffer);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
        assert_eq!(r.read_i16().unwrap(), -2);
        assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_i32().unwrap(), -65536);
        assert_eq!(r.read_f32().unwrap(), 0.25);
        assert_eq!(r.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buffer = Vec::new();
        ByteWriter::new(&mut buffer).write_u32(101).unwrap();
        assert_eq!(buffer, vec![101, 0, 0, 0]);
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let data = [1u8, 2, 3];
        let mut r = ByteReader::new(&data);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Format(FormatError::Truncated {
                needed: 4,
                remaining: 3
            })
        ));
        // A failed read does not advance the cursor
        assert_eq!(r.position(), 0);
        assert_eq!(r.read_u8().unwrap(), 1);
    }

    #[test]
    fn test_name8_padding_and_trim() {
        let mut buffer = Vec::new();
        ByteWriter::new(&mut buffer).write_name8("FLOOR4").unwrap();
        assert_eq!(buffer.len(), NAME_LEN);
        assert_eq!(&buffer[6..], &[0, 0]);

        let mut r = ByteReader::new(&buffer);
        assert_eq!(r.read_name8().unwrap(), "FLOOR4");
    }

    #[test]
    fn test_name8_too_long_rejected() {
        let mut buffer = Vec::new();
        let err = ByteWriter::new(&mut buffer)
            .write_name8("WAYTOOLONGNAME")
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Capacity { .. }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sub_reader_is_bounded() {
        let data = [1u8, 2, 3, 4, 5];
        let mut r = ByteReader::new(&data);
        let mut sub = r.sub_reader(2).unwrap();
        assert_eq!(sub.read_u16().unwrap(), 0x0201);
        assert!(sub.read_u8().is_err());
        assert_eq!(r.read_u8().unwrap(), 3);
    }
}
