//! Save stream reader
//!
//! Every read checks the remaining length first. Save files are untrusted
//! input, so this holds in release builds too.

use byteorder::{ByteOrder, LittleEndian};

use super::NAME_LEN;
use crate::error::{FormatError, Result};

/// Forward-only typed reader over a borrowed buffer
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(FormatError::Truncated {
                needed: n,
                remaining: self.remaining(),
            }
            .into());
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    /// Read a byte that must be 0 or 1
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(FormatError::InvalidValue {
                field: "bool",
                value: v as i64,
            }
            .into()),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Read a raw byte block
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Fill `out` with consecutive i32 values
    pub fn read_i32_into(&mut self, out: &mut [i32]) -> Result<()> {
        let bytes = self.take(out.len() * 4)?;
        LittleEndian::read_i32_into(bytes, out);
        Ok(())
    }

    /// Read a fixed-width, zero-padded string field
    pub fn read_padded(&mut self, width: usize) -> Result<String> {
        let bytes = self.take(width)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(width);
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Read an 8-byte lump-style name
    pub fn read_name8(&mut self) -> Result<String> {
        self.read_padded(NAME_LEN)
    }

    /// Split off the next `n` bytes as an independent, bounded reader
    pub fn sub_reader(&mut self, n: usize) -> Result<ByteReader<'a>> {
        Ok(ByteReader::new(self.take(n)?))
    }
}
