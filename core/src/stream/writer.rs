//! Save stream writer

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use super::NAME_LEN;
use crate::error::{ArchiveError, Result};

/// Forward-only typed writer over any byte sink
pub struct ByteWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> ByteWriter<W> {
    /// Create a new writer
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.written
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.writer.write_u8(v)?;
        self.written += 1;
        Ok(())
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        self.writer.write_i8(v)?;
        self.written += 1;
        Ok(())
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(v as u8)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(v)?;
        self.written += 2;
        Ok(())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.writer.write_i16::<LittleEndian>(v)?;
        self.written += 2;
        Ok(())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(v)?;
        self.written += 4;
        Ok(())
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.writer.write_i32::<LittleEndian>(v)?;
        self.written += 4;
        Ok(())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.writer.write_f32::<LittleEndian>(v)?;
        self.written += 4;
        Ok(())
    }

    /// Write a raw byte block
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    /// Write a slice of i32 values without a length prefix
    pub fn write_i32_slice(&mut self, values: &[i32]) -> Result<()> {
        for &v in values {
            self.write_i32(v)?;
        }
        Ok(())
    }

    /// Write `s` into a fixed-width, zero-padded field
    pub fn write_padded(&mut self, s: &str, width: usize, what: &'static str) -> Result<()> {
        let bytes = s.as_bytes();
        if bytes.len() > width {
            return Err(ArchiveError::Capacity {
                what,
                count: bytes.len(),
                max: width,
            });
        }
        let mut field = vec![0u8; width];
        field[..bytes.len()].copy_from_slice(bytes);
        self.write_bytes(&field)
    }

    /// Write an 8-byte lump-style name
    pub fn write_name8(&mut self, name: &str) -> Result<()> {
        self.write_padded(name, NAME_LEN, "name bytes")
    }

    /// Consume the writer and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
