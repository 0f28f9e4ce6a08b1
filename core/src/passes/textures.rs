//! Texture archive segment
//!
//! Sector flats and side textures are written once here; the World segment
//! refers to them by index.

use std::io::Write;

use hashbrown::HashMap;

use super::{LoadContext, SaveContext, check_capacity};
use crate::error::{FormatError, Result};
use crate::segment::{SegmentTag, begin_segment, expect_segment};
use crate::session::Level;
use crate::stream::{ByteReader, ByteWriter};

/// Distinct texture names in first-use order
#[derive(Debug, Default)]
pub struct TextureArchive {
    names: Vec<String>,
    index: HashMap<String, u16>,
}

impl TextureArchive {
    /// Gather every texture name used by `level`'s sectors and sides
    pub fn collect(level: &Level) -> Result<Self> {
        let mut archive = Self::default();
        for sector in &level.sectors {
            archive.add(&sector.floor_texture)?;
            archive.add(&sector.ceiling_texture)?;
        }
        for side in &level.sides {
            archive.add(&side.top_texture)?;
            archive.add(&side.bottom_texture)?;
            archive.add(&side.mid_texture)?;
        }
        Ok(archive)
    }

    fn add(&mut self, name: &str) -> Result<()> {
        if self.index.contains_key(name) {
            return Ok(());
        }
        check_capacity("texture names", self.names.len() + 1, u16::MAX as usize)?;
        self.index.insert(name.to_owned(), self.names.len() as u16);
        self.names.push(name.to_owned());
        Ok(())
    }

    /// Archive index of `name`
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub fn archive_textures<W: Write>(ctx: &SaveContext<'_>, w: &mut ByteWriter<W>) -> Result<()> {
    begin_segment(w, SegmentTag::TextureArchive)?;
    w.write_u16(ctx.textures.len() as u16)?;
    for name in ctx.textures.names() {
        w.write_name8(name)?;
    }
    Ok(())
}

pub fn unarchive_textures(ctx: &mut LoadContext<'_>, r: &mut ByteReader<'_>) -> Result<()> {
    expect_segment(r, SegmentTag::TextureArchive)?;
    let count = r.read_u16()? as usize;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(r.read_name8()?);
    }
    log::debug!("texture archive: {} names", count);
    ctx.textures = names;
    Ok(())
}

/// Name stored under archive index `index`
pub(crate) fn texture_name(textures: &[String], index: u16) -> Result<String> {
    textures.get(index as usize).cloned().ok_or_else(|| {
        FormatError::BadIndex {
            what: "texture",
            index: index as u32,
            count: textures.len(),
        }
        .into()
    })
}
