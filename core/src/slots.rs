//! Save slot storage
//!
//! Each slot is one file, `<root>/<prefix><slot>.<ext>`:
//!
//! ```text
//! magic "KSLT" | flags: u8 | payload
//! ```
//!
//! With [`SlotFlags::COMPRESSED`] the payload is an LZ4 block prefixed with
//! its decompressed size; otherwise it is the raw archive. Files are replaced
//! by writing `<file>.tmp`, syncing it and renaming it over the target.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};

use crate::config::SlotConfig;
use crate::error::{ArchiveError, FormatError, Result};

/// Slot file magic
pub const SLOT_MAGIC: [u8; 4] = *b"KSLT";

bitflags::bitflags! {
    /// Slot transport flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SlotFlags: u8 {
        const COMPRESSED = 0x01;
    }
}

const HEADER_LEN: usize = SLOT_MAGIC.len() + 1;

/// Wrap an archive in the slot transport
pub fn pack(raw: &[u8], compress: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + raw.len());
    out.extend_from_slice(&SLOT_MAGIC);
    if compress {
        out.push(SlotFlags::COMPRESSED.bits());
        out.extend_from_slice(&compress_prepend_size(raw));
    } else {
        out.push(SlotFlags::empty().bits());
        out.extend_from_slice(raw);
    }
    out
}

/// Unwrap a slot file, refusing payloads larger than `max_size`
pub fn unpack(bytes: &[u8], max_size: usize) -> Result<Vec<u8>> {
    if bytes.len() < HEADER_LEN || bytes[..SLOT_MAGIC.len()] != SLOT_MAGIC {
        return Err(FormatError::BadMagic.into());
    }
    let flag_bits = bytes[SLOT_MAGIC.len()];
    let flags = SlotFlags::from_bits(flag_bits).ok_or(FormatError::InvalidValue {
        field: "slot flags",
        value: flag_bits as i64,
    })?;
    let payload = &bytes[HEADER_LEN..];

    if !flags.contains(SlotFlags::COMPRESSED) {
        check_size(payload.len(), max_size)?;
        return Ok(payload.to_vec());
    }

    // Check the declared size before allocating for it
    let Some(prefix) = payload.get(..4) else {
        return Err(FormatError::Truncated {
            needed: 4,
            remaining: payload.len(),
        }
        .into());
    };
    let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    check_size(declared, max_size)?;
    decompress_size_prepended(payload).map_err(|e| FormatError::Decompress(e.to_string()).into())
}

fn check_size(size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(ArchiveError::Capacity {
            what: "save bytes",
            count: size,
            max,
        });
    }
    Ok(())
}

/// Directory-backed slot store
#[derive(Debug, Clone)]
pub struct SlotStore {
    config: SlotConfig,
}

impl SlotStore {
    pub fn new(config: SlotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Slot holding the hub base state
    pub fn base_slot(&self) -> u32 {
        self.config.base_slot
    }

    /// Slot used to restart after death
    pub fn reborn_slot(&self) -> u32 {
        self.config.reborn_slot
    }

    /// File backing `slot`
    pub fn path_for(&self, slot: u32) -> Result<PathBuf> {
        if slot >= self.config.slot_count {
            return Err(ArchiveError::InvalidSlot {
                slot,
                count: self.config.slot_count,
            });
        }
        let name = format!("{}{}.{}", self.config.prefix, slot, self.config.extension);
        Ok(self.config.root.join(name))
    }

    pub fn exists(&self, slot: u32) -> Result<bool> {
        Ok(self.path_for(slot)?.is_file())
    }

    /// Store an archive in `slot`, replacing what was there
    pub fn write(&self, slot: u32, raw: &[u8]) -> Result<()> {
        check_size(raw.len(), self.config.max_save_size)?;
        let path = self.path_for(slot)?;
        let file = pack(raw, self.config.compress);
        replace_file(&path, &file)?;
        log::debug!(
            "slot {}: wrote {} bytes ({} archived) to {}",
            slot,
            file.len(),
            raw.len(),
            path.display()
        );
        Ok(())
    }

    /// Read the archive stored in `slot`
    pub fn read(&self, slot: u32) -> Result<Vec<u8>> {
        let bytes = self.read_file(slot)?;
        unpack(&bytes, self.config.max_save_size)
    }

    /// Remove `slot`'s file; an already empty slot is fine
    pub fn clear(&self, slot: u32) -> Result<()> {
        let path = self.path_for(slot)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("slot {}: cleared", slot);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy `from`'s file to `to` byte for byte
    pub fn copy(&self, from: u32, to: u32) -> Result<()> {
        let target = self.path_for(to)?;
        let bytes = self.read_file(from)?;
        if from == to {
            return Ok(());
        }
        replace_file(&target, &bytes)?;
        log::debug!("slot {}: copied to slot {}", from, to);
        Ok(())
    }

    fn read_file(&self, slot: u32) -> Result<Vec<u8>> {
        let path = self.path_for(slot)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ArchiveError::EmptySlot(slot)),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `bytes` to `path` through a synced temporary file
fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = match path.file_name() {
        Some(name) => {
            let mut tmp_name = OsString::from(name);
            tmp_name.push(".tmp");
            path.with_file_name(tmp_name)
        }
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "slot path has no file name",
            ));
        }
    };

    let result = write_and_rename(&tmp_path, path, bytes);
    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("could not remove {}: {}", tmp_path.display(), e);
            }
        }
    }
    result
}

fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    {
        let mut f = fs::File::create(tmp_path)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }

    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(path)?;
        }
    }

    fs::rename(tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path, compress: bool) -> SlotStore {
        SlotStore::new(SlotConfig {
            compress,
            ..SlotConfig::with_root(dir)
        })
    }

    fn sample_archive() -> Vec<u8> {
        (0..4096u32).flat_map(|i| ((i / 16) as u16).to_le_bytes()).collect()
    }

    #[test]
    fn test_path_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        assert_eq!(store.path_for(3).unwrap(), dir.path().join("keepsake3.sav"));
    }

    #[test]
    fn test_invalid_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        let err = store.path_for(8).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidSlot { slot: 8, count: 8 }));
        assert!(matches!(
            store.write(99, b"x"),
            Err(ArchiveError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn test_write_read_roundtrip_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        let raw = sample_archive();
        store.write(0, &raw).unwrap();

        let on_disk = fs::read(store.path_for(0).unwrap()).unwrap();
        assert_eq!(&on_disk[..4], &SLOT_MAGIC);
        assert_eq!(on_disk[4], SlotFlags::COMPRESSED.bits());
        assert!(on_disk.len() < raw.len());

        assert_eq!(store.read(0).unwrap(), raw);
        assert!(!dir.path().join("keepsake0.sav.tmp").exists());
    }

    #[test]
    fn test_write_read_roundtrip_uncompressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), false);
        let raw = sample_archive();
        store.write(1, &raw).unwrap();
        let on_disk = fs::read(store.path_for(1).unwrap()).unwrap();
        assert_eq!(on_disk.len(), HEADER_LEN + raw.len());
        assert_eq!(store.read(1).unwrap(), raw);
    }

    #[test]
    fn test_read_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        assert!(!store.exists(2).unwrap());
        assert!(matches!(store.read(2), Err(ArchiveError::EmptySlot(2))));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        store.write(4, b"data").unwrap();
        assert!(store.exists(4).unwrap());
        store.clear(4).unwrap();
        assert!(!store.exists(4).unwrap());
        store.clear(4).unwrap();
    }

    #[test]
    fn test_copy_there_and_back_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        store.write(0, &sample_archive()).unwrap();
        let original = fs::read(store.path_for(0).unwrap()).unwrap();

        store.copy(0, 5).unwrap();
        store.copy(5, 0).unwrap();
        assert_eq!(fs::read(store.path_for(0).unwrap()).unwrap(), original);
        assert_eq!(fs::read(store.path_for(5).unwrap()).unwrap(), original);
    }

    #[test]
    fn test_copy_from_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        assert!(matches!(store.copy(1, 2), Err(ArchiveError::EmptySlot(1))));
    }

    #[test]
    fn test_reserved_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), true);
        assert_eq!(store.base_slot(), 6);
        assert_eq!(store.reborn_slot(), 7);
    }

    #[test]
    fn test_unpack_rejects_bad_magic() {
        let err = unpack(b"NOPE\0data", 1024).unwrap_err();
        assert_eq!(err.as_format(), Some(&FormatError::BadMagic));
    }

    #[test]
    fn test_unpack_rejects_unknown_flags() {
        let err = unpack(b"KSLT\x80data", 1024).unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(FormatError::InvalidValue {
                field: "slot flags",
                value: 0x80
            })
        ));
    }

    #[test]
    fn test_unpack_checks_declared_size_first() {
        let packed = pack(&sample_archive(), true);
        let err = unpack(&packed, 100).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::Capacity {
                what: "save bytes",
                count: 8192,
                max: 100
            }
        ));
    }

    #[test]
    fn test_unpack_corrupt_block() {
        let mut packed = pack(&sample_archive(), true);
        packed.truncate(HEADER_LEN + 6);
        let err = unpack(&packed, 1 << 20).unwrap_err();
        assert!(matches!(err.as_format(), Some(FormatError::Decompress(_))));
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), false);
        // A directory in the slot's place makes the final rename fail
        let path = store.path_for(2).unwrap();
        fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(store.write(2, &sample_archive()).is_err());
        assert!(!dir.path().join("keepsake2.sav.tmp").exists());
        assert!(path.join("occupied").is_dir());
    }
}
