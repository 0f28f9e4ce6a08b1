//! Configuration management (keepsake.toml)
//!
//! Slot storage settings and archive capacity limits. Stored as TOML in the
//! platform-specific config directory; missing sections and fields take
//! their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the configuration file inside [`config_dir`]
pub const CONFIG_FILE: &str = "keepsake.toml";

/// Archiver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Save slot storage
    #[serde(default)]
    pub slots: SlotConfig,
    /// Table capacities enforced on save and load
    #[serde(default)]
    pub limits: ArchiveLimits,
}

/// Save slot storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Directory holding slot files (default: `<data_dir>/saves`)
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// File name prefix (default: "keepsake")
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// File extension without the dot (default: "sav")
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Number of slots, ids `0..slot_count` (default: 8)
    #[serde(default = "default_slot_count")]
    pub slot_count: u32,
    /// Slot holding the hub base state (default: 6)
    #[serde(default = "default_base_slot")]
    pub base_slot: u32,
    /// Slot used to restart after death (default: 7)
    #[serde(default = "default_reborn_slot")]
    pub reborn_slot: u32,
    /// LZ4-compress slot payloads (default: true)
    #[serde(default = "default_true")]
    pub compress: bool,
    /// Largest payload accepted when reading a slot (default: 16 MiB)
    #[serde(default = "default_max_save_size")]
    pub max_save_size: usize,
}

/// Capacity limits for archived tables.
///
/// Exceeding one is an error on both save and load; nothing is truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLimits {
    /// Live entities (default: 16384)
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,
    /// Thinkers in the Thinkers segment (default: 4096)
    #[serde(default = "default_max_thinkers")]
    pub max_thinkers: usize,
    /// Script interpreters and script infos (default: 1024)
    #[serde(default = "default_max_scripts")]
    pub max_scripts: usize,
    /// Sound sequences (default: 256)
    #[serde(default = "default_max_sounds")]
    pub max_sounds: usize,
    /// Local player sentinel references per load (default: 512)
    #[serde(default = "default_max_local_player_refs")]
    pub max_local_player_refs: usize,
}

fn default_root() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
}
fn default_prefix() -> String {
    "keepsake".to_string()
}
fn default_extension() -> String {
    "sav".to_string()
}
fn default_slot_count() -> u32 {
    8
}
fn default_base_slot() -> u32 {
    6
}
fn default_reborn_slot() -> u32 {
    7
}
fn default_true() -> bool {
    true
}
fn default_max_save_size() -> usize {
    16 * 1024 * 1024
}

fn default_max_entities() -> usize {
    16384
}
fn default_max_thinkers() -> usize {
    4096
}
fn default_max_scripts() -> usize {
    1024
}
fn default_max_sounds() -> usize {
    256
}
fn default_max_local_player_refs() -> usize {
    512
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            prefix: default_prefix(),
            extension: default_extension(),
            slot_count: default_slot_count(),
            base_slot: default_base_slot(),
            reborn_slot: default_reborn_slot(),
            compress: default_true(),
            max_save_size: default_max_save_size(),
        }
    }
}

impl SlotConfig {
    /// Default settings rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_entities: default_max_entities(),
            max_thinkers: default_max_thinkers(),
            max_scripts: default_max_scripts(),
            max_sounds: default_max_sounds(),
            max_local_player_refs: default_max_local_player_refs(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/keepsake`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.keepsake", "", "Keepsake")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory (default slot root parent).
///
/// On Linux: `~/.local/share/keepsake`
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.keepsake", "", "Keepsake")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_dir()
        .and_then(|dir| std::fs::read_to_string(dir.join(CONFIG_FILE)).ok())
        .and_then(|content| match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring unreadable {}: {}", CONFIG_FILE, e);
                None
            }
        })
        .unwrap_or_default()
}

/// Saves the configuration to disk.
///
/// Creates the config directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &Config) -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        std::fs::create_dir_all(&dir)?;
        let content = toml::to_string_pretty(config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(dir.join(CONFIG_FILE), content)?;
    }
    Ok(())
}
