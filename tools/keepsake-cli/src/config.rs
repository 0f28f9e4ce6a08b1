//! Config command - print the effective configuration

use anyhow::{Context, Result};
use keepsake_core::Config;
use keepsake_core::config::{CONFIG_FILE, config_dir};

/// Execute the config command
pub fn execute(config: &Config) -> Result<()> {
    match config_dir() {
        Some(dir) => println!("# {}", dir.join(CONFIG_FILE).display()),
        None => println!("# no config directory on this platform"),
    }
    let text = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    print!("{}", text);
    Ok(())
}
