//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Panel and bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// i2c-dev node the panel is attached to
    #[serde(default = "default_bus")]
    pub bus: String,

    /// 7-bit slave address (usually 0x3C or 0x3D)
    #[serde(default = "default_address")]
    pub address: u16,

    /// Panel width in pixels
    #[serde(default = "default_width")]
    pub width: u16,

    /// Panel height in pixels
    #[serde(default = "default_height")]
    pub height: u16,

    /// Contrast sent at power-up
    #[serde(default = "default_contrast")]
    pub contrast: u8,

    /// Orientation: "normal" or "upside-down"
    #[serde(default = "default_orientation")]
    pub orientation: String,

    /// Log packets instead of touching the bus
    #[serde(default)]
    pub dry_run: bool,
}

// Default value functions
fn default_bus() -> String {
    ssd1306_panel_hw::DEFAULT_BUS.to_string()
}

fn default_address() -> u16 {
    ssd1306_panel_hw::DEFAULT_ADDRESS
}

fn default_width() -> u16 {
    ssd1306_panel_hw::DISPLAY_WIDTH
}

fn default_height() -> u16 {
    ssd1306_panel_hw::DISPLAY_HEIGHT
}

fn default_contrast() -> u8 {
    ssd1306_panel_hw::oled::DEFAULT_CONTRAST
}

fn default_orientation() -> String {
    "normal".to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: default_bus(),
            address: default_address(),
            width: default_width(),
            height: default_height(),
            contrast: default_contrast(),
            orientation: default_orientation(),
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bus, "/dev/i2c-1");
        assert_eq!(config.address, 0x3C);
        assert_eq!((config.width, config.height), (128, 64));
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str("height = 32\naddress = 61\n").unwrap();
        assert_eq!(config.height, 32);
        assert_eq!(config.address, 0x3D);
        assert_eq!(config.width, 128);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("ssd1306ctl-{}.toml", std::process::id()));
        let config = Config {
            orientation: "upside-down".to_string(),
            contrast: 0x40,
            ..Config::default()
        };
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
