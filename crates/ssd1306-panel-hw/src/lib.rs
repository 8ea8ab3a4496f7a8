//! SSD1306 Panel Hardware Library
//!
//! Keeps an off-screen copy of the SSD1306's page-oriented display RAM,
//! composites tiles and sub-tile sprites over it, and transmits only the
//! rectangular window touched by a change.

pub mod error;
pub mod oled;
pub mod orientation;
pub mod transport;

pub use error::{Error, Result};
pub use oled::{Framebuffer, OledDevice, SpritePosition, Tile};
pub use orientation::Orientation;
pub use transport::{RecordingTransport, Transport};

#[cfg(target_os = "linux")]
pub use transport::I2cTransport;

/// Default panel dimensions (128x64 module).
pub const DISPLAY_WIDTH: u16 = 128;
pub const DISPLAY_HEIGHT: u16 = 64;

/// Largest geometry the controller can address.
pub const MAX_WIDTH: u16 = 128;
pub const MAX_HEIGHT: u16 = 64;

/// Pixel rows per page and pixel columns per tile.
pub const TILE_SIZE: u16 = 8;

/// Default I2C bus and 7-bit slave address.
pub const DEFAULT_BUS: &str = "/dev/i2c-1";
pub const DEFAULT_ADDRESS: u16 = 0x3C;
