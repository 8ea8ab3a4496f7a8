//! OLED panel module.
//!
//! Provides the background framebuffer, tile and sprite compositing, and
//! windowed transmission for SSD1306 panels.

mod device;
pub mod framebuffer;
pub mod protocol;
pub mod sprite;

pub use device::{OledDevice, DEFAULT_CONTRAST};
pub use framebuffer::{parse_tile, Framebuffer, Tile, TILE_BYTES};
pub use protocol::Command;
pub use sprite::{compose_quad, tile_from_rows, SpritePosition, QUAD_BYTES};
