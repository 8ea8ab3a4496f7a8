//! SSD1306 panel driver over an injected transport.

use crate::orientation::Orientation;
use crate::transport::Transport;
use crate::{Error, Result};
use tracing::{debug, info};

use super::framebuffer::{Framebuffer, Tile};
use super::protocol::{
    build_command_packet, build_data_packet, build_init_sequence, build_offset_packet,
    build_window_packet, Command, DATA_MARKER,
};
use super::sprite::{compose_quad, SpritePosition, QUAD_BYTES};

/// Default contrast used at power-up.
pub const DEFAULT_CONTRAST: u8 = 0xCF;

/// SSD1306 panel controller.
///
/// Owns the background framebuffer and the transport. Not internally
/// synchronised: share it behind one lock if several threads draw.
#[derive(Debug)]
pub struct OledDevice<T: Transport> {
    transport: T,
    framebuffer: Framebuffer,
    orientation: Orientation,
}

impl<T: Transport> OledDevice<T> {
    /// Creates a driver for a panel described by `framebuffer`.
    ///
    /// Nothing is sent until [`OledDevice::init`] or a transmission.
    pub fn new(transport: T, framebuffer: Framebuffer) -> Self {
        Self {
            transport,
            framebuffer,
            orientation: Orientation::default(),
        }
    }

    /// Records the orientation [`OledDevice::init`] will configure, without sending it.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns the background framebuffer.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Releases the transport, closing the bus once it is dropped.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Gets the current orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Writes one packet, failing unless every byte was accepted.
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        let written = self.transport.write(packet)?;
        if written != packet.len() {
            return Err(Error::ShortWrite {
                expected: packet.len(),
                actual: written,
            });
        }
        Ok(())
    }

    fn send_command(&mut self, byte: u8) -> Result<()> {
        self.send(&build_command_packet(byte))
    }

    /// Bounds the next data transfer to a tile-aligned rectangle.
    fn set_window(&mut self, col: u8, row: u8, num_cols: u8, num_rows: u8) -> Result<()> {
        let col_start = col << 3;
        let col_end = ((col as u16 + num_cols as u16) * 8 - 1) as u8;
        self.send(&build_window_packet(
            row,
            row + num_rows - 1,
            col_start,
            col_end,
        ))
    }

    /// Powers up the panel and blanks it.
    ///
    /// Each init command goes out as its own control packet, then the cleared
    /// framebuffer is transmitted in full.
    pub fn init(&mut self, contrast: u8) -> Result<()> {
        let sequence = build_init_sequence(self.framebuffer.height(), contrast, self.orientation);
        for byte in sequence {
            self.send_command(byte)?;
        }
        info!(
            "Panel initialised ({}x{}, contrast {:#04X}, {})",
            self.framebuffer.width(),
            self.framebuffer.height(),
            contrast,
            self.orientation
        );

        self.fill(false);
        self.transmit_full()
    }

    /// Sets every background pixel on or off. Nothing is transmitted.
    pub fn fill(&mut self, white: bool) {
        self.framebuffer.fill(white);
    }

    /// Replaces the background with raw page-ordered bytes. Nothing is transmitted.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        self.framebuffer.load(data)
    }

    /// Copies a tile into the background at `(col, row)`. Nothing is transmitted.
    pub fn write_tile(&mut self, tile: &Tile, col: u8, row: u8) -> Result<()> {
        self.framebuffer.write_tile(tile, col, row)
    }

    /// Reads back the background tile at `(col, row)`.
    pub fn read_tile(&self, col: u8, row: u8) -> Result<Tile> {
        self.framebuffer.read_tile(col, row)
    }

    /// Transmits the whole background.
    pub fn transmit_full(&mut self) -> Result<()> {
        let cols = self.framebuffer.tile_columns();
        let rows = self.framebuffer.page_count();
        self.set_window(0, 0, cols, rows)?;

        let packet = build_data_packet(self.framebuffer.data());
        self.send(&packet)?;

        debug!("Full transmit completed ({} bytes)", packet.len() - 1);
        Ok(())
    }

    /// Transmits a rectangle of background tiles.
    ///
    /// Only `num_cols * num_rows * 8` bytes cross the bus.
    pub fn transmit_region(&mut self, col: u8, row: u8, num_cols: u8, num_rows: u8) -> Result<()> {
        let region = self
            .framebuffer
            .extract_region(col, row, num_cols, num_rows)?;

        self.set_window(col, row, num_cols, num_rows)?;
        self.send(&build_data_packet(&region))?;

        debug!(
            "Partial transmit at tile ({}, {}) {}x{} ({} bytes)",
            col,
            row,
            num_cols,
            num_rows,
            region.len()
        );
        Ok(())
    }

    /// Draws `sprite` at pixel `(x, y)` without touching the background.
    ///
    /// The 2x2 tile quad under the sprite is composited in a scratch buffer
    /// and transmitted directly.
    pub fn composite_sprite(&mut self, sprite: &Tile, x: u8, y: u8) -> Result<()> {
        let pos = SpritePosition::checked(&self.framebuffer, x, y)?;
        let quad = compose_quad(&self.framebuffer, sprite, pos);

        let mut packet = [0u8; 1 + QUAD_BYTES];
        packet[0] = DATA_MARKER;
        packet[1..].copy_from_slice(&quad);

        self.set_window(pos.tile_col, pos.tile_row, 2, 2)?;
        self.send(&packet)?;

        debug!("Sprite at ({}, {}) offset ({}, {})", x, y, pos.x_off, pos.y_off);
        Ok(())
    }

    /// Erases a sprite drawn at `(x, y)` by resending the background quad.
    pub fn clear_sprite(&mut self, x: u8, y: u8) -> Result<()> {
        let pos = SpritePosition::checked(&self.framebuffer, x, y)?;
        self.transmit_region(pos.tile_col, pos.tile_row, 2, 2)
    }

    /// Shifts the displayed image vertically by `rows` pixel rows.
    ///
    /// The controller only has 64 COM lines, so `rows` wraps modulo 64;
    /// callers should keep it below the panel height.
    pub fn set_vertical_offset(&mut self, rows: u8) -> Result<()> {
        let rows = rows % crate::MAX_HEIGHT as u8;
        self.send(&build_offset_packet(rows))?;
        debug!("Vertical offset set to {}", rows);
        Ok(())
    }

    /// Sets the display orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<()> {
        self.send_command(orientation.segment_remap())?;
        self.send_command(orientation.com_scan())?;
        self.orientation = orientation;
        debug!("Set orientation to {}", orientation);
        Ok(())
    }

    /// Sets the panel contrast.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<()> {
        self.send_command(Command::SetContrast as u8)?;
        self.send_command(contrast)?;
        debug!("Set contrast to {:#04X}", contrast);
        Ok(())
    }

    /// Inverts (or restores) every displayed pixel.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<()> {
        let command = if inverted {
            Command::InverseDisplay
        } else {
            Command::NormalDisplay
        };
        self.send_command(command as u8)
    }

    /// Turns the panel on or puts it to sleep. Display RAM is retained.
    pub fn set_display_on(&mut self, on: bool) -> Result<()> {
        let command = if on {
            Command::DisplayOn
        } else {
            Command::DisplayOff
        };
        self.send_command(command as u8)
    }
}
