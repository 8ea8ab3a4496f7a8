//! Sub-tile sprite compositing.
//!
//! A sprite is an 8x8 tile drawn at any pixel position. Off the tile grid it
//! straddles up to four tiles (a quad): the horizontal offset pushes columns
//! into the tile to the right and the vertical offset pushes bits into the
//! page below. The quad is composited into a scratch buffer on top of the
//! stored background, so the framebuffer itself never holds sprite pixels.

use super::framebuffer::{Framebuffer, Tile, TILE_BYTES};
use crate::{Error, Result};

/// Bytes in a composited 2x2 tile quad.
pub const QUAD_BYTES: usize = 4 * TILE_BYTES;

/// A pixel position decomposed into its tile and intra-tile offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpritePosition {
    /// Tile column holding the sprite's left edge.
    pub tile_col: u8,
    /// Page holding the sprite's top edge.
    pub tile_row: u8,
    /// Pixel offset within the tile column (0-7).
    pub x_off: u8,
    /// Pixel offset within the page (0-7).
    pub y_off: u8,
}

impl SpritePosition {
    /// Splits a pixel position into tile and offset parts.
    pub fn new(x: u8, y: u8) -> Self {
        let tile_col = x >> 3;
        let tile_row = y >> 3;
        Self {
            tile_col,
            tile_row,
            x_off: x - (tile_col << 3),
            y_off: y - (tile_row << 3),
        }
    }

    /// Splits a pixel position, rejecting it unless the whole quad fits.
    ///
    /// The quad always covers `(tile_col + 1, tile_row + 1)`, even when the
    /// sprite happens to be tile aligned.
    pub fn checked(fb: &Framebuffer, x: u8, y: u8) -> Result<Self> {
        let pos = Self::new(x, y);
        if pos.tile_col + 1 >= fb.tile_columns() || pos.tile_row + 1 >= fb.page_count() {
            return Err(Error::SpriteOutOfRange { x, y });
        }
        Ok(pos)
    }
}

/// Sprite column `i` shifted into place for the upper page.
fn shift_down(byte: u8, y_off: u8) -> u8 {
    byte << y_off
}

/// The bits that `shift_down` pushed past row 7, moved to the top of the page below.
fn spill_down(byte: u8, y_off: u8) -> u8 {
    // y_off == 0 spills nothing; an 8-bit shift by 8 would overflow.
    if y_off == 0 {
        0
    } else {
        byte >> (8 - y_off)
    }
}

/// Composites `sprite` at `pos` over the stored background.
///
/// Returns the quad as four tiles in window order: top-left, top-right,
/// bottom-left, bottom-right. `pos` must come from [`SpritePosition::checked`]
/// against the same framebuffer.
pub fn compose_quad(fb: &Framebuffer, sprite: &Tile, pos: SpritePosition) -> [u8; QUAD_BYTES] {
    let SpritePosition {
        tile_col,
        tile_row,
        x_off,
        y_off,
    } = pos;
    let x_off = x_off as usize;

    let mut quad = [0u8; QUAD_BYTES];
    let (top, bottom) = quad.split_at_mut(2 * TILE_BYTES);
    let (top_left, top_right) = top.split_at_mut(TILE_BYTES);
    let (bottom_left, bottom_right) = bottom.split_at_mut(TILE_BYTES);

    top_left.copy_from_slice(&fb.tile_at(tile_col, tile_row));
    top_right.copy_from_slice(&fb.tile_at(tile_col + 1, tile_row));
    bottom_left.copy_from_slice(&fb.tile_at(tile_col, tile_row + 1));
    bottom_right.copy_from_slice(&fb.tile_at(tile_col + 1, tile_row + 1));

    for i in 0..TILE_BYTES {
        if i >= x_off {
            // Sprite column lands in the left tile column.
            let column = sprite[i - x_off];
            top_left[i] |= shift_down(column, y_off);
            bottom_left[i] |= spill_down(column, y_off);
        } else {
            // Sprite columns that overflow past the left tile's right edge.
            let column = sprite[TILE_BYTES - x_off + i];
            top_right[i] |= shift_down(column, y_off);
            bottom_right[i] |= spill_down(column, y_off);
        }
    }

    quad
}

/// Converts a row-major bitmap into the column-major tile layout.
///
/// Input byte `r` is pixel row `r` with bit `c` as pixel column `c` (the
/// common 8x8 font layout). Output byte `c` is pixel column `c` with bit `r`
/// as pixel row `r`.
pub fn tile_from_rows(rows: &Tile) -> Tile {
    let mut tile = [0u8; TILE_BYTES];
    for (c, column) in tile.iter_mut().enumerate() {
        for (r, row) in rows.iter().enumerate() {
            *column |= ((row >> c) & 1) << r;
        }
    }
    tile
}
