//! Page-oriented monochrome framebuffer mirroring the SSD1306 display RAM.
//!
//! The panel is split into pages of 8 pixel rows. Each page is a run of
//! `width` bytes, one per pixel column, and within a byte bit 0 is the top
//! pixel of the strip and bit 7 the bottom. Eight consecutive bytes of a page
//! form one 8x8 tile, so tile `(col, row)` starts at `row * width + col * 8`.

use crate::{Error, Result, DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_HEIGHT, MAX_WIDTH, TILE_SIZE};

/// An 8x8 bitmap in column-major layout: one byte per pixel column, bit 0 on top.
pub type Tile = [u8; 8];

/// Bytes per tile.
pub const TILE_BYTES: usize = 8;

/// Monochrome framebuffer holding only background content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    /// Page-ordered display bytes.
    data: Vec<u8>,
    /// Width in pixels.
    width: u16,
    /// Height in pixels.
    height: u16,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Creates a blank framebuffer for the default 128x64 panel.
    pub fn new() -> Self {
        Self {
            data: vec![0; DISPLAY_WIDTH as usize * DISPLAY_HEIGHT as usize / 8],
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
        }
    }

    /// Creates a blank framebuffer with custom dimensions.
    ///
    /// Both dimensions must be non-zero multiples of 8 within the controller's
    /// 128x64 address space.
    pub fn with_dimensions(width: u16, height: u16) -> Result<Self> {
        let valid = width > 0
            && height > 0
            && width % TILE_SIZE == 0
            && height % TILE_SIZE == 0
            && width <= MAX_WIDTH
            && height <= MAX_HEIGHT;
        if !valid {
            return Err(Error::InvalidDimensions { width, height });
        }

        Ok(Self {
            data: vec![0; width as usize * height as usize / 8],
            width,
            height,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of tile columns across the panel.
    pub fn tile_columns(&self) -> u8 {
        (self.width / TILE_SIZE) as u8
    }

    /// Number of 8-row pages down the panel.
    pub fn page_count(&self) -> u8 {
        (self.height / TILE_SIZE) as u8
    }

    /// Returns the raw page-ordered bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sets every pixel on (`white`) or off.
    pub fn fill(&mut self, white: bool) {
        self.data.fill(if white { 0xFF } else { 0x00 });
    }

    /// Replaces the whole buffer with page-ordered bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.data.len() {
            return Err(Error::FramebufferSize {
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        self.data.copy_from_slice(data);
        Ok(())
    }

    fn tile_offset(&self, col: u8, row: u8) -> usize {
        row as usize * self.width as usize + col as usize * TILE_BYTES
    }

    fn check_tile(&self, col: u8, row: u8) -> Result<()> {
        if col >= self.tile_columns() || row >= self.page_count() {
            return Err(Error::TileOutOfRange { col, row });
        }
        Ok(())
    }

    /// Validates a rectangular tile region.
    ///
    /// Empty regions are rejected since they have no addressing window.
    pub fn check_region(&self, col: u8, row: u8, num_cols: u8, num_rows: u8) -> Result<()> {
        let fits = num_cols > 0
            && num_rows > 0
            && (col as u16 + num_cols as u16) <= u16::from(self.tile_columns())
            && (row as u16 + num_rows as u16) <= u16::from(self.page_count());
        if !fits {
            return Err(Error::RegionOutOfRange {
                col,
                row,
                num_cols,
                num_rows,
            });
        }
        Ok(())
    }

    /// Overwrites the tile at `(col, row)` with `tile`.
    pub fn write_tile(&mut self, tile: &Tile, col: u8, row: u8) -> Result<()> {
        self.check_tile(col, row)?;
        let start = self.tile_offset(col, row);
        self.data[start..start + TILE_BYTES].copy_from_slice(tile);
        Ok(())
    }

    /// Reads back the tile stored at `(col, row)`.
    pub fn read_tile(&self, col: u8, row: u8) -> Result<Tile> {
        self.check_tile(col, row)?;
        Ok(self.tile_at(col, row))
    }

    /// Unchecked tile read; callers validate coordinates first.
    pub(crate) fn tile_at(&self, col: u8, row: u8) -> Tile {
        let start = self.tile_offset(col, row);
        let mut tile = [0u8; TILE_BYTES];
        tile.copy_from_slice(&self.data[start..start + TILE_BYTES]);
        tile
    }

    /// Copies a tile region out in row-major tile order, 8 bytes per tile.
    ///
    /// This matches the order the controller fills a window whose column
    /// range spans `num_cols * 8` pixels.
    pub fn extract_region(&self, col: u8, row: u8, num_cols: u8, num_rows: u8) -> Result<Vec<u8>> {
        self.check_region(col, row, num_cols, num_rows)?;

        let run = num_cols as usize * TILE_BYTES;
        let mut region = Vec::with_capacity(run * num_rows as usize);
        for r in row..row + num_rows {
            // Adjacent tiles of one page are contiguous in the buffer.
            let start = self.tile_offset(col, r);
            region.extend_from_slice(&self.data[start..start + run]);
        }
        Ok(region)
    }

    /// Returns whether the pixel at `(x, y)` is lit.
    pub fn pixel(&self, x: u16, y: u16) -> Option<bool> {
        if x < self.width && y < self.height {
            let idx = (y / 8) as usize * self.width as usize + x as usize;
            Some(self.data[idx] >> (y % 8) & 1 == 1)
        } else {
            None
        }
    }

    /// Expands the buffer to one luma byte per pixel (row-major, 0 or 255).
    pub fn to_luma8(&self) -> Vec<u8> {
        let mut luma = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let lit = self.pixel(x, y).unwrap_or(false);
                luma.push(if lit { 255 } else { 0 });
            }
        }
        luma
    }

    /// Encodes the buffer as an 8-bit grayscale PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let luma = self.to_luma8();
        let mut png_data = Vec::new();
        {
            let mut encoder =
                png::Encoder::new(&mut png_data, self.width as u32, self.height as u32);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&luma)?;
        }
        Ok(png_data)
    }
}

/// Parses 8 hex bytes (e.g. `"FF,00,0x3C ..."`) into a tile.
pub fn parse_tile(text: &str) -> Result<Tile> {
    let bytes = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            let digits = s.trim_start_matches("0x").trim_start_matches("0X");
            u8::from_str_radix(digits, 16).map_err(|_| Error::InvalidTile(s.to_string()))
        })
        .collect::<Result<Vec<u8>>>()?;

    let tile: Tile = bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidTile(format!("expected 8 bytes, got {}", bytes.len())))?;
    Ok(tile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let fb = Framebuffer::new();
        assert_eq!(fb.width(), 128);
        assert_eq!(fb.height(), 64);
        assert_eq!(fb.tile_columns(), 16);
        assert_eq!(fb.page_count(), 8);
        assert_eq!(fb.data().len(), 1024);

        let fb = Framebuffer::with_dimensions(128, 32).unwrap();
        assert_eq!(fb.page_count(), 4);
        assert_eq!(fb.data().len(), 512);

        assert!(Framebuffer::with_dimensions(0, 64).is_err());
        assert!(Framebuffer::with_dimensions(100, 64).is_err());
        assert!(Framebuffer::with_dimensions(128, 72).is_err());
        assert!(matches!(
            Framebuffer::with_dimensions(136, 64),
            Err(Error::InvalidDimensions {
                width: 136,
                height: 64
            })
        ));
    }

    #[test]
    fn test_tile_round_trip() {
        let mut fb = Framebuffer::new();
        let tile = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];
        for row in 0..fb.page_count() {
            for col in 0..fb.tile_columns() {
                fb.write_tile(&tile, col, row).unwrap();
                assert_eq!(fb.read_tile(col, row).unwrap(), tile);
            }
        }
    }

    #[test]
    fn test_tile_layout() {
        let mut fb = Framebuffer::new();
        let tile = [1, 2, 3, 4, 5, 6, 7, 8];
        fb.write_tile(&tile, 3, 2).unwrap();
        let start = 2 * 128 + 3 * 8;
        assert_eq!(&fb.data()[start..start + 8], &tile);
        assert_eq!(fb.data().iter().filter(|&&b| b != 0).count(), 8);
    }

    #[test]
    fn test_tile_out_of_range() {
        let mut fb = Framebuffer::new();
        let before = fb.clone();
        assert!(matches!(
            fb.write_tile(&[0xFF; 8], 16, 0),
            Err(Error::TileOutOfRange { col: 16, row: 0 })
        ));
        assert!(fb.write_tile(&[0xFF; 8], 0, 8).is_err());
        assert!(fb.read_tile(16, 8).is_err());
        assert_eq!(fb, before);
    }

    #[test]
    fn test_extract_region_order() {
        let mut fb = Framebuffer::new();
        for (i, (col, row)) in [(4, 1), (5, 1), (4, 2), (5, 2)].into_iter().enumerate() {
            fb.write_tile(&[i as u8 + 1; 8], col, row).unwrap();
        }

        let region = fb.extract_region(4, 1, 2, 2).unwrap();
        assert_eq!(region.len(), 32);
        for (i, chunk) in region.chunks_exact(8).enumerate() {
            assert_eq!(chunk, &[i as u8 + 1; 8]);
        }
    }

    #[test]
    fn test_region_bounds() {
        let fb = Framebuffer::new();
        assert!(fb.check_region(0, 0, 16, 8).is_ok());
        assert!(fb.check_region(15, 7, 1, 1).is_ok());
        assert!(fb.check_region(15, 0, 2, 1).is_err());
        assert!(fb.check_region(0, 7, 1, 2).is_err());
        assert!(fb.check_region(0, 0, 0, 1).is_err());
        assert!(fb.check_region(250, 0, 10, 1).is_err());
    }

    #[test]
    fn test_pixel_bit_order() {
        let mut fb = Framebuffer::new();
        // Column 0 of tile (1, 1): only the top pixel; column 1: only the bottom.
        fb.write_tile(&[0x01, 0x80, 0, 0, 0, 0, 0, 0], 1, 1).unwrap();
        assert_eq!(fb.pixel(8, 8), Some(true));
        assert_eq!(fb.pixel(8, 9), Some(false));
        assert_eq!(fb.pixel(9, 15), Some(true));
        assert_eq!(fb.pixel(9, 8), Some(false));
        assert_eq!(fb.pixel(128, 0), None);
    }

    #[test]
    fn test_fill_and_load() {
        let mut fb = Framebuffer::new();
        fb.fill(true);
        assert!(fb.data().iter().all(|&b| b == 0xFF));
        fb.fill(false);
        assert!(fb.data().iter().all(|&b| b == 0x00));

        let raw = vec![0xA5; 1024];
        fb.load(&raw).unwrap();
        assert_eq!(fb.data(), raw.as_slice());
        assert!(matches!(
            fb.load(&[0; 10]),
            Err(Error::FramebufferSize {
                expected: 1024,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_luma_and_png() {
        let mut fb = Framebuffer::with_dimensions(16, 8).unwrap();
        fb.write_tile(&[0x01; 8], 0, 0).unwrap();
        let luma = fb.to_luma8();
        assert_eq!(luma.len(), 128);
        assert_eq!(&luma[0..8], &[255; 8]);
        assert_eq!(&luma[8..16], &[0; 8]);
        assert_eq!(&luma[16..24], &[0; 8]);

        let png_data = fb.encode_png().unwrap();
        assert_eq!(&png_data[1..4], b"PNG");
    }

    #[test]
    fn test_parse_tile() {
        assert_eq!(
            parse_tile("FF,00,00,00,00,00,00,FF").unwrap(),
            [0xFF, 0, 0, 0, 0, 0, 0, 0xFF]
        );
        assert_eq!(
            parse_tile("0x01 0x02 0x03 0x04 0x05 0x06 0x07 0x08").unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert!(parse_tile("FF,00").is_err());
        assert!(parse_tile("GG,00,00,00,00,00,00,00").is_err());
    }
}
