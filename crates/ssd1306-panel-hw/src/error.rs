//! Error types for the SSD1306 panel hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when compositing or talking to the panel.
#[derive(Error, Debug)]
pub enum Error {
    /// Bus I/O error (open, address bind, or write).
    #[error("Bus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport accepted fewer bytes than requested.
    #[error("Short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    /// Tile coordinates outside the panel.
    #[error("Tile ({col}, {row}) is outside the panel")]
    TileOutOfRange { col: u8, row: u8 },

    /// Tile region empty or extending past the panel.
    #[error("Region {num_cols}x{num_rows} at tile ({col}, {row}) is outside the panel")]
    RegionOutOfRange {
        col: u8,
        row: u8,
        num_cols: u8,
        num_rows: u8,
    },

    /// Sprite quad would extend past the last tile column or page.
    #[error("Sprite at ({x}, {y}) needs a 2x2 tile quad outside the panel")]
    SpriteOutOfRange { x: u8, y: u8 },

    /// Panel geometry the controller cannot drive.
    #[error("Invalid panel dimensions {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    /// Invalid orientation value.
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),

    /// Tile bitmap text that is not 8 hex bytes.
    #[error("Invalid tile bitmap: {0}")]
    InvalidTile(String),

    /// Framebuffer size mismatch.
    #[error("Framebuffer size mismatch: expected {expected}, got {actual}")]
    FramebufferSize { expected: usize, actual: usize },

    /// PNG encoding error.
    #[error("PNG error: {0}")]
    Png(#[from] png::EncodingError),
}
