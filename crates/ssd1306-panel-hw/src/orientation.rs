//! Display orientation support.
//!
//! The controller mirrors both axes in hardware: segment remap flips X and the
//! COM scan direction flips Y. Flipping both gives a 180° rotation with no
//! software work on the framebuffer.

use crate::oled::protocol::Command;
use crate::{Error, Result};
use std::str::FromStr;

/// Display orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Column 0 on the left, page 0 at the top.
    #[default]
    Normal,
    /// Rotated 180° (both axes mirrored).
    UpsideDown,
}

impl Orientation {
    /// Returns the segment remap command byte.
    pub fn segment_remap(&self) -> u8 {
        match self {
            Orientation::Normal => Command::SegmentRemap as u8 | 0x01,
            Orientation::UpsideDown => Command::SegmentRemap as u8,
        }
    }

    /// Returns the COM output scan direction command byte.
    pub fn com_scan(&self) -> u8 {
        match self {
            Orientation::Normal => Command::ComScanDec as u8,
            Orientation::UpsideDown => Command::ComScanInc as u8,
        }
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Orientation::Normal),
            "upside-down" | "upside_down" | "flipped" => Ok(Orientation::UpsideDown),
            _ => Err(Error::InvalidOrientation(s.to_string())),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Normal => write!(f, "normal"),
            Orientation::UpsideDown => write!(f, "upside-down"),
        }
    }
}
