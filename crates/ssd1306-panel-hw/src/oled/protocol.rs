//! SSD1306 command set and packet encoding.
//!
//! Every bus write starts with a control byte:
//! - 0x00: the remaining bytes are commands (and their parameters)
//! - 0x40: the remaining bytes are display RAM data
//!
//! Data lands in the addressing window most recently set with the page and
//! column address commands, filled page by page, left to right.

use crate::orientation::Orientation;

/// Control byte preceding a command stream.
pub const CONTROL_MARKER: u8 = 0x00;

/// Control byte preceding a display RAM data stream.
pub const DATA_MARKER: u8 = 0x40;

/// Size of a window packet (two control-prefixed address range commands).
pub const WINDOW_PACKET_SIZE: usize = 8;

/// Size of a single command packet.
pub const COMMAND_PACKET_SIZE: usize = 2;

/// Size of the vertical offset packet.
pub const OFFSET_PACKET_SIZE: usize = 3;

/// SSD1306 command opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Set horizontal/vertical/page addressing mode (1 parameter).
    MemoryMode = 0x20,
    /// Set column address range (2 parameters).
    SetColumnAddress = 0x21,
    /// Set page address range (2 parameters).
    SetPageAddress = 0x22,
    /// Set display start line (low 6 bits ORed in).
    SetStartLine = 0x40,
    /// Set contrast (1 parameter).
    SetContrast = 0x81,
    /// Charge pump setting (1 parameter).
    ChargePump = 0x8D,
    /// Segment remap (bit 0 mirrors columns).
    SegmentRemap = 0xA0,
    /// Display output follows RAM contents.
    OutputFollowsRam = 0xA4,
    /// Display output lights every pixel, ignoring RAM.
    OutputIgnoresRam = 0xA5,
    /// Non-inverted display.
    NormalDisplay = 0xA6,
    /// Inverted display.
    InverseDisplay = 0xA7,
    /// Multiplex ratio (1 parameter).
    SetMultiplex = 0xA8,
    /// Display off (sleep).
    DisplayOff = 0xAE,
    /// Display on.
    DisplayOn = 0xAF,
    /// Scan COM outputs from COM0 upwards.
    ComScanInc = 0xC0,
    /// Scan COM outputs from COM[N-1] downwards.
    ComScanDec = 0xC8,
    /// Vertical display offset (1 parameter).
    SetDisplayOffset = 0xD3,
    /// Clock divide ratio / oscillator frequency (1 parameter).
    SetClockDiv = 0xD5,
    /// Pre-charge period (1 parameter).
    SetPrecharge = 0xD9,
    /// COM pins hardware configuration (1 parameter).
    SetComPins = 0xDA,
    /// VCOMH deselect level (1 parameter).
    SetVcomDetect = 0xDB,
}

/// Horizontal addressing mode parameter for [`Command::MemoryMode`].
const HORIZONTAL_ADDRESSING: u8 = 0x00;

/// Charge pump enable parameter for [`Command::ChargePump`].
const CHARGE_PUMP_ON: u8 = 0x14;

/// Builds a single control-prefixed command packet.
pub fn build_command_packet(byte: u8) -> [u8; COMMAND_PACKET_SIZE] {
    [CONTROL_MARKER, byte]
}

/// Builds the packet that bounds the next data transfer to a pixel rectangle.
///
/// Pages are 8-pixel rows; columns are single pixel columns. Both ranges are
/// inclusive.
pub fn build_window_packet(
    page_start: u8,
    page_end: u8,
    col_start: u8,
    col_end: u8,
) -> [u8; WINDOW_PACKET_SIZE] {
    [
        CONTROL_MARKER,
        Command::SetPageAddress as u8,
        page_start,
        page_end,
        CONTROL_MARKER,
        Command::SetColumnAddress as u8,
        col_start,
        col_end,
    ]
}

/// Builds the vertical display offset packet.
pub fn build_offset_packet(rows: u8) -> [u8; OFFSET_PACKET_SIZE] {
    [CONTROL_MARKER, Command::SetDisplayOffset as u8, rows]
}

/// Prefixes a RAM payload with the data marker.
pub fn build_data_packet(payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(1 + payload.len());
    packet.push(DATA_MARKER);
    packet.extend_from_slice(payload);
    packet
}

/// Builds the power-up command stream for a panel of the given height.
///
/// The bytes are sent one per command packet.
pub fn build_init_sequence(height: u16, contrast: u8, orientation: Orientation) -> Vec<u8> {
    // 128x64 modules wire COM pins in alternative mode; shorter ones sequential.
    let com_pins = if height == 64 { 0x12 } else { 0x02 };

    vec![
        Command::DisplayOff as u8,
        Command::SetClockDiv as u8,
        0xF0,
        Command::SetMultiplex as u8,
        (height - 1) as u8,
        Command::SetDisplayOffset as u8,
        0x00,
        Command::SetStartLine as u8,
        Command::ChargePump as u8,
        CHARGE_PUMP_ON,
        Command::MemoryMode as u8,
        HORIZONTAL_ADDRESSING,
        orientation.segment_remap(),
        orientation.com_scan(),
        Command::SetComPins as u8,
        com_pins,
        Command::SetContrast as u8,
        contrast,
        Command::SetPrecharge as u8,
        0xF1,
        Command::SetVcomDetect as u8,
        0x40,
        Command::OutputFollowsRam as u8,
        Command::NormalDisplay as u8,
        Command::DisplayOn as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_packet() {
        let packet = build_window_packet(1, 2, 16, 31);
        assert_eq!(packet, [0x00, 0x22, 1, 2, 0x00, 0x21, 16, 31]);
    }

    #[test]
    fn test_offset_packet() {
        assert_eq!(build_offset_packet(5), [0x00, 0xD3, 5]);
    }

    #[test]
    fn test_data_packet() {
        let packet = build_data_packet(&[0xAA, 0x55]);
        assert_eq!(packet, vec![DATA_MARKER, 0xAA, 0x55]);
    }

    #[test]
    fn test_init_sequence() {
        let seq = build_init_sequence(64, 0xCF, Orientation::Normal);
        assert_eq!(seq.len(), 25);
        assert_eq!(seq.first(), Some(&(Command::DisplayOff as u8)));
        assert_eq!(seq.last(), Some(&(Command::DisplayOn as u8)));
        assert_eq!(seq[4], 63); // multiplex
        assert_eq!(seq[12], 0xA1);
        assert_eq!(seq[13], 0xC8);
        assert_eq!(seq[15], 0x12);
        assert_eq!(seq[17], 0xCF);

        let seq = build_init_sequence(32, 0x80, Orientation::UpsideDown);
        assert_eq!(seq[4], 31);
        assert_eq!(seq[12], 0xA0);
        assert_eq!(seq[13], 0xC0);
        assert_eq!(seq[15], 0x02);
        assert_eq!(seq[17], 0x80);
    }
}
