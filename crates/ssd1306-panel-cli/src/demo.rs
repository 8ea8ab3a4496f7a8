//! Panel self-test: exercises every drawing path with visible patterns.
//!
//! Transmission failures are logged and the routine carries on, so a flaky
//! bus shows up as dropped frames rather than an aborted run.

use ssd1306_panel_hw::{OledDevice, Tile, Transport};
use std::thread::sleep;
use std::time::Duration;
use tracing::{info, warn};

/// Letter "A" in column-major layout.
pub const SPRITE_A: Tile = [
    0b0000_0000,
    0b1111_1100,
    0b0001_0010,
    0b0001_0001,
    0b0001_0001,
    0b0001_0010,
    0b1111_1100,
    0b0000_0000,
];

/// Corner tiles of a framed 16x16 box: top-left, top-right, bottom-left, bottom-right.
const QUAD_FRAME: [Tile; 4] = [
    [0xFF, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01],
    [0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0xFF],
    [0xFF, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80],
    [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xFF],
];

/// Diagonal start position of the walking sprite.
const WALK_START: u8 = 39;

fn report(result: ssd1306_panel_hw::Result<()>, what: &str) {
    if let Err(e) = result {
        warn!("Demo {} failed: {}", what, e);
    }
}

/// Runs the full demo; `step` paces the animated parts.
pub fn run<T: Transport>(dev: &mut OledDevice<T>, step: Duration) {
    flash(dev);
    sweep_window(dev, step);
    tile_map(dev);
    scroll(dev, step);
    quad_frames(dev);
    walk_sprite(dev, step);

    sleep(Duration::from_secs(1));
    dev.fill(false);
    report(dev.transmit_full(), "final clear");
    info!("Demo finished");
}

fn flash<T: Transport>(dev: &mut OledDevice<T>) {
    info!("Flashing full screen");
    for _ in 0..4 {
        dev.fill(true);
        report(dev.transmit_full(), "flash");
        dev.fill(false);
        report(dev.transmit_full(), "flash");
    }
}

fn sweep_window<T: Transport>(dev: &mut OledDevice<T>, step: Duration) {
    info!("Sweeping a partial window");
    for i in 0..4u8 {
        dev.fill(true);
        report(dev.transmit_region(i + 3, i + 1, 4, 3), "sweep");
        sleep(step);
        dev.fill(false);
        report(dev.transmit_region(i + 3, i + 1, 4, 3), "sweep");
    }
    dev.fill(true);
    report(dev.transmit_region(7, 5, 4, 3), "sweep");
    sleep(Duration::from_secs(1));
}

fn tile_map<T: Transport>(dev: &mut OledDevice<T>) {
    info!("Drawing tile map");
    let (cols, rows) = {
        let fb = dev.framebuffer();
        (fb.tile_columns(), fb.page_count())
    };
    for row in 0..rows {
        for col in 0..cols {
            report(dev.write_tile(&SPRITE_A, col, row), "tile map");
        }
    }
    report(dev.transmit_full(), "tile map");
}

fn scroll<T: Transport>(dev: &mut OledDevice<T>, step: Duration) {
    info!("Scrolling one page");
    for rows in 0..8 {
        report(dev.set_vertical_offset(rows), "scroll");
        sleep(step * 8);
    }
    report(dev.set_vertical_offset(0), "scroll");
}

fn quad_frames<T: Transport>(dev: &mut OledDevice<T>) {
    info!("Drawing quad frames");
    let (cols, rows) = {
        let fb = dev.framebuffer();
        (fb.tile_columns(), fb.page_count())
    };
    for row in (0..rows.saturating_sub(1)).step_by(2) {
        for col in (0..cols.saturating_sub(1)).step_by(2) {
            report(dev.write_tile(&QUAD_FRAME[0], col, row), "quad");
            report(dev.write_tile(&QUAD_FRAME[1], col + 1, row), "quad");
            report(dev.write_tile(&QUAD_FRAME[2], col, row + 1), "quad");
            report(dev.write_tile(&QUAD_FRAME[3], col + 1, row + 1), "quad");
            report(dev.transmit_region(col, row, 2, 2), "quad");
        }
    }
    report(dev.write_tile(&SPRITE_A, 1, 1), "quad");
    report(dev.transmit_region(1, 1, 1, 1), "quad");
}

fn walk_sprite<T: Transport>(dev: &mut OledDevice<T>, step: Duration) {
    info!("Walking a sprite diagonally");
    let mut pos = WALK_START;
    report(dev.composite_sprite(&SPRITE_A, pos, pos), "sprite");
    while pos > 1 {
        sleep(step);
        report(dev.clear_sprite(pos, pos), "sprite clear");
        pos -= 1;
        report(dev.composite_sprite(&SPRITE_A, pos, pos), "sprite");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssd1306_panel_hw::{Framebuffer, RecordingTransport};

    #[test]
    fn test_walk_restores_background() {
        let mut dev = OledDevice::new(RecordingTransport::new(), Framebuffer::new());
        quad_frames(&mut dev);
        let background = dev.framebuffer().clone();

        walk_sprite(&mut dev, Duration::ZERO);

        assert_eq!(dev.framebuffer(), &background);
        let last = dev.transport().packets().last().unwrap();
        assert_eq!(last.len(), 33);
    }

    #[test]
    fn test_quad_frames_cover_panel() {
        let mut dev = OledDevice::new(RecordingTransport::new(), Framebuffer::new());
        quad_frames(&mut dev);
        assert_eq!(dev.read_tile(0, 0).unwrap(), QUAD_FRAME[0]);
        assert_eq!(dev.read_tile(15, 7).unwrap(), QUAD_FRAME[3]);
        assert_eq!(dev.read_tile(1, 1).unwrap(), SPRITE_A);
        // 32 quads plus the single tile, each a window and a data packet.
        assert_eq!(dev.transport().packets().len(), 66);
    }

    #[test]
    fn test_failures_do_not_abort() {
        let mut dev = OledDevice::new(RecordingTransport::new().fail_from(0), Framebuffer::new());
        tile_map(&mut dev);
        // Only the window went out; the buffer still holds the map.
        assert_eq!(dev.transport().packets().len(), 1);
        assert_eq!(dev.read_tile(7, 3).unwrap(), SPRITE_A);
    }
}
