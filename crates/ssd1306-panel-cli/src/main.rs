//! SSD1306 Panel Control Tool
//!
//! CLI for drawing on an SSD1306 OLED panel over Linux i2c-dev.

mod config;
mod demo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ssd1306_panel_hw::oled::{parse_tile, tile_from_rows};
use ssd1306_panel_hw::{Framebuffer, OledDevice, Orientation, RecordingTransport, Tile, Transport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "ssd1306ctl")]
#[command(about = "Control tool for SSD1306 OLED panels")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log packets instead of writing to the bus
    #[arg(long)]
    dry_run: bool,

    /// Save the background framebuffer as PNG after the command
    #[arg(long)]
    screenshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Power up the panel and blank it
    Init,
    /// Fill the whole panel
    Fill {
        /// Light every pixel instead of clearing
        #[arg(long)]
        white: bool,
    },
    /// Draw a tile at a tile-grid position
    Tile {
        /// Tile column
        col: u8,
        /// Page (tile row)
        row: u8,
        /// Eight hex bytes, e.g. "FF,00,00,00,00,00,00,FF"
        bitmap: String,
        /// Bitmap is row-major (font layout) and needs converting
        #[arg(long)]
        rows: bool,
    },
    /// Overlay a sprite at a pixel position without changing the background
    Sprite {
        /// Pixel column
        x: u8,
        /// Pixel row
        y: u8,
        /// Eight hex bytes
        bitmap: String,
        /// Bitmap is row-major (font layout) and needs converting
        #[arg(long)]
        rows: bool,
    },
    /// Restore the background under a sprite position
    ClearSprite {
        /// Pixel column
        x: u8,
        /// Pixel row
        y: u8,
    },
    /// Send a raw page-ordered framebuffer dump
    Load {
        /// File holding width * height / 8 bytes
        path: PathBuf,
    },
    /// Shift the displayed image vertically
    Scroll {
        /// Pixel rows (0-63)
        rows: u8,
    },
    /// Set display orientation
    Orientation {
        /// Orientation: normal, upside-down
        orientation: String,
    },
    /// Set panel contrast
    Contrast {
        /// Contrast level (0-255)
        level: u8,
    },
    /// Invert every displayed pixel
    Invert {
        /// Restore normal (non-inverted) output
        #[arg(long)]
        off: bool,
    },
    /// Turn the panel on or put it to sleep
    Power {
        /// Put the panel to sleep (display RAM is kept)
        #[arg(long)]
        off: bool,
    },
    /// Run the panel self-test
    Demo {
        /// Animation step in milliseconds
        #[arg(long, default_value = "16")]
        step: u64,
    },
    /// Convert a row-major bitmap to the panel's column-major tile layout
    Convert {
        /// Eight hex bytes
        bitmap: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Conversion never touches the panel
    if let Commands::Convert { bitmap } = &cli.command {
        return convert(bitmap);
    }

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path).context("Failed to load configuration")?;
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => Config::default(),
    };
    config.dry_run |= cli.dry_run;

    let orientation: Orientation = config
        .orientation
        .parse()
        .context("Invalid orientation in configuration")?;
    let framebuffer = Framebuffer::with_dimensions(config.width, config.height)
        .context("Invalid panel dimensions in configuration")?;
    let transport = open_transport(&config)?;

    let mut dev = OledDevice::new(transport, framebuffer).with_orientation(orientation);

    handle_command(cli.command, &mut dev, &config)?;

    if let Some(path) = cli.screenshot {
        let png_data = dev.framebuffer().encode_png()?;
        std::fs::write(&path, &png_data).context("Failed to write screenshot file")?;
        println!("Screenshot saved to: {}", path.display());
    }

    Ok(())
}

fn open_transport(config: &Config) -> Result<Box<dyn Transport>> {
    if config.dry_run {
        info!("Dry run: packets are logged, not sent");
        return Ok(Box::new(RecordingTransport::new()));
    }
    open_bus(config)
}

#[cfg(target_os = "linux")]
fn open_bus(config: &Config) -> Result<Box<dyn Transport>> {
    let transport = ssd1306_panel_hw::I2cTransport::open(&config.bus, config.address)
        .with_context(|| format!("Failed to open I2C bus {}", config.bus))?;
    Ok(Box::new(transport))
}

#[cfg(not(target_os = "linux"))]
fn open_bus(_config: &Config) -> Result<Box<dyn Transport>> {
    anyhow::bail!("I2C access needs Linux i2c-dev; use --dry-run")
}

fn read_bitmap(text: &str, rows: bool) -> Result<Tile> {
    let tile = parse_tile(text)?;
    Ok(if rows { tile_from_rows(&tile) } else { tile })
}

fn handle_command<T: Transport>(
    command: Commands,
    dev: &mut OledDevice<T>,
    config: &Config,
) -> Result<()> {
    match command {
        Commands::Init => {
            dev.init(config.contrast)?;
            println!("Panel initialised");
        }
        Commands::Fill { white } => {
            dev.fill(white);
            dev.transmit_full()?;
            println!("Panel filled {}", if white { "white" } else { "black" });
        }
        Commands::Tile {
            col,
            row,
            bitmap,
            rows,
        } => {
            let tile = read_bitmap(&bitmap, rows)?;
            dev.write_tile(&tile, col, row)?;
            dev.transmit_region(col, row, 1, 1)?;
            debug!("Tile {} at ({}, {})", format_tile(&tile), col, row);
        }
        Commands::Sprite { x, y, bitmap, rows } => {
            let sprite = read_bitmap(&bitmap, rows)?;
            dev.composite_sprite(&sprite, x, y)?;
        }
        Commands::ClearSprite { x, y } => {
            dev.clear_sprite(x, y)?;
        }
        Commands::Load { path } => {
            let data = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            dev.load(&data)?;
            dev.transmit_full()?;
            println!("Loaded {} bytes", data.len());
        }
        Commands::Scroll { rows } => {
            dev.set_vertical_offset(rows)?;
            println!("Vertical offset set to: {}", rows);
        }
        Commands::Orientation { orientation } => {
            let orientation: Orientation = orientation.parse()?;
            dev.set_orientation(orientation)?;
            println!("Orientation set to: {}", orientation);
        }
        Commands::Contrast { level } => {
            dev.set_contrast(level)?;
            println!("Contrast set to: {}", level);
        }
        Commands::Invert { off } => {
            dev.set_inverted(!off)?;
            println!("Inversion {}", if off { "off" } else { "on" });
        }
        Commands::Power { off } => {
            dev.set_display_on(!off)?;
            println!("Panel {}", if off { "asleep" } else { "on" });
        }
        Commands::Demo { step } => {
            dev.init(config.contrast)?;
            demo::run(dev, Duration::from_millis(step));
        }
        Commands::Convert { bitmap } => convert(&bitmap)?,
    }

    Ok(())
}

fn convert(bitmap: &str) -> Result<()> {
    let tile = tile_from_rows(&parse_tile(bitmap)?);
    println!("{}", format_tile(&tile));
    Ok(())
}

fn format_tile(tile: &Tile) -> String {
    tile.iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(", ")
}
