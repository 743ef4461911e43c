//! Build-time configuration.
//!
//! The chainloader reads no environment and persists nothing; every tunable
//! lives here.

use log::LevelFilter;

/// Logo bitmap, at the root of the volume this image was loaded from
pub const LOGO_FILE_NAME: &str = "nekologo.bmp";

/// Second-stage loader on the same volume
pub const CHAINLOAD_PATH: &str = "\\EFI\\Microsoft\\Boot\\bootmgfw.efi";

/// How long the logo stays up before chainloading
pub const LOGO_HOLD_MICROS: u64 = 10 * 1000 * 1000;

/// Stall interval of the halt loop after a fatal error
pub const HALT_STALL_MICROS: u64 = 500 * 1000;

/// Color key: a pixel whose blue, green and red are all at least this value
/// is drawn black.
pub const COLOR_KEY_THRESHOLD: u8 = 241;

/// Logo top edge sits at `(screen_h - logo_h) / LOGO_VERTICAL_DIVISOR`
pub const LOGO_VERTICAL_DIVISOR: i64 = 3;

/// Text shown under the logo
pub const CAPTION: &str = "Booting up Neko OS...";

/// Vertical gap between the logo and its caption, in pixels
pub const CAPTION_GAP: usize = 20;

/// Firmware text console cell size
pub const GLYPH_WIDTH: usize = 8;
pub const GLYPH_HEIGHT: usize = 16;

pub const LAUNCH_MESSAGE: &str = "Launching Windows...\r\n";
pub const FAILURE_MESSAGE: &str = "Failed to boot Windows. Error: ";

/// COM1, where log records go
pub const SERIAL_PORT_BASE: u16 = 0x3F8;

pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;
