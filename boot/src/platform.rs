//! Capabilities the sequencer needs from its environment.
//!
//! `firmware` implements these over the UEFI tables; tests substitute stubs.

use crate::blit::{PixelBuffer, PlacementRect, Resolution};
use crate::error::Status;
use core::fmt;

/// Volume the logo is read from
pub trait FileProvider {
    type File: ReadFile;

    /// Open `name` read-only. The file closes when the handle is dropped.
    fn open(&mut self, name: &str) -> Result<Self::File, Status>;
}

pub trait ReadFile {
    fn size(&mut self) -> Result<usize, Status>;

    /// Fill all of `buffer` or fail
    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), Status>;
}

/// Source of a graphics target
pub trait DisplayProvider {
    type Target: Framebuffer;

    fn acquire(&mut self) -> Result<Self::Target, Status>;
}

pub trait Framebuffer {
    fn resolution(&self) -> Resolution;

    /// Copy `rect` of `pixels` to the screen in one operation
    fn write_region(&mut self, pixels: &PixelBuffer, rect: &PlacementRect) -> Result<(), Status>;
}

/// Loads and starts the second-stage image
pub trait Launcher {
    type Image;

    /// Load the image at `path` on the boot volume
    fn load(&mut self, path: &str) -> Result<Self::Image, Status>;

    /// Transfer control to `image`. Only returns if the image exits or
    /// could not be started.
    fn start(&mut self, image: Self::Image) -> Result<(), Status>;
}

/// Blocking delay primitive
pub trait Timer {
    fn stall(&mut self, micros: u64);

    /// Turn off the platform watchdog so an indefinite wait is not cut short by a reset
    fn disarm_watchdog(&mut self) -> Result<(), Status>;
}

/// Text console
pub trait Console: fmt::Write {
    fn set_cursor(&mut self, column: usize, row: usize) -> Result<(), Status>;
}
