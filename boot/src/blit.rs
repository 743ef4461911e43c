//! Pixel Blitting Module
//!
//! Converts a decoded bitmap into firmware blit pixels, applies the
//! near-white color key, and writes the visible part of the logo to the
//! framebuffer in a single region write.

use crate::bmp::{BitmapDescriptor, BYTES_PER_PIXEL};
use crate::config::{COLOR_KEY_THRESHOLD, LOGO_VERTICAL_DIVISOR};
use crate::error::Status;
use crate::platform::{DisplayProvider, Framebuffer};
use alloc::vec::Vec;
use log::debug;

/// One framebuffer blit pixel, layout-compatible with EFI_GRAPHICS_OUTPUT_BLT_PIXEL
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel { blue: 0, green: 0, red: 0, reserved: 0 };

    pub const fn from_bgr(blue: u8, green: u8, red: u8) -> Pixel {
        Pixel { blue, green, red, reserved: 0 }
    }
}

/// Display size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

/// Visible part of the logo: where it lands on screen and where it starts
/// inside the pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementRect {
    pub dest_x: usize,
    pub dest_y: usize,
    pub src_x: usize,
    pub src_y: usize,
    pub width: usize,
    pub height: usize,
}

impl PlacementRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Result of a successful blit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub screen: Resolution,
    pub rect: PlacementRect,
}

/// Logo converted to blit pixels, top row first
#[derive(Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y.checked_mul(self.width)?.checked_add(x)?).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlitError {
    #[error("no graphics output available: {0}")]
    NoGraphicsTarget(Status),
    #[error("cannot allocate a {width}x{height} pixel buffer")]
    AllocationFailed { width: usize, height: usize },
    #[error("framebuffer rejected the write: {0}")]
    WriteFailed(Status),
}

/// Map one file pixel to a blit pixel; near-white becomes black
pub fn color_key(blue: u8, green: u8, red: u8) -> Pixel {
    if blue >= COLOR_KEY_THRESHOLD && green >= COLOR_KEY_THRESHOLD && red >= COLOR_KEY_THRESHOLD {
        Pixel::BLACK
    } else {
        Pixel::from_bgr(blue, green, red)
    }
}

/// Convert every pixel of `image` into a freshly allocated buffer
pub fn convert(image: &BitmapDescriptor<'_>) -> Result<PixelBuffer, BlitError> {
    let (width, height) = (image.width(), image.height());
    let failed = BlitError::AllocationFailed { width, height };

    let count = width.checked_mul(height).ok_or(failed)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count).map_err(|_| failed)?;

    for row in image.rows() {
        pixels.extend(
            row.chunks_exact(BYTES_PER_PIXEL)
                .map(|bgr| color_key(bgr[0], bgr[1], bgr[2])),
        );
    }

    Ok(PixelBuffer { width, height, pixels })
}

/// Center horizontally, put the top edge at `(screen_h - h) / LOGO_VERTICAL_DIVISOR`,
/// and clip to the screen
pub fn place(width: usize, height: usize, screen: Resolution) -> PlacementRect {
    let origin_x = (to_i64(screen.width) - to_i64(width)) / 2;
    let origin_y = (to_i64(screen.height) - to_i64(height)) / LOGO_VERTICAL_DIVISOR;

    let (dest_x, src_x, visible_w) = clip(origin_x, width, screen.width);
    let (dest_y, src_y, visible_h) = clip(origin_y, height, screen.height);

    PlacementRect {
        dest_x,
        dest_y,
        src_x,
        src_y,
        width: visible_w,
        height: visible_h,
    }
}

/// Clip the span `[origin, origin + len)` to `[0, limit)`.
/// Returns (destination start, offset into the span, visible length).
fn clip(origin: i64, len: usize, limit: usize) -> (usize, usize, usize) {
    let start = origin.max(0);
    let end = origin.saturating_add(to_i64(len)).min(to_i64(limit));
    if end <= start {
        return (0, 0, 0);
    }
    (start as usize, (start - origin) as usize, (end - start) as usize)
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Draw `image` on the display handed out by `display`
pub fn blit<D: DisplayProvider>(
    image: &BitmapDescriptor<'_>,
    display: &mut D,
) -> Result<Placement, BlitError> {
    let mut target = display.acquire().map_err(BlitError::NoGraphicsTarget)?;
    let screen = target.resolution();

    let buffer = convert(image)?;
    let rect = place(buffer.width(), buffer.height(), screen);
    debug!(
        "logo {}x{} on {}x{} screen at ({}, {}), visible {}x{}",
        buffer.width(),
        buffer.height(),
        screen.width,
        screen.height,
        rect.dest_x,
        rect.dest_y,
        rect.width,
        rect.height,
    );

    if rect.is_empty() {
        return Ok(Placement { screen, rect });
    }

    let written = target.write_region(&buffer, &rect);
    drop(buffer);

    written
        .map(|()| Placement { screen, rect })
        .map_err(BlitError::WriteFailed)
}
