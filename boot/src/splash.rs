//! Logo step: read, decode and draw the splash bitmap, then caption it

use crate::blit::{self, Placement};
use crate::bmp;
use crate::config::{CAPTION, CAPTION_GAP, GLYPH_HEIGHT, GLYPH_WIDTH, LOGO_FILE_NAME};
use crate::error::{SplashError, Status};
use crate::platform::{Console, DisplayProvider, FileProvider, ReadFile};
use crate::uefi::EFI_DEVICE_ERROR;
use alloc::vec::Vec;
use log::{debug, info, warn};

/// Read all of `name` into memory. The file is closed on every path out.
pub fn read_file<V: FileProvider>(volume: &mut V, name: &str) -> Result<Vec<u8>, SplashError> {
    let mut file = volume.open(name).map_err(SplashError::Open)?;
    let size = file.size().map_err(SplashError::Size)?;

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(size)
        .map_err(|_| SplashError::Allocation(size))?;
    bytes.resize(size, 0);

    file.read_exact(&mut bytes).map_err(SplashError::Read)?;
    debug!("read {} bytes from {}", size, name);

    Ok(bytes)
}

/// Draw the logo and its caption
pub fn show_logo<V, D, C>(
    volume: &mut V,
    display: &mut D,
    console: &mut C,
) -> Result<Placement, SplashError>
where
    V: FileProvider,
    D: DisplayProvider,
    C: Console,
{
    let bytes = read_file(volume, LOGO_FILE_NAME)?;
    let image = bmp::decode(&bytes)?;
    info!("logo {}x{}, {} bytes", image.width(), image.height(), bytes.len());

    let placement = blit::blit(&image, display)?;

    if let Err(status) = draw_caption(console, &placement) {
        warn!("caption not shown: {}", status);
    }

    Ok(placement)
}

/// Text cell (column, row) for `text` centered below the drawn logo,
/// or `None` if that row is off screen
pub fn caption_position(placement: &Placement, text: &str) -> Option<(usize, usize)> {
    let columns = placement.screen.width / GLYPH_WIDTH;
    let rows = placement.screen.height / GLYPH_HEIGHT;

    let rect = &placement.rect;
    let row = (rect.dest_y + rect.height + CAPTION_GAP) / GLYPH_HEIGHT;
    if row >= rows {
        return None;
    }

    let column = columns.saturating_sub(text.chars().count()) / 2;
    Some((column, row))
}

fn draw_caption<C: Console>(console: &mut C, placement: &Placement) -> Result<(), Status> {
    let Some((column, row)) = caption_position(placement, CAPTION) else {
        debug!("no room for caption");
        return Ok(());
    };

    console.set_cursor(column, row)?;
    console
        .write_str(CAPTION)
        .map_err(|_| Status(EFI_DEVICE_ERROR))
}
