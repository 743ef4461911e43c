//! UEFI Graphics Output Protocol

use super::{EFI_GUID, EFI_STATUS};

/// Graphics Output Protocol GUID: 9042A9DE-23DC-4A38-96FB-7ADED080516A
pub const GRAPHICS_OUTPUT_PROTOCOL_GUID: EFI_GUID = EFI_GUID {
    data1: 0x9042a9de,
    data2: 0x23dc,
    data3: 0x4a38,
    data4: [0x96, 0xfb, 0x7a, 0xde, 0xd0, 0x80, 0x51, 0x6a],
};

/// Blt pixel, always blue/green/red/reserved regardless of the mode's pixel format
pub type EFI_GRAPHICS_OUTPUT_BLT_PIXEL = crate::blit::Pixel;

/// Blt operation copying a caller buffer to the screen
pub const EFI_BLT_BUFFER_TO_VIDEO: u32 = 2;

/// Channel masks, only meaningful for bit-mask pixel formats
#[repr(C)]
#[derive(Copy, Clone)]
pub struct EFI_PIXEL_BITMASK {
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub reserved_mask: u32,
}

/// Mode information for one video mode
#[repr(C)]
pub struct EFI_GRAPHICS_OUTPUT_MODE_INFORMATION {
    pub version: u32,
    pub horizontal_resolution: u32,
    pub vertical_resolution: u32,
    pub pixel_format: u32,
    pub pixel_information: EFI_PIXEL_BITMASK,
    pub pixels_per_scan_line: u32,
}

/// Current mode of the graphics device
#[repr(C)]
pub struct EFI_GRAPHICS_OUTPUT_PROTOCOL_MODE {
    pub max_mode: u32,
    pub mode: u32,
    pub info: *mut EFI_GRAPHICS_OUTPUT_MODE_INFORMATION,
    pub size_of_info: usize,
    pub frame_buffer_base: u64,
    pub frame_buffer_size: usize,
}

/// UEFI Graphics Output Protocol
#[repr(C)]
pub struct EFI_GRAPHICS_OUTPUT_PROTOCOL {
    pub query_mode: extern "efiapi" fn(
        this: *mut EFI_GRAPHICS_OUTPUT_PROTOCOL,
        mode_number: u32,
        size_of_info: *mut usize,
        info: *mut *mut EFI_GRAPHICS_OUTPUT_MODE_INFORMATION,
    ) -> EFI_STATUS,

    pub set_mode: extern "efiapi" fn(
        this: *mut EFI_GRAPHICS_OUTPUT_PROTOCOL,
        mode_number: u32,
    ) -> EFI_STATUS,

    pub blt: extern "efiapi" fn(
        this: *mut EFI_GRAPHICS_OUTPUT_PROTOCOL,
        blt_buffer: *mut EFI_GRAPHICS_OUTPUT_BLT_PIXEL,
        blt_operation: u32,
        source_x: usize,
        source_y: usize,
        destination_x: usize,
        destination_y: usize,
        width: usize,
        height: usize,
        delta: usize,
    ) -> EFI_STATUS,

    pub mode: *mut EFI_GRAPHICS_OUTPUT_PROTOCOL_MODE,
}
