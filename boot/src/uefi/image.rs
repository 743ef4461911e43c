//! UEFI Loaded Image Protocol

use super::{EFI_GUID, EFI_HANDLE, EFI_STATUS, EFI_SYSTEM_TABLE};
use super::device_path::EFI_DEVICE_PATH_PROTOCOL;
use core::ffi::c_void;

/// Loaded Image Protocol GUID: 5B1B31A1-9562-11D2-8E3F-00A0C969723B
pub const LOADED_IMAGE_PROTOCOL_GUID: EFI_GUID = EFI_GUID {
    data1: 0x5b1b31a1,
    data2: 0x9562,
    data3: 0x11d2,
    data4: [0x8e, 0x3f, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
};

/// UEFI Loaded Image Protocol
#[repr(C)]
pub struct EFI_LOADED_IMAGE_PROTOCOL {
    pub revision: u32,
    pub parent_handle: EFI_HANDLE,
    pub system_table: *mut EFI_SYSTEM_TABLE,

    // Source location of the image
    pub device_handle: EFI_HANDLE,
    pub file_path: *mut EFI_DEVICE_PATH_PROTOCOL,
    pub reserved: *mut c_void,

    // Image's load options
    pub load_options_size: u32,
    pub load_options: *mut c_void,

    // Location where image was loaded
    pub image_base: *mut c_void,
    pub image_size: u64,
    pub image_code_type: u32,
    pub image_data_type: u32,
    pub unload: extern "efiapi" fn(image_handle: EFI_HANDLE) -> EFI_STATUS,
}
