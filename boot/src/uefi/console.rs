//! UEFI Console Output Protocol

use super::EFI_STATUS;
use core::ffi::c_void;

/// UEFI Simple Text Output Protocol
#[repr(C)]
pub struct EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL {
    pub reset: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        extended_verification: bool,
    ) -> EFI_STATUS,

    pub output_string: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        string: *const u16,
    ) -> EFI_STATUS,

    pub test_string: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        string: *const u16,
    ) -> EFI_STATUS,

    pub query_mode: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        mode_number: usize,
        columns: *mut usize,
        rows: *mut usize,
    ) -> EFI_STATUS,

    pub set_mode: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        mode_number: usize,
    ) -> EFI_STATUS,

    pub set_attribute: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        attribute: usize,
    ) -> EFI_STATUS,

    pub clear_screen: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
    ) -> EFI_STATUS,

    pub set_cursor_position: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        column: usize,
        row: usize,
    ) -> EFI_STATUS,

    pub enable_cursor: extern "efiapi" fn(
        this: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
        visible: bool,
    ) -> EFI_STATUS,

    pub mode: *mut c_void,
}

/// Convert a UTF-8 string to null-terminated UCS-2 for UEFI.
///
/// Characters outside the basic multilingual plane are replaced with `?`.
/// Returns the number of units written including the terminator, or `None`
/// if `output` cannot hold the whole string.
pub fn utf8_to_utf16(input: &str, output: &mut [u16]) -> Option<usize> {
    let mut i = 0;
    for ch in input.chars() {
        if i + 1 >= output.len() {
            return None;
        }
        output[i] = u16::try_from(u32::from(ch)).unwrap_or(b'?' as u16);
        i += 1;
    }
    *output.get_mut(i)? = 0; // Null terminator
    Some(i + 1)
}

/// Print a UTF-8 string to the UEFI console, in chunks of at most 255 characters
pub unsafe fn print(protocol: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL, s: &str) -> EFI_STATUS {
    if protocol.is_null() {
        return super::EFI_NOT_READY;
    }

    let mut buffer: [u16; 256] = [0; 256];
    let mut status = super::EFI_SUCCESS;
    let mut rest = s;

    while !rest.is_empty() {
        let mut split = rest.len().min(buffer.len() - 1);
        while !rest.is_char_boundary(split) {
            split -= 1;
        }
        let (chunk, tail) = rest.split_at(split);
        rest = tail;

        if utf8_to_utf16(chunk, &mut buffer).is_none() {
            continue;
        }
        let output_fn = (*protocol).output_string;
        status = output_fn(protocol, buffer.as_ptr());
    }

    status
}
