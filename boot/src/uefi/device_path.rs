//! UEFI Device Path Protocol

use super::EFI_GUID;
use alloc::vec::Vec;

/// Device Path Protocol GUID: 09576E91-6D3F-11D2-8E39-00A0C969723B
pub const DEVICE_PATH_PROTOCOL_GUID: EFI_GUID = EFI_GUID {
    data1: 0x09576e91,
    data2: 0x6d3f,
    data3: 0x11d2,
    data4: [0x8e, 0x39, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
};

/// Node types and subtypes
pub const MEDIA_DEVICE_PATH: u8 = 0x04;
pub const MEDIA_FILEPATH_DP: u8 = 0x04;
pub const END_DEVICE_PATH_TYPE: u8 = 0x7f;
pub const END_ENTIRE_DEVICE_PATH_SUBTYPE: u8 = 0xff;

/// Every node starts with type, subtype and a little-endian u16 length
pub const NODE_HEADER_SIZE: usize = 4;

/// Upper bound when walking firmware-owned paths
const MAX_DEVICE_PATH_SIZE: usize = 4096;

/// Generic device path node header
#[repr(C)]
pub struct EFI_DEVICE_PATH_PROTOCOL {
    pub node_type: u8,
    pub sub_type: u8,
    pub length: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DevicePathError {
    #[error("device path node is shorter than its header")]
    MalformedNode,
    #[error("device path has no end node")]
    Unterminated,
    #[error("file path does not fit in a device path node")]
    PathTooLong,
}

/// Byte length of a device path, excluding its end node.
///
/// # Safety
/// `path` must point to a readable device path.
pub unsafe fn prefix_len(path: *const EFI_DEVICE_PATH_PROTOCOL) -> Result<usize, DevicePathError> {
    let base = path as *const u8;
    let mut offset = 0usize;

    while offset + NODE_HEADER_SIZE <= MAX_DEVICE_PATH_SIZE {
        let node = &*(base.add(offset) as *const EFI_DEVICE_PATH_PROTOCOL);
        if node.node_type == END_DEVICE_PATH_TYPE
            && node.sub_type == END_ENTIRE_DEVICE_PATH_SUBTYPE
        {
            return Ok(offset);
        }

        let length = u16::from_le_bytes(node.length) as usize;
        if length < NODE_HEADER_SIZE {
            return Err(DevicePathError::MalformedNode);
        }
        offset += length;
    }

    Err(DevicePathError::Unterminated)
}

/// Build `prefix` + a media file path node for `file` + the end node
pub fn with_file_path(prefix: &[u8], file: &str) -> Result<Vec<u8>, DevicePathError> {
    let units = file.chars().count() + 1;
    let node_len = units
        .checked_mul(2)
        .and_then(|n| n.checked_add(NODE_HEADER_SIZE))
        .and_then(|n| u16::try_from(n).ok())
        .ok_or(DevicePathError::PathTooLong)?;

    let mut path = Vec::with_capacity(prefix.len() + node_len as usize + NODE_HEADER_SIZE);
    path.extend_from_slice(prefix);

    path.push(MEDIA_DEVICE_PATH);
    path.push(MEDIA_FILEPATH_DP);
    path.extend_from_slice(&node_len.to_le_bytes());
    for ch in file.chars() {
        let unit = u16::try_from(u32::from(ch)).unwrap_or(b'?' as u16);
        path.extend_from_slice(&unit.to_le_bytes());
    }
    path.extend_from_slice(&[0, 0]);

    path.extend_from_slice(&[END_DEVICE_PATH_TYPE, END_ENTIRE_DEVICE_PATH_SUBTYPE]);
    path.extend_from_slice(&(NODE_HEADER_SIZE as u16).to_le_bytes());

    Ok(path)
}
