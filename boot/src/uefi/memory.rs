//! UEFI Memory Types

/// Pool type for this image's own allocations
pub const EFI_LOADER_DATA: u32 = 2;

/// AllocatePool guarantees this alignment for every buffer it returns
pub const POOL_ALIGNMENT: usize = 8;
