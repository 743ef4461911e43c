//! Global allocator backed by boot services pool memory

use super::memory::{EFI_LOADER_DATA, POOL_ALIGNMENT};
use super::{EFI_BOOT_SERVICES, EFI_SUCCESS};
use core::alloc::{GlobalAlloc, Layout};
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Boot services table, null until `init` runs
static BOOT_SERVICES: AtomicPtr<EFI_BOOT_SERVICES> = AtomicPtr::new(ptr::null_mut());

/// Route allocations through `boot_services`.
///
/// # Safety
/// `boot_services` must stay valid for as long as allocations are made.
pub unsafe fn init(boot_services: *mut EFI_BOOT_SERVICES) {
    BOOT_SERVICES.store(boot_services, Ordering::Release);
}

/// Allocator over AllocatePool/FreePool.
///
/// Pool memory is 8-byte aligned. Larger alignments over-allocate and stash
/// the original pool pointer in the word just below the aligned block.
pub struct PoolAllocator;

unsafe impl GlobalAlloc for PoolAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let boot_services = BOOT_SERVICES.load(Ordering::Acquire);
        if boot_services.is_null() {
            return ptr::null_mut();
        }

        let align = layout.align();
        let size = if align > POOL_ALIGNMENT {
            match layout.size().checked_add(align) {
                Some(size) => size,
                None => return ptr::null_mut(),
            }
        } else {
            layout.size()
        };

        let mut buffer: *mut u8 = ptr::null_mut();
        let status = ((*boot_services).allocate_pool)(EFI_LOADER_DATA, size, &mut buffer);
        if status != EFI_SUCCESS || buffer.is_null() {
            return ptr::null_mut();
        }

        if align > POOL_ALIGNMENT {
            let offset = align - (buffer as usize % align);
            let aligned = buffer.add(offset);
            (aligned as *mut *mut u8).sub(1).write(buffer);
            aligned
        } else {
            buffer
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let boot_services = BOOT_SERVICES.load(Ordering::Acquire);
        if boot_services.is_null() {
            return;
        }

        let buffer = if layout.align() > POOL_ALIGNMENT {
            (ptr as *mut *mut u8).sub(1).read()
        } else {
            ptr
        };
        ((*boot_services).free_pool)(buffer);
    }
}
