//! UEFI implementations of the sequencer's collaborators.
//!
//! Every adapter wraps raw firmware pointers handed over by `efi_main`.
//! Constructors are `unsafe`: the caller vouches that the pointers stay valid
//! while boot services are running, which is the whole life of this image.

use crate::blit::{PixelBuffer, PlacementRect, Resolution};
use crate::error::Status;
use crate::platform::{
    Console, DisplayProvider, FileProvider, Framebuffer, Launcher, ReadFile, Timer,
};
use crate::uefi::{
    EFI_BOOT_SERVICES, EFI_GUID, EFI_HANDLE,
    EFI_BAD_BUFFER_SIZE, EFI_END_OF_FILE, EFI_INVALID_PARAMETER, EFI_NOT_FOUND,
    EFI_NOT_READY, EFI_UNSUPPORTED,
    console::{self, EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL},
    device_path::{self, DEVICE_PATH_PROTOCOL_GUID, EFI_DEVICE_PATH_PROTOCOL},
    file::{
        EFI_FILE_INFO, EFI_FILE_PROTOCOL, EFI_SIMPLE_FILE_SYSTEM_PROTOCOL,
        EFI_FILE_DIRECTORY, EFI_FILE_INFO_GUID, EFI_FILE_MODE_READ,
        FILE_INFO_BUFFER_SIZE, SIMPLE_FILE_SYSTEM_PROTOCOL_GUID,
    },
    graphics::{
        EFI_BLT_BUFFER_TO_VIDEO, EFI_GRAPHICS_OUTPUT_PROTOCOL, GRAPHICS_OUTPUT_PROTOCOL_GUID,
    },
    image::{EFI_LOADED_IMAGE_PROTOCOL, LOADED_IMAGE_PROTOCOL_GUID},
};
use core::ffi::c_void;
use core::{fmt, mem, ptr, slice};
use log::{debug, warn};

/// Longest file name passed to the firmware, in UCS-2 units
const MAX_FILE_NAME: usize = 256;

/// Look up `protocol` on `handle`
unsafe fn handle_protocol<T>(
    boot_services: *mut EFI_BOOT_SERVICES,
    handle: EFI_HANDLE,
    protocol: &EFI_GUID,
) -> Result<*mut T, Status> {
    let mut interface: *mut c_void = ptr::null_mut();
    Status::check(((*boot_services).handle_protocol)(handle, protocol, &mut interface))?;

    if interface.is_null() {
        return Err(Status(EFI_NOT_FOUND));
    }
    Ok(interface as *mut T)
}

/// Device handle of the volume this image was loaded from
///
/// # Safety
/// `boot_services` and `image_handle` must come from `efi_main`.
pub unsafe fn boot_device(
    boot_services: *mut EFI_BOOT_SERVICES,
    image_handle: EFI_HANDLE,
) -> Result<EFI_HANDLE, Status> {
    let loaded_image: *mut EFI_LOADED_IMAGE_PROTOCOL =
        handle_protocol(boot_services, image_handle, &LOADED_IMAGE_PROTOCOL_GUID)?;
    Ok((*loaded_image).device_handle)
}

/// Simple File System on the boot device
pub struct UefiVolume {
    boot_services: *mut EFI_BOOT_SERVICES,
    device: EFI_HANDLE,
}

impl UefiVolume {
    /// # Safety
    /// `boot_services` must be valid; `device` may be null.
    pub unsafe fn new(boot_services: *mut EFI_BOOT_SERVICES, device: EFI_HANDLE) -> Self {
        UefiVolume { boot_services, device }
    }
}

impl FileProvider for UefiVolume {
    type File = UefiFile;

    fn open(&mut self, name: &str) -> Result<UefiFile, Status> {
        let mut file_name = [0u16; MAX_FILE_NAME];
        console::utf8_to_utf16(name, &mut file_name).ok_or(Status(EFI_INVALID_PARAMETER))?;

        unsafe {
            let fs_protocol: *mut EFI_SIMPLE_FILE_SYSTEM_PROTOCOL = handle_protocol(
                self.boot_services,
                self.device,
                &SIMPLE_FILE_SYSTEM_PROTOCOL_GUID,
            )?;

            let mut root: *mut EFI_FILE_PROTOCOL = ptr::null_mut();
            Status::check(((*fs_protocol).open_volume)(fs_protocol, &mut root))?;
            if root.is_null() {
                return Err(Status(EFI_NOT_FOUND));
            }
            // Closed when this scope ends, whatever happens below
            let root = UefiFile { handle: root };

            let mut file: *mut EFI_FILE_PROTOCOL = ptr::null_mut();
            Status::check(((*root.handle).open)(
                root.handle,
                &mut file,
                file_name.as_ptr(),
                EFI_FILE_MODE_READ,
                0,
            ))?;
            if file.is_null() {
                return Err(Status(EFI_NOT_FOUND));
            }

            Ok(UefiFile { handle: file })
        }
    }
}

/// Open file handle, closed on drop
pub struct UefiFile {
    handle: *mut EFI_FILE_PROTOCOL,
}

impl ReadFile for UefiFile {
    fn size(&mut self) -> Result<usize, Status> {
        // u64 storage keeps EFI_FILE_INFO aligned
        let mut info_buffer = [0u64; FILE_INFO_BUFFER_SIZE / mem::size_of::<u64>()];
        let mut buffer_size = FILE_INFO_BUFFER_SIZE;

        unsafe {
            Status::check(((*self.handle).get_info)(
                self.handle,
                &EFI_FILE_INFO_GUID,
                &mut buffer_size,
                info_buffer.as_mut_ptr() as *mut u8,
            ))?;

            let info = &*(info_buffer.as_ptr() as *const EFI_FILE_INFO);
            if info.attribute & EFI_FILE_DIRECTORY != 0 {
                return Err(Status(EFI_UNSUPPORTED));
            }
            usize::try_from(info.file_size).map_err(|_| Status(EFI_BAD_BUFFER_SIZE))
        }
    }

    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), Status> {
        let mut filled = 0;

        while filled < buffer.len() {
            let rest = &mut buffer[filled..];
            let mut read_size = rest.len();
            unsafe {
                let status = ((*self.handle).read)(self.handle, &mut read_size, rest.as_mut_ptr());
                Status::check(status)?;
            }
            if read_size == 0 {
                return Err(Status(EFI_END_OF_FILE));
            }
            filled += read_size.min(rest.len());
        }

        Ok(())
    }
}

impl Drop for UefiFile {
    fn drop(&mut self) {
        let status = unsafe { ((*self.handle).close)(self.handle) };
        if let Err(status) = Status::check(status) {
            // Non-fatal, just log it
            warn!("failed to close file: {}", status);
        }
    }
}

/// Graphics Output Protocol lookup
pub struct UefiDisplay {
    boot_services: *mut EFI_BOOT_SERVICES,
}

impl UefiDisplay {
    /// # Safety
    /// `boot_services` must be valid.
    pub unsafe fn new(boot_services: *mut EFI_BOOT_SERVICES) -> Self {
        UefiDisplay { boot_services }
    }
}

impl DisplayProvider for UefiDisplay {
    type Target = UefiFramebuffer;

    fn acquire(&mut self) -> Result<UefiFramebuffer, Status> {
        unsafe {
            let mut interface: *mut c_void = ptr::null_mut();
            Status::check(((*self.boot_services).locate_protocol)(
                &GRAPHICS_OUTPUT_PROTOCOL_GUID,
                ptr::null_mut(),
                &mut interface,
            ))?;

            let gop = interface as *mut EFI_GRAPHICS_OUTPUT_PROTOCOL;
            if gop.is_null() || (*gop).mode.is_null() || (*(*gop).mode).info.is_null() {
                return Err(Status(EFI_NOT_READY));
            }

            let info = &*(*(*gop).mode).info;
            let resolution = Resolution {
                width: info.horizontal_resolution as usize,
                height: info.vertical_resolution as usize,
            };
            debug!(
                "graphics mode {}x{}, pixel format {}",
                resolution.width, resolution.height, info.pixel_format
            );

            Ok(UefiFramebuffer { gop, resolution })
        }
    }
}

pub struct UefiFramebuffer {
    gop: *mut EFI_GRAPHICS_OUTPUT_PROTOCOL,
    resolution: Resolution,
}

impl Framebuffer for UefiFramebuffer {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn write_region(&mut self, pixels: &PixelBuffer, rect: &PlacementRect) -> Result<(), Status> {
        let delta = pixels.width() * mem::size_of::<crate::blit::Pixel>();

        // BufferToVideo only reads the buffer
        let status = unsafe {
            ((*self.gop).blt)(
                self.gop,
                pixels.pixels().as_ptr() as *mut _,
                EFI_BLT_BUFFER_TO_VIDEO,
                rect.src_x,
                rect.src_y,
                rect.dest_x,
                rect.dest_y,
                rect.width,
                rect.height,
                delta,
            )
        };
        Status::check(status)
    }
}

/// Image loaded by `UefiLauncher`, not yet started
pub struct ChildImage(EFI_HANDLE);

/// LoadImage/StartImage on the boot volume
pub struct UefiLauncher {
    boot_services: *mut EFI_BOOT_SERVICES,
    parent: EFI_HANDLE,
    device: EFI_HANDLE,
}

impl UefiLauncher {
    /// # Safety
    /// `boot_services` and `parent` must come from `efi_main`; `device` may be null.
    pub unsafe fn new(
        boot_services: *mut EFI_BOOT_SERVICES,
        parent: EFI_HANDLE,
        device: EFI_HANDLE,
    ) -> Self {
        UefiLauncher { boot_services, parent, device }
    }
}

impl Launcher for UefiLauncher {
    type Image = ChildImage;

    fn load(&mut self, path: &str) -> Result<ChildImage, Status> {
        unsafe {
            let device_path: *mut EFI_DEVICE_PATH_PROTOCOL =
                handle_protocol(self.boot_services, self.device, &DEVICE_PATH_PROTOCOL_GUID)?;

            let prefix_len = device_path::prefix_len(device_path).map_err(|err| {
                warn!("boot device path unusable: {}", err);
                Status(EFI_INVALID_PARAMETER)
            })?;
            let prefix = slice::from_raw_parts(device_path as *const u8, prefix_len);
            let full_path = device_path::with_file_path(prefix, path).map_err(|err| {
                warn!("cannot build device path for {}: {}", path, err);
                Status(EFI_INVALID_PARAMETER)
            })?;

            let mut child: EFI_HANDLE = ptr::null_mut();
            Status::check(((*self.boot_services).load_image)(
                false,
                self.parent,
                full_path.as_ptr() as *const EFI_DEVICE_PATH_PROTOCOL,
                ptr::null(),
                0,
                &mut child,
            ))?;

            Ok(ChildImage(child))
        }
    }

    fn start(&mut self, image: ChildImage) -> Result<(), Status> {
        let status = unsafe {
            ((*self.boot_services).start_image)(image.0, ptr::null_mut(), ptr::null_mut())
        };
        Status::check(status)
    }
}

/// Boot services Stall
pub struct UefiTimer {
    boot_services: *mut EFI_BOOT_SERVICES,
}

impl UefiTimer {
    /// # Safety
    /// `boot_services` must be valid.
    pub unsafe fn new(boot_services: *mut EFI_BOOT_SERVICES) -> Self {
        UefiTimer { boot_services }
    }
}

impl Timer for UefiTimer {
    fn stall(&mut self, micros: u64) {
        let micros = usize::try_from(micros).unwrap_or(usize::MAX);
        unsafe {
            ((*self.boot_services).stall)(micros);
        }
    }

    fn disarm_watchdog(&mut self) -> Result<(), Status> {
        // A zero timeout disables the watchdog
        let status = unsafe { ((*self.boot_services).set_watchdog_timer)(0, 0, 0, ptr::null()) };
        Status::check(status)
    }
}

/// Simple Text Output console
pub struct UefiConsole {
    out: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL,
}

impl UefiConsole {
    /// # Safety
    /// `out` must be null or a valid text output protocol.
    pub unsafe fn new(out: *mut EFI_SIMPLE_TEXT_OUTPUT_PROTOCOL) -> Self {
        UefiConsole { out }
    }
}

impl fmt::Write for UefiConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let status = unsafe { console::print(self.out, s) };
        Status::check(status).map_err(|_| fmt::Error)
    }
}

impl Console for UefiConsole {
    fn set_cursor(&mut self, column: usize, row: usize) -> Result<(), Status> {
        if self.out.is_null() {
            return Err(Status(EFI_NOT_READY));
        }
        Status::check(unsafe { ((*self.out).set_cursor_position)(self.out, column, row) })
    }
}
