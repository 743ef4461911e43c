//! NekoBoot UEFI application entry point

#![cfg_attr(target_os = "uefi", no_std)]
#![cfg_attr(target_os = "uefi", no_main)]

#[cfg(target_os = "uefi")]
mod entry {
    use core::ffi::c_void;
    use log::{error, info, warn};
    use nekoboot::config;
    use nekoboot::firmware::{self, UefiConsole, UefiDisplay, UefiLauncher, UefiTimer, UefiVolume};
    use nekoboot::logger;
    use nekoboot::sequencer::Sequencer;
    use nekoboot::uefi::{pool, EFI_LOAD_ERROR, EFI_STATUS, EFI_SUCCESS, EFI_SYSTEM_TABLE};

    #[global_allocator]
    static ALLOCATOR: pool::PoolAllocator = pool::PoolAllocator;

    /// UEFI entry point
    #[no_mangle]
    pub extern "efiapi" fn efi_main(
        image_handle: *mut c_void,
        system_table: *mut EFI_SYSTEM_TABLE,
    ) -> EFI_STATUS {
        // Verify system table is valid
        if system_table.is_null() {
            return EFI_LOAD_ERROR;
        }

        unsafe {
            let console = (*system_table).con_out;
            let boot_services = (*system_table).boot_services;
            if boot_services.is_null() {
                return EFI_LOAD_ERROR;
            }

            pool::init(boot_services);
            // Without a logger the log macros are no-ops
            let _ = logger::init(config::LOG_LEVEL);
            info!("NekoBoot v{}", env!("CARGO_PKG_VERSION"));

            // A missing device leaves the logo and chainload to fail on their own terms
            let device = match firmware::boot_device(boot_services, image_handle) {
                Ok(device) => device,
                Err(status) => {
                    warn!("boot volume unknown: {}", status);
                    core::ptr::null_mut()
                }
            };

            let mut sequencer = Sequencer::new(
                UefiVolume::new(boot_services, device),
                UefiDisplay::new(boot_services),
                UefiLauncher::new(boot_services, image_handle, device),
                UefiTimer::new(boot_services),
                UefiConsole::new(console),
            );
            sequencer.run();
            info!("chainloaded image returned, state {:?}", sequencer.state());
        }

        EFI_SUCCESS
    }

    /// Halt the CPU in a loop
    fn hlt_loop() -> ! {
        loop {
            x86_64::instructions::hlt();
        }
    }

    #[panic_handler]
    fn panic(info: &core::panic::PanicInfo) -> ! {
        error!("panic: {}", info);
        hlt_loop();
    }
}

#[cfg(not(target_os = "uefi"))]
fn main() {
    eprintln!("nekoboot-uefi is a UEFI application; build it for x86_64-unknown-uefi");
}
