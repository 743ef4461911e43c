//! Error Handling Module

use crate::uefi::{
    EFI_STATUS, EFI_SUCCESS, EFI_ERROR_BIT, EFI_LOAD_ERROR, EFI_INVALID_PARAMETER,
    EFI_UNSUPPORTED, EFI_BAD_BUFFER_SIZE, EFI_BUFFER_TOO_SMALL,
    EFI_NOT_READY, EFI_DEVICE_ERROR, EFI_WRITE_PROTECTED,
    EFI_OUT_OF_RESOURCES, EFI_NOT_FOUND, EFI_ACCESS_DENIED,
    EFI_SECURITY_VIOLATION, EFI_END_OF_FILE,
};
use crate::bmp::DecodeError;
use crate::blit::BlitError;
use crate::platform::Console;
use core::fmt;

/// Convert EFI_STATUS code to human-readable string
pub fn status_to_string(status: EFI_STATUS) -> &'static str {
    match status {
        EFI_SUCCESS => "Success",
        EFI_LOAD_ERROR => "Load Error",
        EFI_INVALID_PARAMETER => "Invalid Parameter",
        EFI_UNSUPPORTED => "Unsupported",
        EFI_BAD_BUFFER_SIZE => "Bad Buffer Size",
        EFI_BUFFER_TOO_SMALL => "Buffer Too Small",
        EFI_NOT_READY => "Not Ready",
        EFI_DEVICE_ERROR => "Device Error",
        EFI_WRITE_PROTECTED => "Write Protected",
        EFI_OUT_OF_RESOURCES => "Out of Resources",
        EFI_NOT_FOUND => "Not Found",
        EFI_ACCESS_DENIED => "Access Denied",
        EFI_SECURITY_VIOLATION => "Security Violation",
        EFI_END_OF_FILE => "End of File",
        _ => "Unknown Error",
    }
}

/// Firmware status code returned by a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub EFI_STATUS);

impl Status {
    pub fn is_error(self) -> bool {
        self.0 & EFI_ERROR_BIT != 0
    }

    /// `Ok` for success and warnings, `Err` for error codes
    pub fn check(raw: EFI_STATUS) -> Result<(), Status> {
        let status = Status(raw);
        if status.is_error() {
            Err(status)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:016X})", status_to_string(self.0), self.0)
    }
}

/// Logo step failures, all of them cosmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplashError {
    #[error("cannot open logo file: {0}")]
    Open(Status),
    #[error("cannot size logo file: {0}")]
    Size(Status),
    #[error("cannot allocate {0} bytes for logo file")]
    Allocation(usize),
    #[error("cannot read logo file: {0}")]
    Read(Status),
    #[error("logo is not a usable bitmap: {0}")]
    Decode(#[from] DecodeError),
    #[error("cannot draw logo: {0}")]
    Blit(#[from] BlitError),
}

/// Chainload failures, all of them fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChainloadError {
    #[error("load image failed: {0}")]
    Load(Status),
    #[error("start image failed: {0}")]
    Start(Status),
}

impl ChainloadError {
    pub fn operation(&self) -> &'static str {
        match self {
            ChainloadError::Load(_) => "Load chainload image",
            ChainloadError::Start(_) => "Start chainload image",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ChainloadError::Load(status) | ChainloadError::Start(status) => *status,
        }
    }
}

/// Write the bootloader error screen for a fatal chainload failure
pub fn report_fatal<C: Console + ?Sized>(console: &mut C, err: &ChainloadError) -> fmt::Result {
    let status = err.status();

    console.write_str("\r\n")?;
    write!(console, "{}{}\r\n", crate::config::FAILURE_MESSAGE, status)?;
    console.write_str("BOOTLOADER ERROR\r\n")?;
    write!(console, "Operation: {}\r\n", err.operation())?;
    write!(console, "Status Code: 0x{:016X}\r\n", status.0)?;
    write!(console, "Description: {}\r\n", status_to_string(status.0))?;
    console.write_str("System halted.\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubConsole;

    #[test]
    fn error_bit_decides_failure() {
        assert!(Status::check(EFI_SUCCESS).is_ok());
        // Warnings have the high bit clear
        assert!(Status::check(1).is_ok());
        assert_eq!(Status::check(EFI_NOT_FOUND), Err(Status(EFI_NOT_FOUND)));
    }

    #[test]
    fn status_display_names_the_code() {
        let text = format!("{}", Status(EFI_NOT_FOUND));
        assert_eq!(text, "Not Found (0x800000000000000E)");
    }

    #[test]
    fn fatal_report_lists_operation_and_status() {
        let console = StubConsole::default();
        let mut sink = console.clone();
        report_fatal(&mut sink, &ChainloadError::Start(Status(EFI_SECURITY_VIOLATION))).unwrap();

        let text = console.text();
        assert!(text.contains("Failed to boot Windows. Error: Security Violation"));
        assert!(text.contains("Operation: Start chainload image"));
        assert!(text.contains("Status Code: 0x800000000000001A"));
        assert!(text.ends_with("System halted.\r\n"));
    }
}
