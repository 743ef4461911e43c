//! Serial logger
//!
//! Log records go to COM1 so diagnostics never draw over the splash screen.

use crate::config::SERIAL_PORT_BASE;
use core::fmt::{self, Write};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;
use uart_16550::SerialPort;

pub struct BootLogger {
    port: Mutex<Option<SerialPort>>,
}

static LOGGER: BootLogger = BootLogger {
    port: Mutex::new(None),
};

/// Initialize COM1 and install the logger
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    // SAFETY: COM1 is a standard port and nothing else in this image drives it
    let mut port = unsafe { SerialPort::new(SERIAL_PORT_BASE) };
    port.init();
    *LOGGER.port.lock() = Some(port);

    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

/// One log line: `[LEVEL] target: message`
pub fn format_record<W: Write>(
    out: &mut W,
    level: Level,
    target: &str,
    args: &fmt::Arguments<'_>,
) -> fmt::Result {
    write!(out, "[{:<5}] {}: {}\r\n", level, target, args)
}

impl Log for BootLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_record(record);
        }
    }

    fn flush(&self) {}
}

impl BootLogger {
    /// Drops the record when the port is busy, e.g. a panic raised mid-write
    fn write_record(&self, record: &Record<'_>) {
        let Some(mut port) = self.port.try_lock() else {
            return;
        };
        if let Some(port) = port.as_mut() {
            let _ = format_record(port, record.level(), record.target(), record.args());
        }
    }
}
