//! Test fixtures: synthetic bitmaps and recording stub collaborators

use crate::blit::{PixelBuffer, PlacementRect, Resolution};
use crate::bmp::{row_stride, HEADER_SIZE};
use crate::config::HALT_STALL_MICROS;
use crate::error::Status;
use crate::platform::{
    Console, DisplayProvider, FileProvider, Framebuffer, Launcher, ReadFile, Timer,
};
use crate::uefi::{EFI_END_OF_FILE, EFI_NOT_FOUND};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Build a bottom-up 24bpp bitmap; `pixel(x, y)` gives (B, G, R) with y = 0 at the top
pub fn synth_bmp(width: usize, height: usize, pixel: impl Fn(usize, usize) -> [u8; 3]) -> Vec<u8> {
    let stride = row_stride(width).unwrap();
    let file_size = HEADER_SIZE + stride * height;
    let mut bytes = Vec::with_capacity(file_size);

    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&(file_size as u32).to_le_bytes());
    bytes.extend_from_slice(&[0; 4]);
    bytes.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&((stride * height) as u32).to_le_bytes());
    bytes.extend_from_slice(&2835i32.to_le_bytes());
    bytes.extend_from_slice(&2835i32.to_le_bytes());
    bytes.extend_from_slice(&[0; 8]);
    assert_eq!(bytes.len(), HEADER_SIZE);

    for file_row in 0..height {
        let y = height - 1 - file_row;
        let start = bytes.len();
        for x in 0..width {
            bytes.extend_from_slice(&pixel(x, y));
        }
        bytes.resize(start + stride, 0);
    }

    bytes
}

pub fn put_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn put_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub fn put_i32(bytes: &mut [u8], offset: usize, value: i32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// In-memory volume that counts open handles
#[derive(Default)]
pub struct StubVolume {
    files: HashMap<String, Vec<u8>>,
    size_error: Option<Status>,
    read_error: Option<Status>,
    open_handles: Rc<Cell<usize>>,
}

impl StubVolume {
    pub fn with_file(mut self, name: &str, contents: Vec<u8>) -> Self {
        self.files.insert(name.to_string(), contents);
        self
    }

    pub fn failing_size(mut self, raw: usize) -> Self {
        self.size_error = Some(Status(raw));
        self
    }

    pub fn failing_reads(mut self, raw: usize) -> Self {
        self.read_error = Some(Status(raw));
        self
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }
}

impl FileProvider for StubVolume {
    type File = StubFile;

    fn open(&mut self, name: &str) -> Result<StubFile, Status> {
        let contents = self.files.get(name).ok_or(Status(EFI_NOT_FOUND))?.clone();
        self.open_handles.set(self.open_handles.get() + 1);

        Ok(StubFile {
            contents,
            size_error: self.size_error,
            read_error: self.read_error,
            open_handles: Rc::clone(&self.open_handles),
        })
    }
}

pub struct StubFile {
    contents: Vec<u8>,
    size_error: Option<Status>,
    read_error: Option<Status>,
    open_handles: Rc<Cell<usize>>,
}

impl ReadFile for StubFile {
    fn size(&mut self) -> Result<usize, Status> {
        match self.size_error {
            Some(status) => Err(status),
            None => Ok(self.contents.len()),
        }
    }

    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), Status> {
        if let Some(status) = self.read_error {
            return Err(status);
        }
        let source = self.contents.get(..buffer.len()).ok_or(Status(EFI_END_OF_FILE))?;
        buffer.copy_from_slice(source);
        Ok(())
    }
}

impl Drop for StubFile {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionWrite {
    pub rect: PlacementRect,
    pub buffer_width: usize,
    pub buffer_height: usize,
}

#[derive(Debug, Default)]
pub struct DisplayLog {
    pub acquired: usize,
    pub writes: Vec<RegionWrite>,
}

/// Display whose framebuffer records every region write
#[derive(Clone)]
pub struct StubDisplay {
    resolution: Result<Resolution, Status>,
    write_error: Option<Status>,
    log: Rc<RefCell<DisplayLog>>,
}

impl StubDisplay {
    pub fn new(width: usize, height: usize) -> Self {
        StubDisplay {
            resolution: Ok(Resolution { width, height }),
            write_error: None,
            log: Rc::default(),
        }
    }

    pub fn unavailable(raw: usize) -> Self {
        StubDisplay {
            resolution: Err(Status(raw)),
            write_error: None,
            log: Rc::default(),
        }
    }

    pub fn failing_writes(mut self, raw: usize) -> Self {
        self.write_error = Some(Status(raw));
        self
    }

    pub fn log(&self) -> Ref<'_, DisplayLog> {
        self.log.borrow()
    }
}

impl DisplayProvider for StubDisplay {
    type Target = StubFramebuffer;

    fn acquire(&mut self) -> Result<StubFramebuffer, Status> {
        let resolution = self.resolution?;
        self.log.borrow_mut().acquired += 1;

        Ok(StubFramebuffer {
            resolution,
            write_error: self.write_error,
            log: Rc::clone(&self.log),
        })
    }
}

pub struct StubFramebuffer {
    resolution: Resolution,
    write_error: Option<Status>,
    log: Rc<RefCell<DisplayLog>>,
}

impl Framebuffer for StubFramebuffer {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn write_region(&mut self, pixels: &PixelBuffer, rect: &PlacementRect) -> Result<(), Status> {
        self.log.borrow_mut().writes.push(RegionWrite {
            rect: *rect,
            buffer_width: pixels.width(),
            buffer_height: pixels.height(),
        });
        match self.write_error {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct LauncherLog {
    loaded: Vec<String>,
    started: usize,
}

#[derive(Clone, Default)]
pub struct StubLauncher {
    load_error: Option<Status>,
    start_error: Option<Status>,
    log: Rc<RefCell<LauncherLog>>,
}

impl StubLauncher {
    pub fn failing_load(mut self, raw: usize) -> Self {
        self.load_error = Some(Status(raw));
        self
    }

    pub fn failing_start(mut self, raw: usize) -> Self {
        self.start_error = Some(Status(raw));
        self
    }

    pub fn loaded(&self) -> Vec<String> {
        self.log.borrow().loaded.clone()
    }

    pub fn started(&self) -> usize {
        self.log.borrow().started
    }
}

impl Launcher for StubLauncher {
    type Image = String;

    fn load(&mut self, path: &str) -> Result<String, Status> {
        self.log.borrow_mut().loaded.push(path.to_string());
        match self.load_error {
            Some(status) => Err(status),
            None => Ok(path.to_string()),
        }
    }

    fn start(&mut self, _image: String) -> Result<(), Status> {
        self.log.borrow_mut().started += 1;
        match self.start_error {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

/// Panic payload the stub timer uses to break out of the halt loop
#[derive(Debug)]
pub struct Halted;

/// Timer call as seen by [`StubTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Stall(u64),
    DisarmWatchdog,
}

/// Records calls; unwinds with [`Halted`] on the first halt-loop stall
#[derive(Clone, Default)]
pub struct StubTimer {
    calls: Rc<RefCell<Vec<TimerCall>>>,
}

impl StubTimer {
    pub fn calls(&self) -> Vec<TimerCall> {
        self.calls.borrow().clone()
    }

    pub fn stalls(&self) -> Vec<u64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                TimerCall::Stall(micros) => Some(*micros),
                TimerCall::DisarmWatchdog => None,
            })
            .collect()
    }
}

impl Timer for StubTimer {
    fn stall(&mut self, micros: u64) {
        self.calls.borrow_mut().push(TimerCall::Stall(micros));
        if micros == HALT_STALL_MICROS {
            std::panic::panic_any(Halted);
        }
    }

    fn disarm_watchdog(&mut self) -> Result<(), Status> {
        self.calls.borrow_mut().push(TimerCall::DisarmWatchdog);
        Ok(())
    }
}

#[derive(Default)]
struct ConsoleLog {
    text: String,
    cursor: Option<(usize, usize)>,
}

#[derive(Clone, Default)]
pub struct StubConsole {
    log: Rc<RefCell<ConsoleLog>>,
}

impl StubConsole {
    pub fn text(&self) -> String {
        self.log.borrow().text.clone()
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.log.borrow().cursor
    }
}

impl fmt::Write for StubConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.log.borrow_mut().text.push_str(s);
        Ok(())
    }
}

impl Console for StubConsole {
    fn set_cursor(&mut self, column: usize, row: usize) -> Result<(), Status> {
        self.log.borrow_mut().cursor = Some((column, row));
        Ok(())
    }
}
