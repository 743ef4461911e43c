//! Boot Sequencer
//!
//! Drives the splash and chainload steps in a single forward pass:
//!
//! ```text
//! Init -> LogoDrawn | LogoFailed -> Delaying -> Chainloading -> Succeeded | Failed
//! ```
//!
//! Logo failures are cosmetic and only logged. A chainload failure is fatal:
//! the error is put on screen and the sequencer stalls forever.

use crate::config::{CHAINLOAD_PATH, HALT_STALL_MICROS, LAUNCH_MESSAGE, LOGO_HOLD_MICROS};
use crate::error::{self, ChainloadError};
use crate::platform::{Console, DisplayProvider, FileProvider, Launcher, Timer};
use crate::splash;
use alloc::vec::Vec;
use log::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Init,
    LogoDrawn,
    LogoFailed,
    Delaying,
    Chainloading,
    Succeeded,
    Failed,
}

impl BootState {
    /// Whether `next` directly follows `self`
    pub fn can_advance_to(self, next: BootState) -> bool {
        use BootState::*;

        matches!(
            (self, next),
            (Init, LogoDrawn)
                | (Init, LogoFailed)
                | (LogoDrawn, Delaying)
                | (LogoFailed, Delaying)
                | (Delaying, Chainloading)
                | (Chainloading, Succeeded)
                | (Chainloading, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BootState::Succeeded | BootState::Failed)
    }
}

/// Splash-then-chainload state machine over injected collaborators
pub struct Sequencer<V, D, L, T, C> {
    volume: V,
    display: D,
    launcher: L,
    timer: T,
    console: C,
    state: BootState,
    trail: Vec<BootState>,
}

impl<V, D, L, T, C> Sequencer<V, D, L, T, C>
where
    V: FileProvider,
    D: DisplayProvider,
    L: Launcher,
    T: Timer,
    C: Console,
{
    pub fn new(volume: V, display: D, launcher: L, timer: T, console: C) -> Self {
        let mut trail = Vec::with_capacity(5);
        trail.push(BootState::Init);

        Sequencer {
            volume,
            display,
            launcher,
            timer,
            console,
            state: BootState::Init,
            trail,
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    /// Every state visited so far, in order
    pub fn trail(&self) -> &[BootState] {
        &self.trail
    }

    /// Run the whole sequence. Returns only if the chainloaded image
    /// started and later handed control back successfully.
    pub fn run(&mut self) {
        match splash::show_logo(&mut self.volume, &mut self.display, &mut self.console) {
            Ok(placement) => {
                info!(
                    "logo drawn at ({}, {})",
                    placement.rect.dest_x, placement.rect.dest_y
                );
                self.advance(BootState::LogoDrawn);
            }
            Err(err) => {
                warn!("continuing without logo: {}", err);
                self.advance(BootState::LogoFailed);
            }
        }

        self.advance(BootState::Delaying);
        self.timer.stall(LOGO_HOLD_MICROS);

        self.advance(BootState::Chainloading);
        match self.chainload() {
            Ok(()) => self.advance(BootState::Succeeded),
            Err(err) => {
                self.advance(BootState::Failed);
                error!("chainload of {} failed: {}", CHAINLOAD_PATH, err);
                if error::report_fatal(&mut self.console, &err).is_err() {
                    error!("cannot report failure on console");
                }
                self.halt();
            }
        }
    }

    fn chainload(&mut self) -> Result<(), ChainloadError> {
        if self.console.write_str(LAUNCH_MESSAGE).is_err() {
            warn!("cannot print launch message");
        }
        info!("loading {}", CHAINLOAD_PATH);

        let image = self.launcher.load(CHAINLOAD_PATH).map_err(ChainloadError::Load)?;
        self.launcher.start(image).map_err(ChainloadError::Start)
    }

    fn advance(&mut self, next: BootState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        info!("{:?} -> {:?}", self.state, next);

        self.state = next;
        self.trail.push(next);
    }

    /// Stall forever
    fn halt(&mut self) -> ! {
        if let Err(status) = self.timer.disarm_watchdog() {
            warn!("watchdog still armed, firmware may reset: {}", status);
        }
        loop {
            self.timer.stall(HALT_STALL_MICROS);
        }
    }
}
