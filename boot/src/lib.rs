//! NekoBoot - splash screen and chainloader for UEFI firmware
//!
//! Draws `nekologo.bmp` from the boot volume, holds it on screen, then hands
//! over to the Windows Boot Manager on the same volume.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod blit;
pub mod bmp;
pub mod config;
pub mod error;
pub mod firmware;
pub mod logger;
pub mod platform;
pub mod sequencer;
pub mod splash;
pub mod uefi;

#[cfg(test)]
mod testing;
