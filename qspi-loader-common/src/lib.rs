// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Hardware-independent core of the RZ/A1L QSPI loader.
//!
//! This crate supports both `no_std` (firmware) and `std` (host) environments:
//! - Default: `no_std`, everything written against the [`Mmio`] trait
//! - `std` feature: host tools and tests
//! - `defmt` feature: `defmt::Format` on the public error and decision types

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod handoff;
pub mod image;
pub mod led;
pub mod pins;
pub mod regs;
pub mod reinit;
pub mod sflash;
pub mod spibsc;

// Re-export commonly used types
pub use error::{BootError, SpibscError};
pub use handoff::{plan_load, select_handoff, Handoff, LoadPlan};
pub use image::{BootImage, ImageHeader, BOOT_PROTECTED_RAM_START, HEADER_SPAN, USER_PROGRAM_SRC};
pub use led::{halt_and_blink, play, BlinkStep, LedPin, Pattern};
pub use regs::{Field, Mmio};
pub use sflash::{BusMode, FlashDevice, FlashProfile};
pub use spibsc::{Spibsc, SpibscConfig};
