// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! RAM-resident entry points for the two flash re-initialisation stages.
//!
//! While these run the flash serves no instruction fetches: no logging, no
//! calls out of the section.

use qspi_loader_common::reinit;

use crate::config;
use crate::fault;
use crate::peripherals::VolatileMmio;

/// # Safety
/// The init-1 section must have been copied to RAM.
#[link_section = ".spibsc_init_1"]
#[inline(never)]
pub unsafe fn run_stage1() {
    let mut mmio = VolatileMmio;
    reinit::stage1(&mut mmio);
}

/// Returns only once the flash is back in external read mode.
///
/// # Safety
/// The init-2 section must have been copied to RAM.
#[link_section = ".spibsc_init_2"]
#[inline(never)]
pub unsafe fn run_stage2() {
    let mut mmio = VolatileMmio;
    let profile = config::PROFILE;
    if reinit::stage2(&mut mmio, &profile).is_err() {
        fault::spi_init_error();
    }
}
