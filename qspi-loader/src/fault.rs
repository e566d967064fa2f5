// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Halt-and-blink fault states.
//!
//! A failed stage 2 can leave the SPIBSC outside external read mode, so the
//! handlers and their patterns are linked into the RAM-resident init-2
//! section.

use core::panic::PanicInfo;

use qspi_loader_common::led::{self, BlinkStep, LedPin, Pattern};

use crate::peripherals::{BusyDelay, VolatileMmio};

#[link_section = ".spibsc_init_2.rodata"]
static SPI_INIT_ERROR: [BlinkStep; 4] = led::SPI_INIT_ERROR;

#[link_section = ".spibsc_init_2.rodata"]
static CODE_TOO_BIG: [BlinkStep; 2] = led::CODE_TOO_BIG;

#[inline(always)]
fn halt(pattern: &Pattern) -> ! {
    let mut mmio = VolatileMmio;
    let mut led = LedPin::configure(&mut mmio);
    led::halt_and_blink(&mut led, &mut BusyDelay, pattern)
}

/// Flash could not be switched to fast reads.
#[link_section = ".spibsc_init_2"]
#[inline(never)]
pub fn spi_init_error() -> ! {
    halt(&SPI_INIT_ERROR)
}

/// A signed RAM image runs into the loader's protected RAM.
#[link_section = ".spibsc_init_2"]
#[inline(never)]
pub fn code_too_big() -> ! {
    halt(&CODE_TOO_BIG)
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    defmt::println!("panic: {}", defmt::Display2Format(info));
    halt(&led::PANIC)
}
