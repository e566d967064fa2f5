// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Register backend and busy-wait delay for the loader.
//!
//! No timers or clocks are set up before the handoff, so delays count
//! instructions. Everything here inlines into the RAM-resident stages.

use cortex_ar::asm::nop;
use embedded_hal::delay::DelayNs;
use qspi_loader_common::Mmio;

/// Volatile accesses at physical addresses (MMU off).
#[derive(Clone, Copy, Default)]
pub struct VolatileMmio;

impl Mmio for VolatileMmio {
    #[inline(always)]
    fn read8(&mut self, addr: u32) -> u8 {
        unsafe { (addr as *const u8).read_volatile() }
    }

    #[inline(always)]
    fn write8(&mut self, addr: u32, value: u8) {
        unsafe { (addr as *mut u8).write_volatile(value) }
    }

    #[inline(always)]
    fn read16(&mut self, addr: u32) -> u16 {
        unsafe { (addr as *const u16).read_volatile() }
    }

    #[inline(always)]
    fn write16(&mut self, addr: u32, value: u16) {
        unsafe { (addr as *mut u16).write_volatile(value) }
    }

    #[inline(always)]
    fn read32(&mut self, addr: u32) -> u32 {
        unsafe { (addr as *const u32).read_volatile() }
    }

    #[inline(always)]
    fn write32(&mut self, addr: u32, value: u32) {
        unsafe { (addr as *mut u32).write_volatile(value) }
    }
}

/// Calibrated at reset clocks: about 1,750,000 loop passes per 250 ms.
pub const LOOPS_PER_MS: u32 = 7_000;

/// Instruction-counting delay.
#[derive(Clone, Copy, Default)]
pub struct BusyDelay;

impl BusyDelay {
    #[inline(always)]
    fn spin(loops: u32) {
        for _ in 0..loops {
            nop();
        }
    }
}

impl DelayNs for BusyDelay {
    #[inline(always)]
    fn delay_ns(&mut self, ns: u32) {
        Self::spin((ns / 1_000).saturating_mul(LOOPS_PER_MS) / 1_000);
    }

    #[inline(always)]
    fn delay_us(&mut self, us: u32) {
        Self::spin(us.saturating_mul(LOOPS_PER_MS) / 1_000);
    }

    #[inline(always)]
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            Self::spin(LOOPS_PER_MS);
        }
    }
}
