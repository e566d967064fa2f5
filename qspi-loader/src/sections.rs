// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Linker-defined RAM sections and their copiers.

use qspi_loader_common::reinit::{copy_words, section_words};

unsafe extern "C" {
    static __spibsc_init_1_start: u32;
    static __spibsc_init_1_end: u32;
    static __spibsc_init_1_load: u32;
    static __spibsc_init_2_start: u32;
    static __spibsc_init_2_end: u32;
    static __spibsc_init_2_load: u32;
    static ld_boot_protected_ram_start: u32;
}

macro_rules! linker_addr {
    ($sym:ident) => {
        unsafe { &$sym as *const u32 as u32 }
    };
}

/// Code linked to run from RAM but stored in flash.
pub struct RamSection {
    pub load: u32,
    pub start: u32,
    pub end: u32,
}

impl RamSection {
    /// Stage 1 code: halts and restarts the SPIBSC.
    pub fn init_1() -> Self {
        Self {
            load: linker_addr!(__spibsc_init_1_load),
            start: linker_addr!(__spibsc_init_1_start),
            end: linker_addr!(__spibsc_init_1_end),
        }
    }

    /// Stage 2 code plus the fault handlers it can reach.
    pub fn init_2() -> Self {
        Self {
            load: linker_addr!(__spibsc_init_2_load),
            start: linker_addr!(__spibsc_init_2_start),
            end: linker_addr!(__spibsc_init_2_end),
        }
    }

    pub fn words(&self) -> usize {
        section_words(self.start, self.end)
    }

    /// Copy the section from flash to its RAM address.
    ///
    /// # Safety
    /// Flash must be readable and nothing may be executing from the
    /// destination range.
    pub unsafe fn copy(&self) {
        unsafe { copy_words(self.load as *const u32, self.start as *mut u32, self.words()) };
    }
}

/// Start of the RAM the loader keeps for itself.
pub fn protected_ram_start() -> u32 {
    linker_addr!(ld_boot_protected_ram_start)
}
