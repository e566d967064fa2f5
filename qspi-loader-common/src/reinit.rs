// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash controller re-initialisation, split in two RAM-resident stages.
//!
//! Stage 1 restarts the SPIBSC clock and brings the controller back to a
//! known slow read configuration. Stage 2 switches controller and flash to
//! the fast read mode of the board's [`FlashProfile`]. Both run while the
//! flash cannot serve instruction fetches, so the loader places their callers
//! in RAM and everything here inlines into them.

use core::ptr;

use crate::error::BootError;
use crate::regs::cpg::{
    DSFR, DSFR_IOKEEP, STBCR9, STBCR9_ALL_STOPPED, STBCR9_SPIBSC0_RUNNING, SYSCR3,
    SYSCR3_RRAM_WRITE_ENABLE,
};
use crate::regs::spibsc::{DRCR, DRCR_RBE, SPBCR, SPBCR_BRDV, SPBCR_SPBR, SSLDR};
use crate::regs::Mmio;
use crate::sflash::FlashProfile;
use crate::spibsc::Spibsc;

/// Stage 1 bit rate: B / (SPBR * 2^BRDV) = 33.33 MHz.
pub const STAGE1_SPBR: u32 = 2;
pub const STAGE1_BRDV: u32 = 0;

/// Allow writes to the data-retention RAM pages.
#[inline(always)]
pub fn enable_retention_ram<M: Mmio>(m: &mut M) {
    m.write8(SYSCR3, SYSCR3_RRAM_WRITE_ENABLE);
    let _ = m.read8(SYSCR3);
}

/// Words needed to cover the byte range `[start, end)`.
pub const fn section_words(start: u32, end: u32) -> usize {
    (end.saturating_sub(start) as usize).div_ceil(4)
}

/// Copy `words` words from `src` to `dst`.
///
/// # Safety
/// Both ranges must be valid for `words` words, aligned and not overlapping.
#[inline(always)]
pub unsafe fn copy_words(src: *const u32, dst: *mut u32, words: usize) {
    for i in 0..words {
        unsafe { ptr::write_volatile(dst.add(i), ptr::read_volatile(src.add(i))) };
    }
}

/// Halt and restart the SPIBSC, then select a conservative read set-up.
#[inline(always)]
pub fn stage1<M: Mmio>(m: &mut M) {
    m.write8(STBCR9, STBCR9_ALL_STOPPED);
    let _ = m.read8(STBCR9);
    m.write8(STBCR9, STBCR9_SPIBSC0_RUNNING);
    let _ = m.read8(STBCR9);

    if m.field16(DSFR, DSFR_IOKEEP) == 1 {
        m.modify16(DSFR, DSFR_IOKEEP, 0);
        let _ = m.read16(DSFR);
    }

    {
        let mut bsc = Spibsc::new(&mut *m);
        bsc.stop();
        bsc.wait_tend();
    }

    m.write32(SSLDR, 0);
    m.modify32(SPBCR, SPBCR_BRDV, STAGE1_BRDV);
    m.modify32(SPBCR, SPBCR_SPBR, STAGE1_SPBR);
    m.modify32(DRCR, DRCR_RBE, 1);
}

/// Put controller and flash into the profile's fast read mode.
#[inline(always)]
pub fn stage2<M: Mmio>(m: &mut M, profile: &FlashProfile) -> Result<(), BootError> {
    let mut bsc = Spibsc::new(m);
    bsc.wait_tend();

    bsc.set_config(profile).map_err(BootError::SpiInit)?;

    if profile.quad_mode_support() {
        bsc.exmode_setting(profile).map_err(BootError::SpiInit)?;
    }

    Ok(())
}
