// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for retention RAM enable, section copy and the two flash stages.

mod common;

use common::{Access, FlashModel, MockMmio};
use qspi_loader_common::regs::cpg::{DSFR, STBCR9, SYSCR3};
use qspi_loader_common::regs::spibsc::*;
use qspi_loader_common::reinit::{
    copy_words, enable_retention_ram, section_words, stage1, stage2,
};
use qspi_loader_common::sflash::{BusMode, FlashProfile, MACRONIX_STATUS_QUAD_BIT};
use qspi_loader_common::{BootError, SpibscError};

// =============================================================================
// enable_retention_ram tests
// =============================================================================

#[test]
fn test_enable_retention_ram_writes_then_reads_back() {
    let mut m = MockMmio::new();
    enable_retention_ram(&mut m);
    assert_eq!(
        m.log,
        vec![Access::Write(SYSCR3, 0x0F), Access::Read(SYSCR3)]
    );
}

// =============================================================================
// Section copy tests
// =============================================================================

#[test]
fn test_section_words_rounds_up() {
    assert_eq!(section_words(0x2000_0000, 0x2000_0000), 0);
    assert_eq!(section_words(0x2000_0000, 0x2000_0004), 1);
    assert_eq!(section_words(0x2000_0000, 0x2000_0005), 2);
    assert_eq!(section_words(0x2000_0000, 0x2000_0100), 0x40);
}

#[test]
fn test_section_words_empty_when_end_before_start() {
    assert_eq!(section_words(0x2000_0010, 0x2000_0000), 0);
}

#[test]
fn test_copy_words_copies_exact_count() {
    let src: Vec<u32> = (1..=8).collect();
    let mut dst = vec![0u32; 8];
    unsafe { copy_words(src.as_ptr(), dst.as_mut_ptr(), 5) };
    assert_eq!(dst, vec![1, 2, 3, 4, 5, 0, 0, 0]);
}

// =============================================================================
// stage1 tests
// =============================================================================

#[test]
fn test_stage1_restarts_spibsc_clock() {
    let mut m = MockMmio::new();
    stage1(&mut m);
    assert_eq!(m.writes_to(STBCR9), vec![0xFF, 0xF7]);
    assert_eq!(m.reads_of(STBCR9), 2);
}

#[test]
fn test_stage1_clears_io_keep() {
    let mut m = MockMmio::new();
    m.set(DSFR, 0x8000);
    stage1(&mut m);
    assert_eq!(m.reg(DSFR), 0);
    assert_eq!(m.reads_of(DSFR), 3);
}

#[test]
fn test_stage1_leaves_dsfr_when_io_keep_clear() {
    let mut m = MockMmio::new();
    m.set(DSFR, 0x0001);
    stage1(&mut m);
    assert!(m.writes_to(DSFR).is_empty());
}

#[test]
fn test_stage1_selects_slow_read_setup() {
    let mut m = MockMmio::new();
    m.set(SSLDR, 0x0007_0707);
    m.set(SPBCR, 0x0000_0103);
    stage1(&mut m);

    assert_eq!(m.reg(SSLDR), 0);
    assert_eq!(m.field(SPBCR, SPBCR_SPBR), 2);
    assert_eq!(m.field(SPBCR, SPBCR_BRDV), 0);
    assert_eq!(m.field(DRCR, DRCR_SSLN), 1);
    assert_eq!(m.field(DRCR, DRCR_RBE), 1);
}

#[test]
fn test_stage1_negates_ssl_before_touching_timing() {
    let mut m = MockMmio::new();
    stage1(&mut m);
    let ssln = m.first_write(DRCR).unwrap();
    let ssldr = m.first_write(SSLDR).unwrap();
    assert!(ssln < ssldr);
}

// =============================================================================
// stage2 tests
// =============================================================================

#[test]
fn test_stage2_without_quad_support_only_validates() {
    let mut m = MockMmio::new();
    stage2(&mut m, &FlashProfile::spansion()).unwrap();
    assert!(m.writes_to(CMNCR).is_empty());
    assert!(m.flash.commands.is_empty());
}

#[test]
fn test_stage2_switches_macronix_to_quad_ddr() {
    let mut m = MockMmio::with_flash(FlashModel::new(0, 0));
    let profile = FlashProfile::macronix(BusMode::DdrDual);
    stage2(&mut m, &profile).unwrap();

    assert_eq!(m.field(CMNCR, CMNCR_MD), MD_EXTERNAL_READ);
    assert_eq!(m.field(DRCMR, DRCMR_CMD), 0xED);
    assert_eq!(m.flash.status, [MACRONIX_STATUS_QUAD_BIT; 2]);
}

#[test]
fn test_stage2_failure_maps_to_spi_init_error() {
    let mut flash = FlashModel::new(0, 0);
    flash.locked_status = MACRONIX_STATUS_QUAD_BIT;
    let mut m = MockMmio::with_flash(flash);
    let profile = FlashProfile::macronix(BusMode::SdrSingle);

    let err = stage2(&mut m, &profile).unwrap_err();
    assert_eq!(err, BootError::SpiInit(SpibscError::QuadEnableFailed));
}

#[test]
fn test_stage2_stuck_flash_maps_to_spi_init_error() {
    let mut flash = FlashModel::new(0, 0);
    flash.stuck_busy = true;
    let mut m = MockMmio::with_flash(flash);
    m.recording = false;
    let profile = FlashProfile::macronix(BusMode::SdrSingle);

    let err = stage2(&mut m, &profile).unwrap_err();
    assert_eq!(err, BootError::SpiInit(SpibscError::FlashBusy));
}
