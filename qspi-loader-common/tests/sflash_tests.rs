// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Tests for flash profiles and the quad-mode switch.

mod common;

use common::{FlashModel, MockMmio};
use qspi_loader_common::regs::spibsc::*;
use qspi_loader_common::sflash::{
    set_mode, BusMode, FlashDevice, FlashProfile, ModeRequest, CMD_READ_STATUS, CMD_WRITE_ENABLE,
    CMD_WRITE_STATUS, MACRONIX_READ_CONFIG, MACRONIX_STATUS_QUAD_BIT, SPANSION_CONFIG_QUAD_BIT,
    WIP_POLL_LIMIT,
};
use qspi_loader_common::spibsc::{AddressMode, BusDelays, BusSize, Spibsc, TransferRate};
use qspi_loader_common::SpibscError;

// =============================================================================
// FlashProfile tests
// =============================================================================

#[test]
fn test_macronix_read_commands_follow_rate() {
    assert_eq!(FlashProfile::macronix(BusMode::SdrSingle).read_command(), 0xEB);
    assert_eq!(FlashProfile::macronix(BusMode::SdrDual).read_command(), 0xEB);
    assert_eq!(FlashProfile::macronix(BusMode::DdrSingle).read_command(), 0xED);
    assert_eq!(FlashProfile::macronix(BusMode::DdrDual).read_command(), 0xED);
}

#[test]
fn test_spansion_profile_is_sdr_single_32bit() {
    let p = FlashProfile::spansion();
    assert_eq!(p.mode, BusMode::SdrSingle);
    assert_eq!(p.address_mode(), AddressMode::Bits32);
    assert_eq!(p.read_command(), 0xEC);
    assert!(!p.quad_mode_support());
}

#[test]
fn test_spansion_rejects_other_modes() {
    assert!(FlashProfile::new(FlashDevice::Spansion, BusMode::SdrSingle).is_some());
    assert!(FlashProfile::new(FlashDevice::Spansion, BusMode::DdrDual).is_none());
    assert!(FlashProfile::new(FlashDevice::Spansion, BusMode::SdrDual).is_none());
    assert!(FlashProfile::new(FlashDevice::Macronix, BusMode::DdrDual).is_some());
}

#[test]
fn test_delays_default_for_single_tuned_for_dual() {
    assert_eq!(
        FlashProfile::macronix(BusMode::SdrSingle).delays(),
        BusDelays::DEFAULT
    );
    assert_eq!(
        FlashProfile::macronix(BusMode::DdrSingle).delays(),
        BusDelays::DEFAULT
    );
    assert_eq!(FlashProfile::macronix(BusMode::SdrDual).delays(), BusDelays::TUNED);
    assert_eq!(FlashProfile::macronix(BusMode::DdrDual).delays(), BusDelays::TUNED);
}

#[test]
fn test_bus_mode_derivations() {
    assert_eq!(BusMode::SdrDual.bus_size(), BusSize::Dual);
    assert_eq!(BusMode::DdrSingle.bus_size(), BusSize::Single);
    assert_eq!(BusMode::DdrSingle.rate(), TransferRate::Ddr);
    assert_eq!(BusMode::SdrDual.rate(), TransferRate::Sdr);
}

#[test]
fn test_ddr_config_is_slower_with_more_dummies() {
    let sdr = FlashProfile::macronix(BusMode::SdrSingle).spibsc_config();
    let ddr = FlashProfile::macronix(BusMode::DdrSingle).spibsc_config();
    assert_eq!((sdr.spbr, sdr.dummy_cycles), (1, 3));
    assert_eq!((ddr.spbr, ddr.dummy_cycles), (2, 5));
    assert_eq!(sdr.brdv, 0);
    assert_eq!(ddr.brdv, 0);
}

#[test]
fn test_quad_bit_locations() {
    let mx = FlashDevice::Macronix;
    let sp = FlashDevice::Spansion;
    assert!(mx.quad_enabled(MACRONIX_STATUS_QUAD_BIT, 0));
    assert!(!mx.quad_enabled(0, 0xFF));
    assert!(sp.quad_enabled(0, SPANSION_CONFIG_QUAD_BIT));
    assert!(!sp.quad_enabled(0xFF, 0));
    assert_eq!(mx.with_quad_enabled(0x02, 0x07), (0x42, 0x07));
    assert_eq!(sp.with_quad_enabled(0x02, 0x00), (0x02, 0x02));
}

// =============================================================================
// set_mode tests
// =============================================================================

#[test]
fn test_set_mode_enables_quad_on_single_device() {
    let mut m = MockMmio::with_flash(FlashModel::new(0x00, 0x07));
    let profile = FlashProfile::macronix(BusMode::SdrSingle);
    set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad).unwrap();

    assert_eq!(m.flash.status[0] & MACRONIX_STATUS_QUAD_BIT, MACRONIX_STATUS_QUAD_BIT);
    assert_eq!(m.flash.config[0], 0x07);
    assert_eq!(
        &m.flash.commands[..4],
        &[
            CMD_READ_STATUS,
            MACRONIX_READ_CONFIG,
            CMD_WRITE_ENABLE,
            CMD_WRITE_STATUS
        ]
    );
    // Write status goes out as status byte then config byte, 16 bits wide.
    assert!(m.writes_to(SMWDR0).contains(&0x0740));
    assert_eq!(m.flash.write_spides, vec![SPIDE_16BIT]);
}

#[test]
fn test_set_mode_dual_write_status_is_32bit() {
    let mut m = MockMmio::with_flash(FlashModel::new(0x00, 0x07));
    let profile = FlashProfile::macronix(BusMode::SdrDual);
    set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad).unwrap();

    // [s0, s1, c0, c1], lowest byte first.
    assert!(m.writes_to(SMWDR0).contains(&0x0707_4040));
    assert_eq!(m.flash.write_spides, vec![SPIDE_32BIT]);
}

#[test]
fn test_set_mode_skips_write_when_quad_already_on() {
    let mut m = MockMmio::with_flash(FlashModel::new(MACRONIX_STATUS_QUAD_BIT, 0));
    let profile = FlashProfile::macronix(BusMode::SdrSingle);
    set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad).unwrap();
    assert_eq!(m.flash.commands, vec![CMD_READ_STATUS, MACRONIX_READ_CONFIG]);
}

#[test]
fn test_set_mode_dual_writes_each_device() {
    let mut flash = FlashModel::new(0, 0);
    flash.status = [MACRONIX_STATUS_QUAD_BIT, 0x00];
    let mut m = MockMmio::with_flash(flash);
    let profile = FlashProfile::macronix(BusMode::DdrDual);
    set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad).unwrap();

    assert_eq!(m.flash.status, [MACRONIX_STATUS_QUAD_BIT; 2]);
    assert!(m.flash.commands.contains(&CMD_WRITE_STATUS));
}

#[test]
fn test_set_mode_reports_refused_quad_enable() {
    let mut flash = FlashModel::new(0, 0);
    flash.locked_status = MACRONIX_STATUS_QUAD_BIT;
    let mut m = MockMmio::with_flash(flash);
    let profile = FlashProfile::macronix(BusMode::SdrSingle);
    let r = set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad);
    assert_eq!(r, Err(SpibscError::QuadEnableFailed));
}

#[test]
fn test_set_mode_polls_until_write_completes() {
    let mut flash = FlashModel::new(0, 0);
    flash.busy_polls = 5;
    let mut m = MockMmio::with_flash(flash);
    let profile = FlashProfile::macronix(BusMode::SdrSingle);
    set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad).unwrap();

    // Initial read, five busy polls, one ready poll, final check.
    assert_eq!(m.flash.status_reads(), 8);
    assert_eq!(m.flash.status[0] & MACRONIX_STATUS_QUAD_BIT, MACRONIX_STATUS_QUAD_BIT);
}

#[test]
fn test_set_mode_gives_up_on_stuck_write() {
    let mut flash = FlashModel::new(0, 0);
    flash.stuck_busy = true;
    let mut m = MockMmio::with_flash(flash);
    m.recording = false;
    let profile = FlashProfile::macronix(BusMode::SdrSingle);

    let r = set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Quad);
    assert_eq!(r, Err(SpibscError::FlashBusy));
    assert_eq!(m.flash.status_reads(), 1 + WIP_POLL_LIMIT as usize);
}

#[test]
fn test_set_mode_serial_request_touches_nothing() {
    let mut m = MockMmio::new();
    let profile = FlashProfile::macronix(BusMode::SdrSingle);
    set_mode(&mut Spibsc::new(&mut m), &profile, ModeRequest::Serial).unwrap();
    assert!(m.log.is_empty());
}

#[test]
fn test_set_mode_without_quad_support_touches_nothing() {
    let mut m = MockMmio::new();
    set_mode(
        &mut Spibsc::new(&mut m),
        &FlashProfile::spansion(),
        ModeRequest::Quad,
    )
    .unwrap();
    assert!(m.log.is_empty());
}

// =============================================================================
// exmode_setting tests
// =============================================================================

#[test]
fn test_exmode_setting_ddr_dual_ends_in_external_read() {
    let mut m = MockMmio::with_flash(FlashModel::new(0, 0));
    let profile = FlashProfile::macronix(BusMode::DdrDual);
    Spibsc::new(&mut m).exmode_setting(&profile).unwrap();

    assert_eq!(m.field(CMNCR, CMNCR_MD), MD_EXTERNAL_READ);
    assert_eq!(m.field(CMNCR, CMNCR_CPHAR), CPHA_ODD);
    assert_eq!(m.field(CMNCR, CMNCR_BSZ), 1);
    assert_eq!(m.field(DRCMR, DRCMR_CMD), 0xED);
    assert_eq!(m.reg(CKDLY), CKDLY_TUNED);
    assert_eq!(m.flash.status, [MACRONIX_STATUS_QUAD_BIT; 2]);
}

#[test]
fn test_exmode_setting_sdr_keeps_even_read_edge() {
    let mut m = MockMmio::with_flash(FlashModel::new(MACRONIX_STATUS_QUAD_BIT, 0));
    let profile = FlashProfile::macronix(BusMode::SdrSingle);
    Spibsc::new(&mut m).exmode_setting(&profile).unwrap();

    assert_eq!(m.field(CMNCR, CMNCR_CPHAR), CPHA_EVEN);
    assert_eq!(m.field(CMNCR, CMNCR_BSZ), 0);
    assert_eq!(m.reg(CKDLY), CKDLY_DEFAULT);
    assert_eq!(m.field(DRCMR, DRCMR_CMD), 0xEB);
}
