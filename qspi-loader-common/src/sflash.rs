// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Serial flash devices, bus profiles and the quad-mode switch.

use core::hint::spin_loop;

use crate::error::SpibscError;
use crate::regs::spibsc::{SPIDE_16BIT, SPIDE_32BIT, SPIDE_8BIT};
use crate::regs::Mmio;
use crate::spibsc::{
    AddressMode, BusDelays, BusSize, BusWidth, SpiTransfer, Spibsc, SpibscConfig, TransferRate,
};

pub const CMD_WRITE_ENABLE: u8 = 0x06;
pub const CMD_READ_STATUS: u8 = 0x05;
pub const CMD_WRITE_STATUS: u8 = 0x01;

pub const MACRONIX_QUAD_IO_READ: u8 = 0xEB;
pub const MACRONIX_QUAD_IO_READ_DTR: u8 = 0xED;
pub const MACRONIX_READ_CONFIG: u8 = 0x15;
/// QE lives in the status register on Macronix parts.
pub const MACRONIX_STATUS_QUAD_BIT: u8 = 0x40;

pub const SPANSION_QUAD_IO_READ_4B: u8 = 0xEC;
pub const SPANSION_READ_CONFIG: u8 = 0x35;
/// QUAD lives in configuration register 1 on Spansion parts.
pub const SPANSION_CONFIG_QUAD_BIT: u8 = 0x02;

/// Write-in-progress, status register bit 0 on both vendors.
pub const STATUS_WIP: u8 = 0x01;

/// Status polls before a pending register write counts as hung.
pub const WIP_POLL_LIMIT: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashDevice {
    Macronix,
    Spansion,
}

impl FlashDevice {
    #[inline(always)]
    pub const fn read_config_command(&self) -> u8 {
        match self {
            FlashDevice::Macronix => MACRONIX_READ_CONFIG,
            FlashDevice::Spansion => SPANSION_READ_CONFIG,
        }
    }

    #[inline(always)]
    pub const fn quad_enabled(&self, status: u8, config: u8) -> bool {
        match self {
            FlashDevice::Macronix => status & MACRONIX_STATUS_QUAD_BIT != 0,
            FlashDevice::Spansion => config & SPANSION_CONFIG_QUAD_BIT != 0,
        }
    }

    /// Status and configuration values with the quad bit set.
    #[inline(always)]
    pub const fn with_quad_enabled(&self, status: u8, config: u8) -> (u8, u8) {
        match self {
            FlashDevice::Macronix => (status | MACRONIX_STATUS_QUAD_BIT, config),
            FlashDevice::Spansion => (status, config | SPANSION_CONFIG_QUAD_BIT),
        }
    }
}

/// Transfer rate and number of devices on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    SdrSingle,
    DdrSingle,
    SdrDual,
    DdrDual,
}

impl BusMode {
    #[inline(always)]
    pub const fn bus_size(&self) -> BusSize {
        match self {
            BusMode::SdrSingle | BusMode::DdrSingle => BusSize::Single,
            BusMode::SdrDual | BusMode::DdrDual => BusSize::Dual,
        }
    }

    #[inline(always)]
    pub const fn rate(&self) -> TransferRate {
        match self {
            BusMode::SdrSingle | BusMode::SdrDual => TransferRate::Sdr,
            BusMode::DdrSingle | BusMode::DdrDual => TransferRate::Ddr,
        }
    }
}

/// What the external read path should use after the mode switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    Serial,
    Quad,
}

/// The flash fitted on the board and how the loader drives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashProfile {
    pub device: FlashDevice,
    pub mode: BusMode,
}

impl FlashProfile {
    /// Spansion parts are only supported in SDR single mode.
    #[inline(always)]
    pub const fn new(device: FlashDevice, mode: BusMode) -> Option<Self> {
        match (device, mode) {
            (FlashDevice::Spansion, BusMode::SdrSingle) | (FlashDevice::Macronix, _) => {
                Some(Self { device, mode })
            }
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn macronix(mode: BusMode) -> Self {
        Self {
            device: FlashDevice::Macronix,
            mode,
        }
    }

    #[inline(always)]
    pub const fn spansion() -> Self {
        Self {
            device: FlashDevice::Spansion,
            mode: BusMode::SdrSingle,
        }
    }

    /// Only the Macronix set-up switches the flash into quad mode.
    #[inline(always)]
    pub const fn quad_mode_support(&self) -> bool {
        matches!(self.device, FlashDevice::Macronix)
    }

    #[inline(always)]
    pub const fn bus_size(&self) -> BusSize {
        self.mode.bus_size()
    }

    #[inline(always)]
    pub const fn rate(&self) -> TransferRate {
        self.mode.rate()
    }

    #[inline(always)]
    pub const fn address_mode(&self) -> AddressMode {
        match self.device {
            FlashDevice::Macronix => AddressMode::Bits24,
            FlashDevice::Spansion => AddressMode::Bits32,
        }
    }

    #[inline(always)]
    pub const fn read_command(&self) -> u8 {
        match (self.device, self.rate()) {
            (FlashDevice::Macronix, TransferRate::Sdr) => MACRONIX_QUAD_IO_READ,
            (FlashDevice::Macronix, TransferRate::Ddr) => MACRONIX_QUAD_IO_READ_DTR,
            (FlashDevice::Spansion, _) => SPANSION_QUAD_IO_READ_4B,
        }
    }

    #[inline(always)]
    pub const fn uses_default_delays(&self) -> bool {
        matches!(self.bus_size(), BusSize::Single)
    }

    #[inline(always)]
    pub const fn delays(&self) -> BusDelays {
        if self.uses_default_delays() {
            BusDelays::DEFAULT
        } else {
            BusDelays::TUNED
        }
    }

    /// Quad I/O read: 1-bit command, 4-bit address, one mode byte, then
    /// dummy cycles and 4-bit data.
    #[inline(always)]
    pub const fn spibsc_config(&self) -> SpibscConfig {
        let rate = self.rate();
        let (dummy_cycles, spbr) = match rate {
            TransferRate::Sdr => (3, 1),
            TransferRate::Ddr => (5, 2),
        };

        SpibscConfig {
            cmd: self.read_command(),
            cmd_width: BusWidth::Single,
            addr_width: BusWidth::Quad,
            addr_mode: self.address_mode(),
            opd: [0; 4],
            opd_enable: 0x8,
            opd_width: BusWidth::Quad,
            dummy_cycles,
            dummy_enable: true,
            dummy_width: BusWidth::Quad,
            data_width: BusWidth::Quad,
            spbr,
            brdv: 0,
            rate,
        }
    }
}

/// Per-device register values. With one device both lanes hold the same byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lanes(pub [u8; 2]);

impl Lanes {
    #[inline(always)]
    fn count(dual: bool) -> usize {
        if dual {
            2
        } else {
            1
        }
    }
}

/// Read one 8-bit register from every device on the bus.
///
/// SFDE is set, so the first byte on the wire lands in the low byte of
/// SMRDR0; with two devices the bytes alternate between them.
#[inline(always)]
pub fn read_register<M: Mmio>(
    bsc: &mut Spibsc<'_, M>,
    dual: bool,
    cmd: u8,
) -> Result<Lanes, SpibscError> {
    let spide = if dual { SPIDE_16BIT } else { SPIDE_8BIT };
    let [raw, _] = bsc.transfer(&SpiTransfer {
        cmd: Some((cmd, BusWidth::Single)),
        data: Some(([0, 0], spide, BusWidth::Single)),
        read: true,
        ..SpiTransfer::default()
    })?;

    let first = raw as u8;
    let second = if dual { (raw >> 8) as u8 } else { first };
    Ok(Lanes([first, second]))
}

#[inline(always)]
pub fn write_enable<M: Mmio>(bsc: &mut Spibsc<'_, M>) -> Result<(), SpibscError> {
    bsc.transfer(&SpiTransfer {
        cmd: Some((CMD_WRITE_ENABLE, BusWidth::Single)),
        ..SpiTransfer::default()
    })?;
    Ok(())
}

/// Write status then configuration register on every device.
#[inline(always)]
pub fn write_registers<M: Mmio>(
    bsc: &mut Spibsc<'_, M>,
    dual: bool,
    status: Lanes,
    config: Lanes,
) -> Result<(), SpibscError> {
    let (word, spide) = if dual {
        let [s0, s1] = status.0;
        let [c0, c1] = config.0;
        (u32::from_le_bytes([s0, s1, c0, c1]), SPIDE_32BIT)
    } else {
        (u32::from_le_bytes([status.0[0], config.0[0], 0, 0]), SPIDE_16BIT)
    };

    bsc.transfer(&SpiTransfer {
        cmd: Some((CMD_WRITE_STATUS, BusWidth::Single)),
        data: Some(([word, 0], spide, BusWidth::Single)),
        write: true,
        ..SpiTransfer::default()
    })?;
    Ok(())
}

/// Poll the status register until no device reports a write in progress.
#[inline(always)]
pub fn wait_ready<M: Mmio>(bsc: &mut Spibsc<'_, M>, dual: bool) -> Result<(), SpibscError> {
    for _ in 0..WIP_POLL_LIMIT {
        let status = read_register(bsc, dual, CMD_READ_STATUS)?;
        if status.0[..Lanes::count(dual)].iter().all(|s| s & STATUS_WIP == 0) {
            return Ok(());
        }
        spin_loop();
    }
    Err(SpibscError::FlashBusy)
}

/// Switch the flash into the mode the external read sequence expects.
///
/// Serial requests and devices without quad-mode support need no change.
#[inline(always)]
pub fn set_mode<M: Mmio>(
    bsc: &mut Spibsc<'_, M>,
    profile: &FlashProfile,
    request: ModeRequest,
) -> Result<(), SpibscError> {
    if request == ModeRequest::Serial || !profile.quad_mode_support() {
        return Ok(());
    }

    let device = profile.device;
    let dual = profile.bus_size() == BusSize::Dual;
    let lanes = Lanes::count(dual);

    let status = read_register(bsc, dual, CMD_READ_STATUS)?;
    let config = read_register(bsc, dual, device.read_config_command())?;

    if (0..lanes).all(|i| device.quad_enabled(status.0[i], config.0[i])) {
        return Ok(());
    }

    let mut new_status = status;
    let mut new_config = config;
    for i in 0..2 {
        let (s, c) = device.with_quad_enabled(status.0[i], config.0[i]);
        new_status.0[i] = s;
        new_config.0[i] = c;
    }

    write_enable(bsc)?;
    write_registers(bsc, dual, new_status, new_config)?;
    wait_ready(bsc, dual)?;

    let status = read_register(bsc, dual, CMD_READ_STATUS)?;
    let config = read_register(bsc, dual, device.read_config_command())?;
    if (0..lanes).all(|i| device.quad_enabled(status.0[i], config.0[i])) {
        Ok(())
    } else {
        Err(SpibscError::QuadEnableFailed)
    }
}
