// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! SPI multi-I/O bus controller (SPIBSC) driver.
//!
//! The controller has two personalities: external address space read mode,
//! where the flash is memory mapped and instruction fetches go over the bus,
//! and SPI mode, where software issues individual command sequences. While
//! the controller is being switched or reconfigured, nothing can be fetched
//! from the flash, so every method here is `#[inline(always)]` and ends up in
//! the RAM-resident caller.

use core::hint::spin_loop;

use crate::error::SpibscError;
use crate::pins;
use crate::regs::spibsc::*;
use crate::regs::Mmio;
use crate::sflash::{self, FlashProfile, ModeRequest};

/// Lines used for one phase of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BusWidth {
    Single = 0,
    Dual = 1,
    Quad = 2,
}

/// Number of flash devices sharing the bus (CMNCR.BSZ).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BusSize {
    Single = 0,
    Dual = 1,
}

/// Single or double data rate for the address, option and data phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TransferRate {
    Sdr = 0,
    Ddr = 1,
}

/// Address phase enable bits (DRENR.ADE / SMENR.ADE).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressMode {
    None = 0x0,
    Bits24 = 0x7,
    Bits32 = 0xF,
}

/// Input/output timing adjustment words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusDelays {
    pub ckdly: u32,
    pub spodly: u32,
}

impl BusDelays {
    pub const DEFAULT: Self = Self {
        ckdly: CKDLY_DEFAULT,
        spodly: SPODLY_DEFAULT,
    };
    pub const TUNED: Self = Self {
        ckdly: CKDLY_TUNED,
        spodly: SPODLY_TUNED,
    };
}

/// External address space read configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpibscConfig {
    pub cmd: u8,
    pub cmd_width: BusWidth,
    pub addr_width: BusWidth,
    pub addr_mode: AddressMode,
    /// Option data bytes, OPD3 first.
    pub opd: [u8; 4],
    /// OPDE mask: 0x8 sends OPD3, 0xC OPD3-2, 0xE OPD3-1, 0xF all four.
    pub opd_enable: u8,
    pub opd_width: BusWidth,
    /// Dummy cycle count minus one.
    pub dummy_cycles: u8,
    pub dummy_enable: bool,
    pub dummy_width: BusWidth,
    pub data_width: BusWidth,
    pub spbr: u8,
    pub brdv: u8,
    pub rate: TransferRate,
}

impl SpibscConfig {
    /// Reject settings the register fields cannot hold.
    #[inline(always)]
    pub fn validate(&self) -> Result<(), SpibscError> {
        if self.opd_enable > 0xF || self.dummy_cycles > 7 || self.brdv > 3 {
            return Err(SpibscError::InvalidConfig);
        }
        Ok(())
    }
}

/// One manual SPI-mode transfer. `None` phases are disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpiTransfer {
    pub cmd: Option<(u8, BusWidth)>,
    pub opt_cmd: Option<(u8, BusWidth)>,
    pub addr: Option<(u32, BusWidth, AddressMode)>,
    /// Option data bytes (OPD3 first), enable mask, width.
    pub opd: Option<([u8; 4], u8, BusWidth)>,
    /// Dummy cycle count minus one, width.
    pub dummy: Option<(u8, BusWidth)>,
    /// SMWDR0/1 payload, SPIDE value, width.
    pub data: Option<([u32; 2], u32, BusWidth)>,
    pub read: bool,
    pub write: bool,
    pub keep_ssl: bool,
    pub ddr: bool,
}

/// Driver handle over channel 0.
pub struct Spibsc<'a, M: Mmio> {
    m: &'a mut M,
}

impl<'a, M: Mmio> Spibsc<'a, M> {
    #[inline(always)]
    pub fn new(m: &'a mut M) -> Self {
        Self { m }
    }

    #[inline(always)]
    pub fn transfer_ended(&mut self) -> bool {
        self.m.field32(CMNSR, CMNSR_TEND) == TRANSFER_END
    }

    #[inline(always)]
    pub fn ssl_negated(&mut self) -> bool {
        self.m.field32(CMNSR, CMNSR_SSLF) == SSL_NEGATED
    }

    /// Spin until the last transfer has ended.
    #[inline(always)]
    pub fn wait_tend(&mut self) {
        while !self.transfer_ended() {
            spin_loop();
        }
    }

    /// Negate SPBSSL and spin until the controller reports it negated.
    #[inline(always)]
    pub fn stop(&mut self) {
        self.m.modify32(DRCR, DRCR_SSLN, 1);
        while !self.ssl_negated() {
            spin_loop();
        }
    }

    #[inline(always)]
    pub fn is_external_read_mode(&mut self) -> bool {
        self.m.field32(CMNCR, CMNCR_MD) == MD_EXTERNAL_READ
    }

    /// Switch to external address space read mode if not already there.
    #[inline(always)]
    pub fn exmode(&mut self) {
        if !self.is_external_read_mode() {
            self.stop();
            self.m.modify32(CMNCR, CMNCR_MD, MD_EXTERNAL_READ);
        }
    }

    /// Switch to SPI operating mode if not already there.
    #[inline(always)]
    pub fn spimode(&mut self) {
        if self.is_external_read_mode() {
            self.stop();
            self.m.modify32(CMNCR, CMNCR_MD, MD_SPI);
        }
    }

    /// Change the number of flash devices on the bus. Flushes the read
    /// cache when the size actually changes.
    #[inline(always)]
    pub fn set_bus_size(&mut self, bus_size: BusSize, width: BusWidth) -> Result<(), SpibscError> {
        if !self.transfer_ended() {
            return Err(SpibscError::TransferBusy);
        }

        if self.m.field32(CMNCR, CMNCR_BSZ) != bus_size as u32 {
            if bus_size == BusSize::Dual {
                pins::spibsc_port_setting(&mut *self.m, width, bus_size);
            }
            self.m.modify32(CMNCR, CMNCR_BSZ, bus_size as u32);
            self.m.modify32(DRCR, DRCR_RCF, 1);
        }

        Ok(())
    }

    /// Operating-mode independent part of the controller set-up: pins, idle
    /// levels, SPI mode 0, SSL polarity, bus size, delays and bit rate.
    #[inline(always)]
    pub fn common_init(
        &mut self,
        bus_size: BusSize,
        width: BusWidth,
        spbr: u8,
        brdv: u8,
        delays: BusDelays,
    ) -> Result<(), SpibscError> {
        pins::spibsc_port_setting(&mut *self.m, width, bus_size);

        if !self.transfer_ended() {
            return Err(SpibscError::TransferBusy);
        }

        for field in [
            CMNCR_MOIIO3,
            CMNCR_MOIIO2,
            CMNCR_MOIIO1,
            CMNCR_MOIIO0,
            CMNCR_IO3FV,
            CMNCR_IO2FV,
            CMNCR_IO0FV,
        ] {
            self.m.modify32(CMNCR, field, OUTPUT_HI_Z);
        }

        self.m.modify32(CMNCR, CMNCR_SFDE, 1);
        self.m.modify32(CMNCR, CMNCR_CPHAT, CPHA_EVEN);
        self.m.modify32(CMNCR, CMNCR_CPHAR, CPHA_EVEN);
        self.m.modify32(CMNCR, CMNCR_SSLP, SSLP_LOW);
        self.m.modify32(CMNCR, CMNCR_CPOL, CPOL_LOW);

        self.set_bus_size(bus_size, width)?;

        self.m.modify32(SSLDR, SSLDR_SPNDL, DELAY_1_SPBCLK);
        self.m.modify32(SSLDR, SSLDR_SLNDL, DELAY_1_SPBCLK);
        self.m.modify32(SSLDR, SSLDR_SCKDL, DELAY_1_SPBCLK);

        self.m.modify32(SPBCR, SPBCR_SPBR, spbr as u32);
        self.m.modify32(SPBCR, SPBCR_BRDV, brdv as u32);

        self.m.write32(CKDLY, delays.ckdly);
        self.m.write32(SPODLY, delays.spodly);

        Ok(())
    }

    /// Sample read data on the odd edge, as DDR reads require.
    #[inline(always)]
    pub fn sample_reads_on_odd_edge(&mut self) {
        self.m.modify32(CMNCR, CMNCR_CPHAR, CPHA_ODD);
    }

    /// Program the external read sequence and enter external read mode.
    #[inline(always)]
    pub fn init_external_read(&mut self, cfg: &SpibscConfig) -> Result<(), SpibscError> {
        if !self.transfer_ended() {
            return Err(SpibscError::TransferBusy);
        }

        let m = &mut *self.m;
        m.modify32(CMNCR, CMNCR_MD, MD_EXTERNAL_READ);

        m.modify32(DRCR, DRCR_RBURST, BURST_4);
        m.modify32(DRCR, DRCR_RBE, 1);
        // Keep SSL asserted while reads stay sequential.
        m.modify32(DRCR, DRCR_SSLE, 1);

        m.modify32(DRCMR, DRCMR_CMD, cfg.cmd as u32);
        m.modify32(DRENR, ENR_CDB, cfg.cmd_width as u32);
        m.modify32(DRENR, ENR_CDE, 1);

        m.modify32(DRCMR, DRCMR_OCMD, 0);
        m.modify32(DRENR, ENR_OCDB, BusWidth::Single as u32);
        m.modify32(DRENR, ENR_OCDE, 0);

        m.modify32(DRENR, ENR_ADB, cfg.addr_width as u32);
        m.modify32(DRENR, ENR_ADE, cfg.addr_mode as u32);
        m.modify32(DREAR, DREAR_EAV, 0);

        m.modify32(DROPR, OPR_OPD3, cfg.opd[0] as u32);
        m.modify32(DROPR, OPR_OPD2, cfg.opd[1] as u32);
        m.modify32(DROPR, OPR_OPD1, cfg.opd[2] as u32);
        m.modify32(DROPR, OPR_OPD0, cfg.opd[3] as u32);
        m.modify32(DRENR, ENR_OPDB, cfg.opd_width as u32);
        m.modify32(DRENR, ENR_OPDE, cfg.opd_enable as u32);

        m.modify32(DRENR, ENR_DATA_WIDTH, cfg.data_width as u32);
        m.modify32(DRENR, ENR_DME, cfg.dummy_enable as u32);
        m.modify32(DRDMCR, DMCR_DMDB, cfg.dummy_width as u32);
        m.modify32(DRDMCR, DMCR_DMCYC, cfg.dummy_cycles as u32);

        let rate = cfg.rate as u32;
        m.modify32(DRDRENR, DRENR_ADDRE, rate);
        m.modify32(DRDRENR, DRENR_OPDRE, rate);
        m.modify32(DRDRENR, DRENR_DATA_DDR, rate);

        Ok(())
    }

    /// Run one SPI-mode transfer and return SMRDR0/SMRDR1.
    #[inline(always)]
    pub fn transfer(&mut self, t: &SpiTransfer) -> Result<[u32; 2], SpibscError> {
        if self.is_external_read_mode() {
            if !self.ssl_negated() {
                return Err(SpibscError::SslAsserted);
            }
            self.m.modify32(CMNCR, CMNCR_MD, MD_SPI);
        }

        if !self.transfer_ended() {
            return Err(SpibscError::TransferBusy);
        }

        let m = &mut *self.m;

        m.modify32(SMENR, ENR_CDE, t.cmd.is_some() as u32);
        if let Some((cmd, width)) = t.cmd {
            m.modify32(SMCMR, SMCMR_CMD, cmd as u32);
            m.modify32(SMENR, ENR_CDB, width as u32);
        }

        m.modify32(SMENR, ENR_OCDE, t.opt_cmd.is_some() as u32);
        if let Some((ocmd, width)) = t.opt_cmd {
            m.modify32(SMCMR, SMCMR_OCMD, ocmd as u32);
            m.modify32(SMENR, ENR_OCDB, width as u32);
        }

        match t.addr {
            Some((addr, width, mode)) => {
                m.modify32(SMENR, ENR_ADE, mode as u32);
                m.modify32(SMADR, SMADR_ADR, addr);
                m.modify32(SMENR, ENR_ADB, width as u32);
            }
            None => m.modify32(SMENR, ENR_ADE, AddressMode::None as u32),
        }

        match t.opd {
            Some((opd, enable, width)) => {
                m.modify32(SMENR, ENR_OPDE, enable as u32);
                m.modify32(SMOPR, OPR_OPD3, opd[0] as u32);
                m.modify32(SMOPR, OPR_OPD2, opd[1] as u32);
                m.modify32(SMOPR, OPR_OPD1, opd[2] as u32);
                m.modify32(SMOPR, OPR_OPD0, opd[3] as u32);
                m.modify32(SMENR, ENR_OPDB, width as u32);
            }
            None => m.modify32(SMENR, ENR_OPDE, 0),
        }

        m.modify32(SMENR, ENR_DME, t.dummy.is_some() as u32);
        if let Some((cycles, width)) = t.dummy {
            m.modify32(SMDMCR, DMCR_DMDB, width as u32);
            m.modify32(SMDMCR, DMCR_DMCYC, cycles as u32);
        }

        let mut data_width = BusWidth::Single;
        match t.data {
            Some((words, spide, width)) => {
                m.modify32(SMENR, SMENR_SPIDE, spide);
                m.write32(SMWDR0, words[0]);
                m.write32(SMWDR1, words[1]);
                m.modify32(SMENR, ENR_DATA_WIDTH, width as u32);
                data_width = width;
            }
            None => m.modify32(SMENR, SMENR_SPIDE, SPIDE_DISABLED),
        }

        m.modify32(SMCR, SMCR_SSLKP, t.keep_ssl as u32);

        if t.data.is_some() && data_width != BusWidth::Single && t.read && t.write {
            return Err(SpibscError::ReadWriteConflict);
        }

        m.modify32(SMCR, SMCR_SPIRE, t.read as u32);
        m.modify32(SMCR, SMCR_SPIWE, t.write as u32);

        let ddr = t.ddr as u32;
        m.modify32(SMDRENR, DRENR_ADDRE, ddr);
        m.modify32(SMDRENR, DRENR_OPDRE, ddr);
        m.modify32(SMDRENR, DRENR_DATA_DDR, ddr);

        m.modify32(SMCR, SMCR_SPIE, 1);

        self.wait_tend();

        Ok([self.m.read32(SMRDR0), self.m.read32(SMRDR1)])
    }

    /// Build the profile's external read configuration and check it.
    #[inline(always)]
    pub fn set_config(&mut self, profile: &FlashProfile) -> Result<SpibscConfig, SpibscError> {
        let cfg = profile.spibsc_config();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Full switch to high-speed external reads: controller set-up, flash
    /// mode change over SPI mode, then the external read sequence.
    #[inline(always)]
    pub fn exmode_setting(&mut self, profile: &FlashProfile) -> Result<(), SpibscError> {
        let cfg = self.set_config(profile)?;

        self.common_init(
            profile.bus_size(),
            cfg.data_width,
            cfg.spbr,
            cfg.brdv,
            profile.delays(),
        )?;

        if cfg.rate == TransferRate::Ddr {
            self.sample_reads_on_odd_edge();
        }

        let request = match cfg.data_width {
            BusWidth::Single => ModeRequest::Serial,
            BusWidth::Quad => ModeRequest::Quad,
            BusWidth::Dual => return Err(SpibscError::UnsupportedWidth),
        };
        sflash::set_mode(self, profile, request)?;

        self.set_bus_size(profile.bus_size(), cfg.data_width)?;
        self.init_external_read(&cfg)
    }
}
