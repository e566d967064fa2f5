// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Register access for the RZ/A1L blocks the loader touches.
//!
//! Everything above this module talks to hardware through the [`Mmio`] trait,
//! so the boot sequence can run against real registers on the target and
//! against a recording mock on the host.

/// A bit field inside a register: `(value << shift) & mask`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub shift: u32,
    pub mask: u32,
}

impl Field {
    /// Single-bit field.
    #[inline(always)]
    pub const fn bit(n: u32) -> Self {
        Self {
            shift: n,
            mask: 1 << n,
        }
    }

    /// `width` bits starting at bit `lo`.
    #[inline(always)]
    pub const fn bits(lo: u32, width: u32) -> Self {
        Self {
            shift: lo,
            mask: (((1u64 << width) - 1) as u32) << lo,
        }
    }

    #[inline(always)]
    pub const fn extract(&self, reg: u32) -> u32 {
        (reg & self.mask) >> self.shift
    }

    #[inline(always)]
    pub const fn insert(&self, reg: u32, value: u32) -> u32 {
        (reg & !self.mask) | ((value << self.shift) & self.mask)
    }
}

/// Memory-mapped register access at absolute addresses.
///
/// The provided field helpers mirror the read-modify-write register idiom of
/// the vendor drivers: read the whole register, replace one field, write it
/// back.
pub trait Mmio {
    fn read8(&mut self, addr: u32) -> u8;
    fn write8(&mut self, addr: u32, value: u8);
    fn read16(&mut self, addr: u32) -> u16;
    fn write16(&mut self, addr: u32, value: u16);
    fn read32(&mut self, addr: u32) -> u32;
    fn write32(&mut self, addr: u32, value: u32);

    #[inline(always)]
    fn field16(&mut self, addr: u32, field: Field) -> u16 {
        field.extract(self.read16(addr) as u32) as u16
    }

    #[inline(always)]
    fn modify16(&mut self, addr: u32, field: Field, value: u16) {
        let reg = self.read16(addr) as u32;
        self.write16(addr, field.insert(reg, value as u32) as u16);
    }

    #[inline(always)]
    fn field32(&mut self, addr: u32, field: Field) -> u32 {
        field.extract(self.read32(addr))
    }

    #[inline(always)]
    fn modify32(&mut self, addr: u32, field: Field, value: u32) {
        let reg = self.read32(addr);
        self.write32(addr, field.insert(reg, value));
    }
}

/// Clock pulse generator: standby control and system control registers.
pub mod cpg {
    use super::Field;

    /// System control register 3 (8-bit). Writing 0x0F enables writes to
    /// the data-retention RAM pages.
    pub const SYSCR3: u32 = 0xFCFE_0408;
    /// Standby control register 9 (8-bit). Bit 3 stops the SPIBSC0 clock.
    pub const STBCR9: u32 = 0xFCFE_0438;
    /// Deep standby cancel source flag register (16-bit).
    pub const DSFR: u32 = 0xFCFF_1808;

    pub const SYSCR3_RRAM_WRITE_ENABLE: u8 = 0x0F;
    pub const STBCR9_ALL_STOPPED: u8 = 0xFF;
    pub const STBCR9_SPIBSC0_RUNNING: u8 = 0xF7;

    /// Pins keep their state after deep standby while set.
    pub const DSFR_IOKEEP: Field = Field::bit(15);
}

/// General purpose I/O port registers (all 16-bit, one per port).
pub mod gpio {
    const BASE: u32 = 0xFCFE_3000;

    #[inline(always)]
    const fn reg(offset: u32, port: u8) -> u32 {
        BASE + offset + (port as u32) * 4
    }

    /// Port data register.
    #[inline(always)]
    pub const fn p(port: u8) -> u32 {
        reg(0x0000, port)
    }
    /// Port mode register (1 = input).
    #[inline(always)]
    pub const fn pm(port: u8) -> u32 {
        reg(0x0300, port)
    }
    /// Port mode control register (1 = alternate function).
    #[inline(always)]
    pub const fn pmc(port: u8) -> u32 {
        reg(0x0400, port)
    }
    #[inline(always)]
    pub const fn pfc(port: u8) -> u32 {
        reg(0x0500, port)
    }
    #[inline(always)]
    pub const fn pfce(port: u8) -> u32 {
        reg(0x0600, port)
    }
    #[inline(always)]
    pub const fn pfcae(port: u8) -> u32 {
        reg(0x0A00, port)
    }
    /// Port IP control register (1 = direction driven by the peripheral).
    #[inline(always)]
    pub const fn pipc(port: u8) -> u32 {
        reg(0x4200, port)
    }
}

/// SPI multi-I/O bus controller, channel 0.
pub mod spibsc {
    use super::Field;

    pub const BASE: u32 = 0x3FEF_A000;

    pub const CMNCR: u32 = BASE + 0x00;
    pub const SSLDR: u32 = BASE + 0x04;
    pub const SPBCR: u32 = BASE + 0x08;
    pub const DRCR: u32 = BASE + 0x0C;
    pub const DRCMR: u32 = BASE + 0x10;
    pub const DREAR: u32 = BASE + 0x14;
    pub const DROPR: u32 = BASE + 0x18;
    pub const DRENR: u32 = BASE + 0x1C;
    pub const SMCR: u32 = BASE + 0x20;
    pub const SMCMR: u32 = BASE + 0x24;
    pub const SMADR: u32 = BASE + 0x28;
    pub const SMOPR: u32 = BASE + 0x2C;
    pub const SMENR: u32 = BASE + 0x30;
    pub const SMRDR0: u32 = BASE + 0x38;
    pub const SMRDR1: u32 = BASE + 0x3C;
    pub const SMWDR0: u32 = BASE + 0x40;
    pub const SMWDR1: u32 = BASE + 0x44;
    pub const CMNSR: u32 = BASE + 0x48;
    pub const CKDLY: u32 = BASE + 0x50;
    pub const DRDMCR: u32 = BASE + 0x58;
    pub const DRDRENR: u32 = BASE + 0x5C;
    pub const SMDMCR: u32 = BASE + 0x60;
    pub const SMDRENR: u32 = BASE + 0x64;
    pub const SPODLY: u32 = BASE + 0x6C;

    // CMNCR
    pub const CMNCR_MD: Field = Field::bit(31);
    pub const CMNCR_SFDE: Field = Field::bit(24);
    pub const CMNCR_MOIIO3: Field = Field::bits(22, 2);
    pub const CMNCR_MOIIO2: Field = Field::bits(20, 2);
    pub const CMNCR_MOIIO1: Field = Field::bits(18, 2);
    pub const CMNCR_MOIIO0: Field = Field::bits(16, 2);
    pub const CMNCR_IO3FV: Field = Field::bits(14, 2);
    pub const CMNCR_IO2FV: Field = Field::bits(12, 2);
    pub const CMNCR_IO0FV: Field = Field::bits(8, 2);
    pub const CMNCR_CPHAT: Field = Field::bit(6);
    pub const CMNCR_CPHAR: Field = Field::bit(5);
    pub const CMNCR_SSLP: Field = Field::bit(4);
    pub const CMNCR_CPOL: Field = Field::bit(3);
    pub const CMNCR_BSZ: Field = Field::bits(0, 2);

    pub const MD_SPI: u32 = 1;
    pub const MD_EXTERNAL_READ: u32 = 0;
    pub const OUTPUT_HI_Z: u32 = 3;
    pub const CPHA_EVEN: u32 = 0;
    pub const CPHA_ODD: u32 = 1;
    pub const SSLP_LOW: u32 = 0;
    pub const CPOL_LOW: u32 = 0;

    // SSLDR
    pub const SSLDR_SPNDL: Field = Field::bits(16, 3);
    pub const SSLDR_SLNDL: Field = Field::bits(8, 3);
    pub const SSLDR_SCKDL: Field = Field::bits(0, 3);
    pub const DELAY_1_SPBCLK: u32 = 0;

    // SPBCR
    pub const SPBCR_SPBR: Field = Field::bits(8, 8);
    pub const SPBCR_BRDV: Field = Field::bits(0, 2);

    // DRCR
    pub const DRCR_SSLN: Field = Field::bit(24);
    pub const DRCR_RBURST: Field = Field::bits(16, 4);
    pub const DRCR_RCF: Field = Field::bit(9);
    pub const DRCR_RBE: Field = Field::bit(8);
    pub const DRCR_SSLE: Field = Field::bit(0);
    /// RBURST encodes `bursts - 1`.
    pub const BURST_4: u32 = 3;

    // DRCMR
    pub const DRCMR_CMD: Field = Field::bits(16, 8);
    pub const DRCMR_OCMD: Field = Field::bits(0, 8);

    // DREAR
    pub const DREAR_EAV: Field = Field::bits(16, 8);

    // DROPR / SMOPR
    pub const OPR_OPD3: Field = Field::bits(24, 8);
    pub const OPR_OPD2: Field = Field::bits(16, 8);
    pub const OPR_OPD1: Field = Field::bits(8, 8);
    pub const OPR_OPD0: Field = Field::bits(0, 8);

    // DRENR / SMENR share a layout apart from the data-enable field.
    pub const ENR_CDB: Field = Field::bits(30, 2);
    pub const ENR_OCDB: Field = Field::bits(28, 2);
    pub const ENR_ADB: Field = Field::bits(24, 2);
    pub const ENR_OPDB: Field = Field::bits(20, 2);
    pub const ENR_DATA_WIDTH: Field = Field::bits(16, 2);
    pub const ENR_DME: Field = Field::bit(15);
    pub const ENR_CDE: Field = Field::bit(14);
    pub const ENR_OCDE: Field = Field::bit(12);
    pub const ENR_ADE: Field = Field::bits(8, 4);
    pub const ENR_OPDE: Field = Field::bits(4, 4);
    pub const SMENR_SPIDE: Field = Field::bits(0, 4);

    pub const SPIDE_DISABLED: u32 = 0x0;
    pub const SPIDE_8BIT: u32 = 0x8;
    pub const SPIDE_16BIT: u32 = 0xC;
    pub const SPIDE_32BIT: u32 = 0xF;

    // SMCR
    pub const SMCR_SSLKP: Field = Field::bit(8);
    pub const SMCR_SPIRE: Field = Field::bit(2);
    pub const SMCR_SPIWE: Field = Field::bit(1);
    pub const SMCR_SPIE: Field = Field::bit(0);

    // SMCMR
    pub const SMCMR_CMD: Field = Field::bits(16, 8);
    pub const SMCMR_OCMD: Field = Field::bits(0, 8);

    // SMADR
    pub const SMADR_ADR: Field = Field::bits(0, 32);

    // DRDMCR / SMDMCR
    pub const DMCR_DMDB: Field = Field::bits(16, 2);
    pub const DMCR_DMCYC: Field = Field::bits(0, 3);

    // DRDRENR / SMDRENR
    pub const DRENR_ADDRE: Field = Field::bit(8);
    pub const DRENR_OPDRE: Field = Field::bit(4);
    pub const DRENR_DATA_DDR: Field = Field::bit(0);

    // CMNSR
    pub const CMNSR_SSLF: Field = Field::bit(1);
    pub const CMNSR_TEND: Field = Field::bit(0);
    pub const SSL_NEGATED: u32 = 0;
    pub const TRANSFER_END: u32 = 1;

    /// Delay adjustment words; the top byte is the write-protect key.
    pub const CKDLY_DEFAULT: u32 = 0xA539_0000;
    pub const CKDLY_TUNED: u32 = 0xA539_0004;
    pub const SPODLY_DEFAULT: u32 = 0xA500_0000;
    pub const SPODLY_TUNED: u32 = 0xA500_1111;
}
