// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Recording register mock shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use qspi_loader_common::regs::spibsc::{
    CMNSR, SMCMR, SMCMR_CMD, SMCR, SMCR_SPIE, SMENR, SMENR_SPIDE, SMRDR0, SMWDR0, SPIDE_16BIT,
    SPIDE_32BIT,
};
use qspi_loader_common::sflash::STATUS_WIP;
use qspi_loader_common::{Field, Mmio};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read(u32),
    Write(u32, u32),
}

/// Serial flash behind the mocked SPIBSC: answers status/config reads and
/// applies write-status when write-enabled.
///
/// After a write-status, WIP reads set for `busy_polls` status reads, or
/// forever when `stuck_busy` is set.
#[derive(Clone, Debug)]
pub struct FlashModel {
    pub status: [u8; 2],
    pub config: [u8; 2],
    pub write_enabled: bool,
    /// Bits the device refuses to change.
    pub locked_status: u8,
    pub locked_config: u8,
    pub busy_polls: u32,
    pub stuck_busy: bool,
    pub commands: Vec<u8>,
    /// SPIDE in effect for each write-status transfer.
    pub write_spides: Vec<u32>,
    busy_remaining: u32,
    writing: bool,
}

impl FlashModel {
    pub fn new(status: u8, config: u8) -> Self {
        Self {
            status: [status; 2],
            config: [config; 2],
            write_enabled: false,
            locked_status: 0,
            locked_config: 0,
            busy_polls: 0,
            stuck_busy: false,
            commands: Vec::new(),
            write_spides: Vec::new(),
            busy_remaining: 0,
            writing: false,
        }
    }

    pub fn status_reads(&self) -> usize {
        self.commands.iter().filter(|&&c| c == 0x05).count()
    }

    fn start_write(&mut self) {
        self.writing = true;
        self.busy_remaining = self.busy_polls;
    }

    /// Status as the device reports it, WIP included.
    fn poll_status(&mut self) -> [u8; 2] {
        if self.writing {
            if self.stuck_busy || self.busy_remaining > 0 {
                self.busy_remaining = self.busy_remaining.saturating_sub(1);
                return self.status.map(|s| s | STATUS_WIP);
            }
            self.writing = false;
        }
        self.status
    }
}

pub struct MockMmio {
    pub mem: HashMap<u32, u32>,
    pub log: Vec<Access>,
    /// When false, accesses still take effect but are not logged.
    pub recording: bool,
    pub flash: FlashModel,
}

impl MockMmio {
    /// Idle controller: transfer ended, SSL negated.
    pub fn new() -> Self {
        let mut mem = HashMap::new();
        mem.insert(CMNSR, 0x1);
        Self {
            mem,
            log: Vec::new(),
            recording: true,
            flash: FlashModel::new(0, 0),
        }
    }

    pub fn with_flash(flash: FlashModel) -> Self {
        let mut m = Self::new();
        m.flash = flash;
        m
    }

    pub fn set(&mut self, addr: u32, value: u32) {
        self.mem.insert(addr, value);
    }

    pub fn reg(&self, addr: u32) -> u32 {
        self.mem.get(&addr).copied().unwrap_or(0)
    }

    pub fn field(&self, addr: u32, field: Field) -> u32 {
        field.extract(self.reg(addr))
    }

    pub fn writes_to(&self, addr: u32) -> Vec<u32> {
        self.log
            .iter()
            .filter_map(|a| match a {
                Access::Write(at, v) if *at == addr => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn reads_of(&self, addr: u32) -> usize {
        self.log
            .iter()
            .filter(|a| matches!(a, Access::Read(at) if *at == addr))
            .count()
    }

    /// Position of the first write to `addr` in the access log.
    pub fn first_write(&self, addr: u32) -> Option<usize> {
        self.log
            .iter()
            .position(|a| matches!(a, Access::Write(at, _) if *at == addr))
    }

    fn run_transfer(&mut self) {
        let cmd = self.field(SMCMR, SMCMR_CMD) as u8;
        let spide = self.field(SMENR, SMENR_SPIDE);
        let dual = spide == SPIDE_16BIT && cmd != 0x01 || spide == SPIDE_32BIT;
        self.flash.commands.push(cmd);

        let lanes = |v: [u8; 2]| {
            if dual {
                u32::from(v[0]) | u32::from(v[1]) << 8
            } else {
                u32::from(v[0])
            }
        };

        match cmd {
            0x05 => {
                let v = lanes(self.flash.poll_status());
                self.set(SMRDR0, v);
            }
            0x15 | 0x35 => {
                let v = lanes(self.flash.config);
                self.set(SMRDR0, v);
            }
            0x06 => self.flash.write_enabled = true,
            0x01 if self.flash.write_enabled => {
                self.flash.write_spides.push(spide);
                let b = self.reg(SMWDR0).to_le_bytes();
                let (status, config) = if spide == SPIDE_32BIT {
                    ([b[0], b[1]], [b[2], b[3]])
                } else {
                    ([b[0], b[0]], [b[1], b[1]])
                };
                for i in 0..2 {
                    let ls = self.flash.locked_status;
                    let lc = self.flash.locked_config;
                    self.flash.status[i] = (status[i] & !ls) | (self.flash.status[i] & ls);
                    self.flash.config[i] = (config[i] & !lc) | (self.flash.config[i] & lc);
                }
                self.flash.write_enabled = false;
                self.flash.start_write();
            }
            _ => {}
        }
    }
}

impl Mmio for MockMmio {
    fn read8(&mut self, addr: u32) -> u8 {
        self.read32(addr) as u8
    }

    fn write8(&mut self, addr: u32, value: u8) {
        self.write32(addr, value as u32);
    }

    fn read16(&mut self, addr: u32) -> u16 {
        self.read32(addr) as u16
    }

    fn write16(&mut self, addr: u32, value: u16) {
        self.write32(addr, value as u32);
    }

    fn read32(&mut self, addr: u32) -> u32 {
        if self.recording {
            self.log.push(Access::Read(addr));
        }
        self.reg(addr)
    }

    fn write32(&mut self, addr: u32, value: u32) {
        if self.recording {
            self.log.push(Access::Write(addr, value));
        }
        self.mem.insert(addr, value);
        if addr == SMCR && SMCR_SPIE.extract(value) == 1 {
            // SPIE reads back as zero once the transfer has started.
            self.mem.insert(addr, SMCR_SPIE.insert(value, 0));
            self.run_transfer();
        }
    }
}
