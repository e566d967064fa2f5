// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Error types for the flash driver and the boot sequence.

use thiserror::Error;

/// Failures reported by the SPIBSC driver and the serial flash layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpibscError {
    #[error("SPIBSC configuration out of range")]
    InvalidConfig,
    #[error("SPIBSC transfer still in progress")]
    TransferBusy,
    #[error("SPBSSL still asserted")]
    SslAsserted,
    #[error("unsupported data bus width")]
    UnsupportedWidth,
    #[error("multi-bit transfer cannot read and write at once")]
    ReadWriteConflict,
    #[error("serial flash stayed busy")]
    FlashBusy,
    #[error("serial flash refused quad mode")]
    QuadEnableFailed,
}

/// Irrecoverable boot failures. Each one ends in a blink pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    #[error("serial flash re-initialisation failed: {0}")]
    SpiInit(#[from] SpibscError),
    #[error("user program ends at {end:#010x}, past the protected RAM at {limit:#010x}")]
    CodeTooBig { end: u32, limit: u32 },
}
