// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Layout of a user image as the loader finds it in serial flash.
//!
//! ```text
//! 0x00  vector table (8 words)
//! 0x20  code start      (u32 LE)
//! 0x24  code end        (u32 LE)
//! 0x28  execution start (u32 LE)
//! 0x2C  ".BootLoad_ValidProgramTest.\0"
//! ```

/// Flash-mapped address of the user program.
pub const USER_PROGRAM_SRC: u32 = 0x1808_0000;

pub const VECTOR_TABLE_SIZE: usize = 0x20;
pub const CODE_START_OFFSET: usize = 0x20;
pub const CODE_END_OFFSET: usize = 0x24;
pub const EXEC_OFFSET: usize = 0x28;
pub const SIGNATURE_OFFSET: usize = 0x2C;

/// Signature string including its terminating NUL.
pub const SIGNATURE: &[u8; 28] = b".BootLoad_ValidProgramTest.\0";

/// Bytes the loader reads to make a boot decision.
pub const HEADER_SPAN: usize = SIGNATURE_OFFSET + SIGNATURE.len();

/// Internal RAM, normal and mirror windows.
pub const INTERNAL_RAM_NORMAL: u32 = 0x2002_0000;
pub const MIRROR_OFFSET: u32 = 0x4000_0000;
pub const INTERNAL_RAM_MIRROR: u32 = INTERNAL_RAM_NORMAL + MIRROR_OFFSET;

/// First byte of RAM reserved for the loader itself (normal window). Must
/// match `ld_boot_protected_ram_start` in the loader's linker script.
pub const BOOT_PROTECTED_RAM_START: u32 = 0x202F_0000;

/// Placement words following the vector table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageHeader {
    pub code_start: u32,
    pub code_end: u32,
    pub exec: u32,
}

impl ImageHeader {
    pub const SIZE: usize = 12;

    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Self {
            code_start: word(0),
            code_end: word(4),
            exec: word(8),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.code_start.to_le_bytes());
        out[4..8].copy_from_slice(&self.code_end.to_le_bytes());
        out[8..12].copy_from_slice(&self.exec.to_le_bytes());
        out
    }

    /// Signed code size; zero or negative means "no RAM copy".
    pub fn size(&self) -> i32 {
        self.code_end.wrapping_sub(self.code_start) as i32
    }
}

/// The first [`HEADER_SPAN`] bytes of a user image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootImage {
    span: [u8; HEADER_SPAN],
}

impl BootImage {
    pub fn from_span(span: [u8; HEADER_SPAN]) -> Self {
        Self { span }
    }

    /// Take the header span from the front of a larger buffer.
    pub fn from_prefix(bytes: &[u8]) -> Option<Self> {
        let span: [u8; HEADER_SPAN] = bytes.get(..HEADER_SPAN)?.try_into().ok()?;
        Some(Self { span })
    }

    pub fn header(&self) -> ImageHeader {
        let mut raw = [0u8; ImageHeader::SIZE];
        raw.copy_from_slice(&self.span[CODE_START_OFFSET..CODE_START_OFFSET + ImageHeader::SIZE]);
        ImageHeader::from_bytes(&raw)
    }

    pub fn has_signature(&self) -> bool {
        &self.span[SIGNATURE_OFFSET..] == SIGNATURE.as_slice()
    }
}
