// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Decide how control passes to the user program.

use crate::error::BootError;
use crate::image::{
    BootImage, ImageHeader, INTERNAL_RAM_MIRROR, INTERNAL_RAM_NORMAL, MIRROR_OFFSET,
    USER_PROGRAM_SRC,
};

/// What the loader does with a signed image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadPlan {
    /// Copy `words` words from `src` to `dest`, then jump to `entry`.
    CopyToRam {
        src: u32,
        dest: u32,
        words: u32,
        entry: u32,
    },
    /// Jump straight to `entry`.
    ExecuteInPlace { entry: u32 },
}

/// Final boot decision for an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handoff {
    /// No signature: jump to the flash image start regardless.
    Unsigned { entry: u32 },
    Signed(LoadPlan),
}

impl Handoff {
    pub fn entry(&self) -> u32 {
        match self {
            Handoff::Unsigned { entry } => *entry,
            Handoff::Signed(LoadPlan::CopyToRam { entry, .. }) => *entry,
            Handoff::Signed(LoadPlan::ExecuteInPlace { entry }) => *entry,
        }
    }
}

/// Words needed to hold `size` bytes.
pub fn word_count(size: u32) -> u32 {
    size.div_ceil(4)
}

/// Classify a signed image by where its code wants to live.
///
/// The image is RAM-targeted when its size is positive and its start lies
/// in internal RAM below (or at) the loader's protected region, in either
/// the normal or the mirror window. A RAM-targeted image whose end runs past
/// the protected region cannot be loaded.
pub fn plan_load(header: &ImageHeader, protected_start: u32) -> Result<LoadPlan, BootError> {
    let size = header.size();
    let dest = header.code_start;
    let end = header.code_end;

    let windows = [
        (INTERNAL_RAM_NORMAL, protected_start),
        (
            INTERNAL_RAM_MIRROR,
            protected_start.wrapping_add(MIRROR_OFFSET),
        ),
    ];

    let mut in_ram = false;
    for (ram_start, limit) in windows {
        if size > 0 && dest >= ram_start && dest <= limit {
            if end > limit {
                return Err(BootError::CodeTooBig { end, limit });
            }
            in_ram = true;
        }
    }

    if in_ram {
        Ok(LoadPlan::CopyToRam {
            src: USER_PROGRAM_SRC,
            dest,
            words: word_count(size as u32),
            entry: header.exec,
        })
    } else {
        Ok(LoadPlan::ExecuteInPlace { entry: header.exec })
    }
}

/// Pick the handoff for whatever the loader found at [`USER_PROGRAM_SRC`].
pub fn select_handoff(image: &BootImage, protected_start: u32) -> Result<Handoff, BootError> {
    if !image.has_signature() {
        return Ok(Handoff::Unsigned {
            entry: USER_PROGRAM_SRC,
        });
    }
    plan_load(&image.header(), protected_start).map(Handoff::Signed)
}
