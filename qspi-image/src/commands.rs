// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for stamping and inspecting images.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use crc::{Crc, CRC_32_ISO_HDLC};

use qspi_loader_common::image::{
    ImageHeader, CODE_START_OFFSET, HEADER_SPAN, SIGNATURE, SIGNATURE_OFFSET, USER_PROGRAM_SRC,
};
use qspi_loader_common::{
    select_handoff, BootError, BootImage, Handoff, LoadPlan, BOOT_PROTECTED_RAM_START,
};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Header values given on the command line; `None` picks the default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Placement {
    pub code_start: Option<u32>,
    pub code_end: Option<u32>,
    pub exec: Option<u32>,
}

impl Placement {
    /// Fill in defaults for an image of `len` bytes.
    pub fn resolve(&self, len: usize) -> Result<ImageHeader> {
        let len = u32::try_from(len).context("Image larger than 4 GiB")?;
        let code_start = self.code_start.unwrap_or(USER_PROGRAM_SRC);
        let code_end = match self.code_end {
            Some(end) => end,
            None => code_start
                .checked_add(len)
                .context("Code start plus image length overflows")?,
        };
        Ok(ImageHeader {
            code_start,
            code_end,
            exec: self.exec.unwrap_or(code_start),
        })
    }
}

/// Write `header` and the boot signature into a copy of `raw`.
pub fn stamp_image(raw: &[u8], header: &ImageHeader) -> Result<Vec<u8>> {
    if raw.len() < HEADER_SPAN {
        bail!(
            "Image is {} bytes; at least {} are needed for vector table, header and signature",
            raw.len(),
            HEADER_SPAN
        );
    }

    let mut out = raw.to_vec();
    out[CODE_START_OFFSET..CODE_START_OFFSET + ImageHeader::SIZE]
        .copy_from_slice(&header.to_bytes());
    out[SIGNATURE_OFFSET..SIGNATURE_OFFSET + SIGNATURE.len()].copy_from_slice(SIGNATURE);
    Ok(out)
}

/// One-line description of what the loader will do.
pub fn describe_handoff(result: &Result<Handoff, BootError>) -> String {
    match result {
        Ok(Handoff::Unsigned { entry }) => {
            format!("no signature, loader jumps to 0x{:08x}", entry)
        }
        Ok(Handoff::Signed(LoadPlan::CopyToRam {
            src,
            dest,
            words,
            entry,
        })) => format!(
            "copy {} words from 0x{:08x} to 0x{:08x}, then jump to 0x{:08x}",
            words, src, dest, entry
        ),
        Ok(Handoff::Signed(LoadPlan::ExecuteInPlace { entry })) => {
            format!("execute in place at 0x{:08x}", entry)
        }
        Err(e) => format!("refused: {}", e),
    }
}

/// Stamp `file` and write the result to `output`.
pub fn stamp(file: &Path, output: &Path, placement: Placement) -> Result<()> {
    let raw = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let header = placement.resolve(raw.len())?;
    let stamped = stamp_image(&raw, &header)?;

    fs::write(output, &stamped)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Image:      {} ({} bytes, CRC32: 0x{:08x})",
        output.display(),
        stamped.len(),
        CRC32.checksum(&stamped)
    );
    print_header(&header);

    let image = BootImage::from_prefix(&stamped).context("Stamped image too short")?;
    let handoff = select_handoff(&image, BOOT_PROTECTED_RAM_START);
    println!("Handoff:    {}", describe_handoff(&handoff));
    if handoff.is_err() {
        bail!("The loader would refuse this image");
    }

    Ok(())
}

/// Print header, signature status and handoff for `file`.
pub fn inspect(file: &Path, protected_start: u32) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let image = BootImage::from_prefix(&bytes).with_context(|| {
        format!(
            "{} is {} bytes, shorter than the {}-byte header span",
            file.display(),
            bytes.len(),
            HEADER_SPAN
        )
    })?;

    println!(
        "Image:      {} ({} bytes, CRC32: 0x{:08x})",
        file.display(),
        bytes.len(),
        CRC32.checksum(&bytes)
    );
    print_header(&image.header());
    println!(
        "Signature:  {}",
        if image.has_signature() { "valid" } else { "missing" }
    );
    println!(
        "Handoff:    {}",
        describe_handoff(&select_handoff(&image, protected_start))
    );

    Ok(())
}

fn print_header(header: &ImageHeader) {
    println!("Code start: 0x{:08x}", header.code_start);
    println!("Code end:   0x{:08x}", header.code_end);
    println!("Exec:       0x{:08x}", header.exec);
    println!("Size:       {} bytes", header.size());
}
