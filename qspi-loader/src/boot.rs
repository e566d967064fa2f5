// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Hand control to the user program.

use cortex_ar::asm::{dsb, isb};
use qspi_loader_common::image::{BootImage, HEADER_SPAN, USER_PROGRAM_SRC};
use qspi_loader_common::reinit::copy_words;
use qspi_loader_common::{select_handoff, BootError, Handoff, LoadPlan};

use crate::fault;
use crate::sections;

/// Read the image header span via volatile reads.
fn read_image(addr: u32) -> BootImage {
    let mut span = [0u8; HEADER_SPAN];
    for (i, byte) in span.iter_mut().enumerate() {
        *byte = unsafe { ((addr + i as u32) as *const u8).read_volatile() };
    }
    BootImage::from_span(span)
}

/// Run the handoff decision and never come back.
pub fn boot_user_program() -> ! {
    let image = read_image(USER_PROGRAM_SRC);
    let protected = sections::protected_ram_start();

    match select_handoff(&image, protected) {
        Ok(Handoff::Unsigned { entry }) => {
            defmt::println!("No signature, jumping to 0x{:08x}", entry);
            unsafe { jump_to_user_program(entry) }
        }
        Ok(Handoff::Signed(LoadPlan::CopyToRam {
            src,
            dest,
            words,
            entry,
        })) => {
            defmt::println!(
                "Copying {} words from 0x{:08x} to 0x{:08x}",
                words,
                src,
                dest
            );
            unsafe {
                copy_words(src as *const u32, dest as *mut u32, words as usize);
                jump_to_user_program(entry)
            }
        }
        Ok(Handoff::Signed(LoadPlan::ExecuteInPlace { entry })) => {
            defmt::println!("Executing in place at 0x{:08x}", entry);
            unsafe { jump_to_user_program(entry) }
        }
        Err(BootError::CodeTooBig { end, limit }) => {
            defmt::println!(
                "User program ends at 0x{:08x}, past 0x{:08x}",
                end,
                limit
            );
            fault::code_too_big()
        }
        Err(BootError::SpiInit(e)) => {
            defmt::println!("SPI init error: {}", e);
            fault::spi_init_error()
        }
    }
}

/// # Safety
/// `entry` must be the start of valid ARM code.
pub unsafe fn jump_to_user_program(entry: u32) -> ! {
    cortex_ar::interrupt::disable();
    dsb();
    isb();
    unsafe {
        core::arch::asm!(
            "bx {entry}",
            entry = in(reg) entry,
            options(noreturn)
        );
    }
}
