// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! QSPI second-stage loader for the RZ/A1L.
//!
//! Reconfigures the SPI multi-I/O bus controller for fast quad reads from
//! code copied to internal RAM, then hands over to the user program stored
//! behind the loader in serial flash.

#![no_std]
#![no_main]

mod boot;
mod config;
mod fault;
mod peripherals;
mod sections;
mod stages;

use cortex_ar::register::{cpsr::ProcessorMode, Cpsr};
use defmt_rtt as _;
use qspi_loader_common::{pins, reinit};

use crate::peripherals::VolatileMmio;
use crate::sections::RamSection;

defmt::timestamp!("{=u64:us}", { 0 });

// Vector table at the start of flash. The boot ROM enters at offset 0.
core::arch::global_asm!(
    r#"
    .section .vector_table,"ax",%progbits
    .arm
    .global _vector_table
    .type _vector_table, %function
    _vector_table:
        ldr     pc, =_start
        ldr     pc, =_asm_trap
        ldr     pc, =_asm_trap
        ldr     pc, =_asm_trap
        ldr     pc, =_asm_trap
        nop
        ldr     pc, =_asm_trap
        ldr     pc, =_asm_trap
    .size _vector_table, . - _vector_table

    .section .text._start
    .arm
    .global _start
    .type _start, %function
    _start:
        // SVC mode, IRQ and FIQ masked
        msr     cpsr, {svc_mode}
        ldr     sp, =_stack_top
        // Zero .bss
        ldr     r0, =__sbss
        ldr     r1, =__ebss
        mov     r2, 0
    0:
        cmp     r1, r0
        beq     1f
        stm     r0!, {{r2}}
        b       0b
    1:
        // Initialise .data
        ldr     r0, =__sdata
        ldr     r1, =__edata
        ldr     r2, =__sidata
    0:
        cmp     r1, r0
        beq     1f
        ldm     r2!, {{r3}}
        stm     r0!, {{r3}}
        b       0b
    1:
        bl      reset_entry
        b       .
    .size _start, . - _start

    .section .text._asm_trap
    .arm
    .global _asm_trap
    .type _asm_trap, %function
    _asm_trap:
        b       _asm_trap
    .size _asm_trap, . - _asm_trap
    "#,
    svc_mode = const {
        Cpsr::new_with_raw_value(0)
            .with_mode(ProcessorMode::Svc)
            .with_i(true)
            .with_f(true)
            .raw_value()
    },
);

#[no_mangle]
pub extern "C" fn reset_entry() -> ! {
    let mut mmio = VolatileMmio;
    let profile = config::PROFILE;
    let quad = profile.quad_mode_support();

    reinit::enable_retention_ram(&mut mmio);
    defmt::println!("QSPI loader init: {}", profile);

    // Order: copy init-1, hold second device IO, stage 1, copy init-2,
    // release IO, stage 2. Each stage needs its section in RAM first, and
    // the second device's IO lines stay driven high only across stage 1.
    unsafe { RamSection::init_1().copy() };
    pins::hold_second_device_io(&mut mmio, quad);
    unsafe { stages::run_stage1() };

    unsafe { RamSection::init_2().copy() };
    pins::release_second_device_io(&mut mmio, quad);
    unsafe { stages::run_stage2() };

    defmt::println!("Serial flash in {} mode", profile.mode);
    boot::boot_user_program()
}
