// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Pin multiplexing for the serial flash bus and the boot-time IO holds.

use crate::regs::{gpio, Field, Mmio};
use crate::spibsc::{BusSize, BusWidth};

/// One GPIO pin, `Pport_bit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortPin {
    pub port: u8,
    pub bit: u8,
}

impl PortPin {
    pub const fn new(port: u8, bit: u8) -> Self {
        Self { port, bit }
    }

    #[inline(always)]
    fn field(&self) -> Field {
        Field::bit(self.bit as u32)
    }

    /// Plain GPIO output driven high.
    #[inline(always)]
    pub fn drive_high(&self, m: &mut impl Mmio) {
        m.modify16(gpio::pmc(self.port), self.field(), 0);
        m.modify16(gpio::pm(self.port), self.field(), 0);
        m.modify16(gpio::p(self.port), self.field(), 1);
    }

    /// Plain GPIO input, output latch cleared.
    #[inline(always)]
    pub fn release(&self, m: &mut impl Mmio) {
        m.modify16(gpio::pmc(self.port), self.field(), 0);
        m.modify16(gpio::pm(self.port), self.field(), 1);
        m.modify16(gpio::p(self.port), self.field(), 0);
    }

    /// Route the pin to alternate function `function` (1..=8) with the
    /// peripheral controlling the direction.
    #[inline(always)]
    pub fn select_function(&self, m: &mut impl Mmio, function: u8) {
        let sel = function.saturating_sub(1);
        m.modify16(gpio::pfcae(self.port), self.field(), ((sel >> 2) & 1) as u16);
        m.modify16(gpio::pfce(self.port), self.field(), ((sel >> 1) & 1) as u16);
        m.modify16(gpio::pfc(self.port), self.field(), (sel & 1) as u16);
        m.modify16(gpio::pmc(self.port), self.field(), 1);
        m.modify16(gpio::pipc(self.port), self.field(), 1);
    }
}

/// SPIBSC signals sit on the second alternate function of their pins.
pub const SPIBSC_FUNCTION: u8 = 2;

/// SPBCLK_0, SPBSSL_0, SPBIO00_0, SPBIO10_0.
pub const SPIBSC_BASE_PINS: [PortPin; 4] = [
    PortPin::new(4, 4),
    PortPin::new(4, 5),
    PortPin::new(4, 6),
    PortPin::new(4, 7),
];

/// SPBIO20_0, SPBIO30_0: upper data lines of the first device.
pub const SPIBSC_QUAD_PINS: [PortPin; 2] = [PortPin::new(4, 2), PortPin::new(4, 3)];

/// SPBIO01_0 .. SPBIO31_0: data lines of the second device.
pub const SPIBSC_SECOND_DEVICE_PINS: [PortPin; 4] = [
    PortPin::new(3, 10),
    PortPin::new(3, 11),
    PortPin::new(3, 12),
    PortPin::new(3, 13),
];

/// Mux the serial flash pins for the given data width and device count.
#[inline(always)]
pub fn spibsc_port_setting(m: &mut impl Mmio, width: BusWidth, bus_size: BusSize) {
    for pin in SPIBSC_BASE_PINS.iter() {
        pin.select_function(m, SPIBSC_FUNCTION);
    }

    if width == BusWidth::Quad {
        for pin in SPIBSC_QUAD_PINS.iter() {
            pin.select_function(m, SPIBSC_FUNCTION);
        }
        if bus_size == BusSize::Dual {
            for pin in SPIBSC_SECOND_DEVICE_PINS.iter() {
                pin.select_function(m, SPIBSC_FUNCTION);
            }
        }
    }
}

/// Pins of the second device that must be held while stage 1 restarts the
/// bus. P3_13 is always held; the other three only when quad mode is used.
#[inline(always)]
pub fn second_device_hold_pins(quad_mode: bool) -> &'static [PortPin] {
    if quad_mode {
        &SPIBSC_SECOND_DEVICE_PINS
    } else {
        &SPIBSC_SECOND_DEVICE_PINS[3..]
    }
}

/// Hold the second device's IO lines high as GPIO outputs.
#[inline(always)]
pub fn hold_second_device_io(m: &mut impl Mmio, quad_mode: bool) {
    for pin in second_device_hold_pins(quad_mode) {
        pin.drive_high(m);
    }
}

/// Return the held lines to GPIO inputs.
#[inline(always)]
pub fn release_second_device_io(m: &mut impl Mmio, quad_mode: bool) {
    for pin in second_device_hold_pins(quad_mode) {
        pin.release(m);
    }
}
