// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board LED on P7_8 and the fault blink patterns.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::pins::PortPin;
use crate::regs::{gpio, Field, Mmio};

pub const LED_PIN: PortPin = PortPin::new(7, 8);

/// One step of a pattern: LED level held for `ms` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlinkStep {
    pub on: bool,
    pub ms: u32,
}

impl BlinkStep {
    pub const fn on(ms: u32) -> Self {
        Self { on: true, ms }
    }

    pub const fn off(ms: u32) -> Self {
        Self { on: false, ms }
    }
}

/// One period of a blink pattern.
pub type Pattern = [BlinkStep];

/// Long flash then a short one.
pub const SPI_INIT_ERROR: [BlinkStep; 4] = [
    BlinkStep::on(2000),
    BlinkStep::off(500),
    BlinkStep::on(500),
    BlinkStep::off(500),
];

/// Even 2 Hz blink.
pub const CODE_TOO_BIG: [BlinkStep; 2] = [BlinkStep::on(250), BlinkStep::off(250)];

pub const PANIC: [BlinkStep; 2] = [BlinkStep::on(100), BlinkStep::off(100)];

/// The LED as a plain GPIO output.
pub struct LedPin<'a, M: Mmio> {
    m: &'a mut M,
}

impl<'a, M: Mmio> LedPin<'a, M> {
    /// Configure P7_8 as an output driven high, without peripheral control.
    #[inline(always)]
    pub fn configure(m: &'a mut M) -> Self {
        let field = Field::bit(LED_PIN.bit as u32);
        m.modify16(gpio::pmc(LED_PIN.port), field, 0);
        m.modify16(gpio::p(LED_PIN.port), field, 1);
        m.modify16(gpio::pm(LED_PIN.port), field, 0);
        m.modify16(gpio::pipc(LED_PIN.port), field, 0);
        Self { m }
    }

    #[inline(always)]
    fn set(&mut self, on: bool) {
        self.m
            .modify16(gpio::p(LED_PIN.port), Field::bit(LED_PIN.bit as u32), on as u16);
    }
}

impl<M: Mmio> ErrorType for LedPin<'_, M> {
    type Error = Infallible;
}

impl<M: Mmio> OutputPin for LedPin<'_, M> {
    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

/// Play one period of `pattern`.
#[inline(always)]
pub fn play(led: &mut impl OutputPin, delay: &mut impl DelayNs, pattern: &Pattern) {
    for step in pattern {
        if step.on {
            led.set_high().ok();
        } else {
            led.set_low().ok();
        }
        delay.delay_ms(step.ms);
    }
}

/// Repeat `pattern` forever.
#[inline(always)]
pub fn halt_and_blink(led: &mut impl OutputPin, delay: &mut impl DelayNs, pattern: &Pattern) -> ! {
    loop {
        play(led, delay, pattern);
    }
}
