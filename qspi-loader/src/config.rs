// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board flash profile, chosen with Cargo features.

use qspi_loader_common::{BusMode, FlashDevice, FlashProfile};

#[cfg(all(feature = "macronix", feature = "spansion"))]
compile_error!("select exactly one flash device feature: `macronix` or `spansion`");

#[cfg(not(any(feature = "macronix", feature = "spansion")))]
compile_error!("select a flash device feature: `macronix` or `spansion`");

#[cfg(all(
    feature = "spansion",
    any(feature = "ddr-single", feature = "sdr-dual", feature = "ddr-dual")
))]
compile_error!("Spansion flash is only supported in `sdr-single` mode");

#[cfg(feature = "ddr-dual")]
const MODE: BusMode = BusMode::DdrDual;
#[cfg(all(feature = "sdr-dual", not(feature = "ddr-dual")))]
const MODE: BusMode = BusMode::SdrDual;
#[cfg(all(
    feature = "ddr-single",
    not(any(feature = "ddr-dual", feature = "sdr-dual"))
))]
const MODE: BusMode = BusMode::DdrSingle;
#[cfg(not(any(feature = "ddr-dual", feature = "sdr-dual", feature = "ddr-single")))]
const MODE: BusMode = BusMode::SdrSingle;

#[cfg(feature = "spansion")]
pub const PROFILE: FlashProfile = match FlashProfile::new(FlashDevice::Spansion, MODE) {
    Some(profile) => profile,
    None => panic!("unsupported Spansion bus mode"),
};

#[cfg(not(feature = "spansion"))]
pub const PROFILE: FlashProfile = match FlashProfile::new(FlashDevice::Macronix, MODE) {
    Some(profile) => profile,
    None => panic!("unsupported Macronix bus mode"),
};
