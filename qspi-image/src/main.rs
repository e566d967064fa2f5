// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Image tool for the RZ/A1L QSPI loader.
//!
//! Usage:
//!   qspi-image stamp app.bin -o app-signed.bin
//!   qspi-image stamp app.bin -o app-signed.bin --code-start 0x20020000 --exec 0x20020040
//!   qspi-image inspect app-signed.bin

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args)
}
