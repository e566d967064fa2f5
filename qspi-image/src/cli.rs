// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use qspi_loader_common::BOOT_PROTECTED_RAM_START;

use crate::commands::{self, Placement};

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "qspi-image")]
#[command(about = "Stamp and inspect user images for the RZ/A1L QSPI loader")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Write the placement header and boot signature into a raw binary
    Stamp {
        /// Raw user program binary (vector table first)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Address the code is linked for [default: flash image start]
        #[arg(long, value_parser = parse_addr)]
        code_start: Option<u32>,

        /// End of the code [default: code start + file length]
        #[arg(long, value_parser = parse_addr)]
        code_end: Option<u32>,

        /// Entry point [default: code start]
        #[arg(long, value_parser = parse_addr)]
        exec: Option<u32>,
    },

    /// Show header, signature and the handoff the loader would take
    Inspect {
        /// Image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Start of the loader's protected RAM
        #[arg(long, value_parser = parse_addr, default_value_t = BOOT_PROTECTED_RAM_START)]
        protected_start: u32,
    },
}

/// Parse a decimal or `0x`-prefixed hexadecimal address.
pub fn parse_addr(s: &str) -> Result<u32, String> {
    let s = s.replace('_', "");
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Stamp {
            file,
            output,
            code_start,
            code_end,
            exec,
        } => commands::stamp(
            &file,
            &output,
            Placement {
                code_start,
                code_end,
                exec,
            },
        ),
        Commands::Inspect {
            file,
            protected_start,
        } => commands::inspect(&file, protected_start),
    }
}
