// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Install the loader's linker script and the defmt one.

use std::path::PathBuf;
use std::{env, fs};

static LINKER: &[u8] = include_bytes!("./rza1l_loader.ld");

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let ld_path = out_dir.join("rza1l_loader.ld");
    fs::write(&ld_path, LINKER).expect("write linker script");

    println!("cargo::rustc-link-search={}", out_dir.display());
    println!("cargo::rustc-link-arg-bins=-Trza1l_loader.ld");
    println!("cargo::rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo::rerun-if-changed=rza1l_loader.ld");
    println!("cargo::rerun-if-changed=build.rs");
}
