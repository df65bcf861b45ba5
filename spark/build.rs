// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Build script for the `spark` crate.
//!
//! This script generates `constants.rs` containing the library version in
//! Rust and C string form plus the build profile. These values are surfaced
//! by the configuration module and the `spark_version` C entry point.

use std::env;
use std::path::PathBuf;

/// Build profile based on debug/release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let version = env::var("CARGO_PKG_VERSION").expect("failed to get package version");
    let major = env::var("CARGO_PKG_VERSION_MAJOR").expect("failed to get major version");
    let minor = env::var("CARGO_PKG_VERSION_MINOR").expect("failed to get minor version");
    let patch = env::var("CARGO_PKG_VERSION_PATCH").expect("failed to get patch version");

    // Generate constants.rs in the build output directory
    let out_path = PathBuf::from(env::var("OUT_DIR").expect("failed to get output directory"))
        .join("constants.rs");

    let data = format!(
        "pub const SPARK_VERSION_STR: &str = \"{version}\";\n\
        pub const SPARK_VERSION_CSTR: &::std::ffi::CStr = c\"{version}\";\n\
        pub const SPARK_VERSION_MAJOR: u32 = {major};\n\
        pub const SPARK_VERSION_MINOR: u32 = {minor};\n\
        pub const SPARK_VERSION_PATCH: u32 = {patch};\n\
        pub const SPARK_BUILD_PROFILE: &str = \"{BUILD_PROFILE}\";\n"
    );
    std::fs::write(out_path, data).expect("Unable to write file");
}
