// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Build-time configuration of the library.
//!
//! Version information is generated by the build script; the remaining
//! switches are cargo features.

use std::ffi::CStr;

// Build script generates constants.rs with SPARK_VERSION_* and SPARK_BUILD_PROFILE
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

/// Returns the library version as `"major.minor.patch"`.
pub fn version() -> &'static str {
    SPARK_VERSION_STR
}

/// Returns the library version as a nul-terminated C string.
///
/// The pointer behind the returned value is valid for the lifetime of the
/// process, which is what the `spark_version` C entry point hands out.
pub fn version_cstr() -> &'static CStr {
    SPARK_VERSION_CSTR
}

/// Returns the `(major, minor, patch)` version triple.
pub fn version_triple() -> (u32, u32, u32) {
    (SPARK_VERSION_MAJOR, SPARK_VERSION_MINOR, SPARK_VERSION_PATCH)
}

/// Returns the ABI revision that every [`crate::Block`] must carry.
pub fn abi_version() -> u32 {
    spark_sys::SPARK_ABI_VERSION
}

/// Returns `"debug"` or `"release"` depending on how the crate was built.
pub fn build_profile() -> &'static str {
    SPARK_BUILD_PROFILE
}

/// Returns `true` when the crate was built with the `strict-checks` feature.
///
/// Strict builds run [`crate::sosfilt::strict`] on every filter setup.
pub const fn strict_checks_enabled() -> bool {
    cfg!(feature = "strict-checks")
}

/// Returns `true` when `spark_sosfilt_f32` aborts on a refused instance.
///
/// Debug builds and strict builds abort, matching a C `assert`. Release
/// builds without `strict-checks` log the error and return.
pub const fn aborts_on_kernel_misuse() -> bool {
    cfg!(debug_assertions) || strict_checks_enabled()
}
