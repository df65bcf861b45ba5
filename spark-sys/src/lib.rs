// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! # spark-sys: Raw ABI definitions for libspark
//!
//! This crate declares the `#[repr(C)]` structures and integer constants that
//! make up the libspark binary contract. It mirrors `include/spark.h` one to
//! one and contains no logic.
//!
//! ## Overview
//!
//! `spark-sys` exposes:
//! - Raw C types ([`Buffer`], [`Block`], [`SosfiltF32`])
//! - Flag constants for sample format, memory layout and block type
//! - Status codes ([`Status`], `SPARK_NOERROR`, `SPARK_ERR_*`)
//! - [`SPARK_ABI_VERSION`], which every caller writes into [`Block::abi_version`]
//!
//! ## Usage
//!
//! **Most users should NOT use this crate directly.** Use the safe `spark`
//! crate instead, which provides:
//! - Typed flag decoding
//! - Block validation returning `Result`
//! - Bounds-checked buffer views and the biquad cascade kernel
//!
//! ## Flags word
//!
//! ```text
//!  bit  10..8        7..4      3..0
//!      block type   layout    format
//! ```
//!
//! Exactly one format, one layout and (for required-flags words) one block
//! type are combined with `|`.
//!
//! ## Safety
//!
//! The types carry raw pointers. Nothing here checks them; the caller owns
//! every buffer, coefficient array and state array for the duration of a call.

use std::ffi::{c_int, c_void};

/// Status code returned across the C ABI.
pub type Status = c_int;

/// ABI revision. A [`Block`] whose `abi_version` differs is rejected.
pub const SPARK_ABI_VERSION: u32 = 1;

// Formats (bits [0..3])
pub const SPARK_FMT_INVALID: u32 = 0x00;
pub const SPARK_FMT_I16: u32 = 0x01;
pub const SPARK_FMT_I32: u32 = 0x02;
pub const SPARK_FMT_F32: u32 = 0x03;
pub const SPARK_FMT_F64: u32 = 0x04;
pub const SPARK_FMT_MASK: u32 = 0x0F;

// Layouts (bits [4..7])
pub const SPARK_LAYOUT_INVALID: u32 = 0x0 << 4;
pub const SPARK_LAYOUT_INTERLEAVED: u32 = 0x1 << 4;
pub const SPARK_LAYOUT_PLANAR: u32 = 0x2 << 4;
pub const SPARK_LAYOUT_MASK: u32 = 0x0F << 4;

// Block types (bits [8..10])
pub const SPARK_BLOCK_INVALID: u32 = 0;
pub const SPARK_BLOCK_PROCESS: u32 = 0x1 << 8;
pub const SPARK_BLOCK_CONVERT: u32 = 0x2 << 8;
pub const SPARK_BLOCK_SOURCE: u32 = 0x3 << 8;
pub const SPARK_BLOCK_SINK: u32 = 0x4 << 8;
pub const SPARK_BLOCK_TYPE_MASK: u32 = 0x7 << 8;

// Status codes
pub const SPARK_NOERROR: Status = 0;
pub const SPARK_ERR_INVALID_PARAM: Status = 1;
pub const SPARK_ERR_INVALID_SIZE: Status = 2;
pub const SPARK_ERR_INVALID_ABI: Status = 3;
pub const SPARK_ERR_INVALID_INPUT: Status = 4;
pub const SPARK_ERR_INVALID_OUTPUT: Status = 5;
pub const SPARK_ERR_INVALID_BLOCK: Status = 6;

// Coefficient sharing for `SosfiltF32::flags`
pub const SPARK_SOSFILT_INDEPENDENT_SOS: u32 = 0;
pub const SPARK_SOSFILT_SHARE_SOS: u32 = 1;

const _: () = assert!(SPARK_FMT_MASK & SPARK_LAYOUT_MASK == 0);
const _: () = assert!(SPARK_FMT_MASK & SPARK_BLOCK_TYPE_MASK == 0);
const _: () = assert!(SPARK_LAYOUT_MASK & SPARK_BLOCK_TYPE_MASK == 0);

/// Descriptor of a multichannel audio buffer (`spark_buffer_t`).
///
/// `frames` is the number of samples per channel. The sample format and
/// memory layout live in `flags`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buffer {
    pub base: *mut c_void,
    pub channels: u32,
    pub frames: u32,
    pub flags: u32,
}

impl Default for Buffer {
    fn default() -> Self {
        Self {
            base: std::ptr::null_mut(),
            channels: 0,
            frames: 0,
            flags: 0,
        }
    }
}

/// Input/output descriptor pair plus versioning header (`spark_block_t`).
///
/// Callers set `abi_version` to [`SPARK_ABI_VERSION`] and `struct_size` to
/// `size_of::<Block>()` (or more) before handing it to the library.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Block {
    pub abi_version: u32,
    pub struct_size: u32,
    pub input: Buffer,
    pub output: Buffer,
}

/// Cascaded second-order-section filter instance (`spark_sosfilt_f32_t`).
///
/// `header` comes first so a pointer to this struct is also a valid
/// `*const Block`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SosfiltF32 {
    pub header: Block,
    pub coefficients: *const f32,
    pub states: *mut f32,
    pub n_stages: u32,
    pub flags: u32,
}

impl Default for SosfiltF32 {
    fn default() -> Self {
        Self {
            header: Block::default(),
            coefficients: std::ptr::null(),
            states: std::ptr::null_mut(),
            n_stages: 0,
            flags: SPARK_SOSFILT_INDEPENDENT_SOS,
        }
    }
}
