// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! # libspark
//!
//! A small binary contract for multichannel audio blocks, a validation engine
//! for that contract, and a cascaded biquad (second-order-section) IIR kernel
//! that runs on validated blocks.
//!
//! ## Overview
//!
//! Every processing call receives a [`Block`]: an ABI header followed by an
//! input and an output [`Buffer`] descriptor. A descriptor carries a base
//! pointer, a channel count, a frame count and a flags word encoding the
//! sample format and memory layout. The raw `#[repr(C)]` types live in
//! [`spark_sys`]; this crate adds the safe layer and exports the C ABI.
//!
//! ### Key Concepts
//!
//! - **Flags**: packed `(format, layout, block type)` fields ([`flags`])
//! - **Validation**: ordered checks of a block against the flags an operation
//!   requires ([`validate`])
//! - **Views**: bounds-checked planar and interleaved access to sample memory ([`view`])
//! - **Kernel**: the biquad cascade with caller-owned state ([`sosfilt`])
//!
//! ## Architecture
//!
//! ```text
//! C caller ──► spark_sosfilt_f32 ──► process_instance ──► validate_raw
//!                                                      └─► SosFilter ──► Section
//!
//! Rust caller ──► SosFilter::new ──► process / process_in_place (views)
//!                               └──► process_block (Block)
//! ```
//!
//! ## Examples
//!
//! ### Filtering a planar block
//!
//! ```
//! use spark::{
//!     buffer::{new_block, planar_f32},
//!     sosfilt::{CoefficientMode, Section, SosFilter},
//! };
//!
//! # fn main() -> Result<(), spark::Error> {
//! // y[n] = x[n] + 0.5 * y[n - 1], same section on both channels
//! let section = Section::from_sos([1.0, 0.0, 0.0, 1.0, -0.5, 0.0])?;
//! let coefficients = section.to_packed();
//! let mut state = [0.0f32; 4];
//! let mut filter = SosFilter::new(&coefficients, &mut state, 1, 2, CoefficientMode::Shared)?;
//!
//! let mut input = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
//! let mut output = [0.0f32; 6];
//! let block = new_block(planar_f32(&mut input, 2), planar_f32(&mut output, 2));
//! unsafe { filter.process_block(&block)? };
//!
//! assert_eq!(output, [1.0, 0.5, 0.25, 1.0, 0.5, 0.25]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Validating a block
//!
//! ```
//! use spark::{Buffer, buffer::{new_block, planar_f32}, validate::validate};
//! use spark_sys::{SPARK_BLOCK_SOURCE, SPARK_FMT_F32, SPARK_LAYOUT_PLANAR};
//!
//! let mut samples = [0.0f32; 8];
//! let block = new_block(Buffer::default(), planar_f32(&mut samples, 2));
//! // a source only produces, so the empty input is fine
//! assert!(validate(&block, SPARK_FMT_F32 | SPARK_LAYOUT_PLANAR | SPARK_BLOCK_SOURCE).is_ok());
//! ```
//!
//! ## Thread Safety
//!
//! Nothing here locks or allocates on the processing path. A [`SosFilter`]
//! borrows its state mutably, so one state array cannot be driven from two
//! places at once in Rust; C callers must serialize calls sharing a state array.
//!
//! ## Feature Flags
//!
//! - `strict-checks`: check coefficients and state on every filter setup and
//!   abort from `spark_sosfilt_f32` on a failed precondition, as debug builds
//!   already do
//!
//! [`SosFilter`]: sosfilt::SosFilter

mod error;
mod ffi;

pub mod buffer;
pub mod config;
pub mod flags;
pub mod sosfilt;
pub mod validate;
pub mod view;

pub use error::{Error, Result, strerror, to_status};
pub use ffi::{
    spark_abi_version, spark_block_validate, spark_sosfilt_f32, spark_sosfilt_f32_checked,
    spark_strerror, spark_version,
};
pub use flags::{BlockType, Layout, RequiredFlags, SampleFormat};
pub use spark_sys::{Block, Buffer, SosfiltF32, Status};
pub use view::{InterleavedView, InterleavedViewMut, PlanarView, PlanarViewMut, Sample};
