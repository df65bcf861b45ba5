// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Cascaded second-order-section IIR filter for planar `f32` blocks.
//!
//! Each channel runs `stages` biquads in series using the transposed direct
//! form II recurrence
//!
//! ```text
//! y  = b0*x + w1
//! w1 = b1*x + (-a1)*y + w2
//! w2 = b2*x + (-a2)*y
//! ```
//!
//! Coefficients are packed per section as `{b0, b1, b2, -a1, -a2}` with `a0`
//! normalized to 1. The state `{w1, w2}` of every `(channel, stage)` pair is
//! owned by the caller and persists between calls.
//!
//! Arithmetic is plain single precision with no fused multiply-add, denormal
//! flushing or clamping. See [`strict`] for optional sanity checks.

mod addressing;
mod filter;
mod instance;
mod section;
pub mod strict;

pub use addressing::{
    CoefficientMode, coeff_offset, required_coefficients, required_state, state_offset,
};
pub use filter::{SOSFILT_REQUIRED_FLAGS, SosFilter};
pub use instance::process_instance;
pub use section::{COEFFS_PER_SECTION, STATE_PER_SECTION, Section};
