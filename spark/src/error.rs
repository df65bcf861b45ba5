// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Error types for libspark operations.
//!
//! This module maps the stable C status codes to an idiomatic Rust error enum
//! and back, and holds the fixed phrases handed out by `spark_strerror`.

use std::ffi::CStr;

use spark_sys::Status;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by block validation and the filter kernel.
///
/// The first six variants correspond one to one with the non-zero C status
/// codes. The remaining variants are kernel preconditions; across the C ABI
/// they collapse onto [`spark_sys::SPARK_ERR_INVALID_PARAM`] or
/// [`spark_sys::SPARK_ERR_INVALID_BLOCK`] (see [`Error::status`]).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Null block, missing/invalid required flags, or otherwise malformed call.
    #[error("invalid parameter")]
    InvalidParam,

    /// `struct_size` is smaller than the block type.
    #[error("invalid size")]
    InvalidSize,

    /// `abi_version` does not match [`spark_sys::SPARK_ABI_VERSION`].
    #[error("invalid ABI version")]
    InvalidAbi,

    /// Input buffer has a null base, zero shape, or the wrong format/layout.
    #[error("invalid input buffer")]
    InvalidInput,

    /// Output buffer has a null base, zero shape, or the wrong format/layout.
    #[error("invalid output buffer")]
    InvalidOutput,

    /// Cross-buffer or block-type constraint violated.
    #[error("invalid block constraints")]
    InvalidBlock,

    /// A non-zero status code this library does not define.
    #[error("unknown error: {0}")]
    Unknown(Status),

    #[error("coefficient array is null")]
    NullCoefficients,

    #[error("state array is null")]
    NullState,

    #[error("stage count is zero")]
    ZeroStages,

    #[error("coefficient array holds {actual} values, {required} required")]
    CoefficientsTooShort { required: usize, actual: usize },

    #[error("state array holds {actual} values, {required} required")]
    StateTooShort { required: usize, actual: usize },

    /// Buffer channel count differs from the channel count the filter was set up for.
    #[error("buffer has {actual} channels, filter expects {expected}")]
    ChannelMismatch { expected: usize, actual: usize },

    /// Input and output regions overlap without being the same region.
    #[error("input and output buffers partially overlap")]
    OverlappingBuffers,

    /// A section row whose `a0` is zero or not finite.
    #[error("section has a degenerate leading denominator coefficient {a0}")]
    DegenerateSection { a0: f32 },

    #[error("coefficient {index} is not finite")]
    NonFiniteCoefficient { index: usize },

    #[error("state value {index} is not finite")]
    NonFiniteState { index: usize },

    /// Section poles lie on or outside the unit circle.
    #[error("section {index} is unstable")]
    UnstableSection { index: usize },
}

impl Error {
    /// Converts a C status code to a Rust [`Result`].
    ///
    /// - `Ok(())` if `status == SPARK_NOERROR`
    /// - `Err(Error::...)` for any other code; codes outside the defined set
    ///   become [`Error::Unknown`].
    pub fn from_status(status: Status) -> Result<()> {
        match status {
            spark_sys::SPARK_NOERROR => Ok(()),
            spark_sys::SPARK_ERR_INVALID_PARAM => Err(Error::InvalidParam),
            spark_sys::SPARK_ERR_INVALID_SIZE => Err(Error::InvalidSize),
            spark_sys::SPARK_ERR_INVALID_ABI => Err(Error::InvalidAbi),
            spark_sys::SPARK_ERR_INVALID_INPUT => Err(Error::InvalidInput),
            spark_sys::SPARK_ERR_INVALID_OUTPUT => Err(Error::InvalidOutput),
            spark_sys::SPARK_ERR_INVALID_BLOCK => Err(Error::InvalidBlock),
            other => Err(Error::Unknown(other)),
        }
    }

    /// Returns the C status code reported for this error.
    pub fn status(&self) -> Status {
        match self {
            Error::InvalidParam => spark_sys::SPARK_ERR_INVALID_PARAM,
            Error::InvalidSize => spark_sys::SPARK_ERR_INVALID_SIZE,
            Error::InvalidAbi => spark_sys::SPARK_ERR_INVALID_ABI,
            Error::InvalidInput => spark_sys::SPARK_ERR_INVALID_INPUT,
            Error::InvalidOutput => spark_sys::SPARK_ERR_INVALID_OUTPUT,
            Error::InvalidBlock => spark_sys::SPARK_ERR_INVALID_BLOCK,
            Error::Unknown(status) => *status,
            Error::ChannelMismatch { .. } | Error::OverlappingBuffers => {
                spark_sys::SPARK_ERR_INVALID_BLOCK
            }
            Error::NullCoefficients
            | Error::NullState
            | Error::ZeroStages
            | Error::CoefficientsTooShort { .. }
            | Error::StateTooShort { .. }
            | Error::DegenerateSection { .. }
            | Error::NonFiniteCoefficient { .. }
            | Error::NonFiniteState { .. }
            | Error::UnstableSection { .. } => spark_sys::SPARK_ERR_INVALID_PARAM,
        }
    }
}

/// Collapses a [`Result`] onto the C status code convention.
pub fn to_status(result: Result<()>) -> Status {
    match result {
        Ok(()) => spark_sys::SPARK_NOERROR,
        Err(err) => err.status(),
    }
}

/// Returns the fixed human-readable phrase for a status code as a C string.
pub fn strerror_cstr(status: Status) -> &'static CStr {
    match status {
        spark_sys::SPARK_NOERROR => c"no error",
        spark_sys::SPARK_ERR_INVALID_PARAM => c"invalid parameter",
        spark_sys::SPARK_ERR_INVALID_SIZE => c"invalid size",
        spark_sys::SPARK_ERR_INVALID_ABI => c"invalid ABI version",
        spark_sys::SPARK_ERR_INVALID_INPUT => c"invalid input buffer",
        spark_sys::SPARK_ERR_INVALID_OUTPUT => c"invalid output buffer",
        spark_sys::SPARK_ERR_INVALID_BLOCK => c"invalid block constraints",
        _ => c"unknown error",
    }
}

/// Returns the fixed human-readable phrase for a status code.
///
/// Unknown codes map to `"unknown error"`.
pub fn strerror(status: Status) -> &'static str {
    strerror_cstr(status).to_str().unwrap_or("unknown error")
}
