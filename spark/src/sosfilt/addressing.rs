// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Coefficient and state addressing for a multichannel cascade.
//!
//! Coefficients: `stages * 5` floats per channel in independent mode, or one
//! `stages * 5` block reused by every channel in shared mode.
//! State: always `stages * 2` floats per channel, channel-major, because
//! filter memory is per channel even when the coefficients are shared.

use spark_sys::SPARK_SOSFILT_SHARE_SOS;

use super::section::{COEFFS_PER_SECTION, STATE_PER_SECTION};

/// How the coefficient array is laid out across channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoefficientMode {
    /// Each channel owns a contiguous `stages * 5` block.
    #[default]
    Independent,
    /// All channels read the same `stages * 5` block.
    Shared,
}

impl CoefficientMode {
    /// Decodes `SosfiltF32::flags`; only the share bit is significant.
    pub const fn from_flags(flags: u32) -> Self {
        if flags & SPARK_SOSFILT_SHARE_SOS != 0 {
            CoefficientMode::Shared
        } else {
            CoefficientMode::Independent
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            CoefficientMode::Independent => spark_sys::SPARK_SOSFILT_INDEPENDENT_SOS,
            CoefficientMode::Shared => SPARK_SOSFILT_SHARE_SOS,
        }
    }
}

/// Index of the first coefficient of `(channel, stage)`.
pub const fn coeff_offset(
    mode: CoefficientMode,
    stages: usize,
    channel: usize,
    stage: usize,
) -> usize {
    let channel_base = match mode {
        CoefficientMode::Independent => channel * stages * COEFFS_PER_SECTION,
        CoefficientMode::Shared => 0,
    };
    channel_base + stage * COEFFS_PER_SECTION
}

/// Index of the first state value of `(channel, stage)`.
pub const fn state_offset(stages: usize, channel: usize, stage: usize) -> usize {
    (channel * stages + stage) * STATE_PER_SECTION
}

/// Minimum coefficient array length; `None` on overflow.
pub const fn required_coefficients(
    mode: CoefficientMode,
    stages: usize,
    channels: usize,
) -> Option<usize> {
    let per_channel = match stages.checked_mul(COEFFS_PER_SECTION) {
        Some(n) => n,
        None => return None,
    };
    match mode {
        CoefficientMode::Independent => per_channel.checked_mul(channels),
        CoefficientMode::Shared => Some(per_channel),
    }
}

/// Minimum state array length; `None` on overflow.
pub const fn required_state(stages: usize, channels: usize) -> Option<usize> {
    match stages.checked_mul(channels) {
        Some(n) => n.checked_mul(STATE_PER_SECTION),
        None => None,
    }
}
