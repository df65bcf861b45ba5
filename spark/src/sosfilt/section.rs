// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Single second-order section, transposed direct form II.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of packed coefficients per section: `{b0, b1, b2, -a1, -a2}`.
pub const COEFFS_PER_SECTION: usize = 5;

/// Number of state values per section: `{w1, w2}`.
pub const STATE_PER_SECTION: usize = 2;

/// Coefficients of one biquad with `a0` normalized to 1 and the feedback
/// terms stored negated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub neg_a1: f32,
    pub neg_a2: f32,
}

impl Section {
    /// Passes every sample through unchanged.
    pub const IDENTITY: Section = Section {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        neg_a1: 0.0,
        neg_a2: 0.0,
    };

    pub const fn from_packed(packed: &[f32; COEFFS_PER_SECTION]) -> Self {
        let [b0, b1, b2, neg_a1, neg_a2] = *packed;
        Self {
            b0,
            b1,
            b2,
            neg_a1,
            neg_a2,
        }
    }

    pub const fn to_packed(self) -> [f32; COEFFS_PER_SECTION] {
        [self.b0, self.b1, self.b2, self.neg_a1, self.neg_a2]
    }

    /// Packs a conventional `[b0, b1, b2, a0, a1, a2]` row, as emitted by
    /// common filter design tools.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateSection`] if `a0` is zero or not finite.
    pub fn from_sos(row: [f32; 6]) -> Result<Self> {
        let [b0, b1, b2, a0, a1, a2] = row;
        if a0 == 0.0 || !a0.is_finite() {
            return Err(Error::DegenerateSection { a0 });
        }
        Ok(Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            neg_a1: -(a1 / a0),
            neg_a2: -(a2 / a0),
        })
    }

    /// Filters `input` into `output`, updating `state` (`[w1, w2]`).
    ///
    /// Processes `min(input.len(), output.len())` samples.
    #[inline]
    pub fn process(&self, state: &mut [f32; STATE_PER_SECTION], input: &[f32], output: &mut [f32]) {
        let Section {
            b0,
            b1,
            b2,
            neg_a1,
            neg_a2,
        } = *self;
        let [mut w1, mut w2] = *state;

        for (x, y_out) in input.iter().zip(output.iter_mut()) {
            let x = *x;
            let y = b0 * x + w1;
            w1 = b1 * x + neg_a1 * y + w2;
            w2 = b2 * x + neg_a2 * y;
            *y_out = y;
        }

        *state = [w1, w2];
    }

    /// Filters `io` in place, updating `state`.
    ///
    /// Each sample is read before it is overwritten, so the result equals
    /// [`Section::process`] with aliased input and output.
    #[inline]
    pub fn process_in_place(&self, state: &mut [f32; STATE_PER_SECTION], io: &mut [f32]) {
        let Section {
            b0,
            b1,
            b2,
            neg_a1,
            neg_a2,
        } = *self;
        let [mut w1, mut w2] = *state;

        for v in io.iter_mut() {
            let x = *v;
            let y = b0 * x + w1;
            w1 = b1 * x + neg_a1 * y + w2;
            w2 = b2 * x + neg_a2 * y;
            *v = y;
        }

        *state = [w1, w2];
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::IDENTITY
    }
}

impl From<[f32; COEFFS_PER_SECTION]> for Section {
    fn from(packed: [f32; COEFFS_PER_SECTION]) -> Self {
        Section::from_packed(&packed)
    }
}
