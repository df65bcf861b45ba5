// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Development-time checks on coefficients and state.
//!
//! The kernel itself does not clamp, flush denormals or test stability. These
//! checks run automatically in [`super::SosFilter::new`] when the crate is
//! built with the `strict-checks` feature and can be called directly at any
//! time.

use crate::{Error, Result};

use super::section::{COEFFS_PER_SECTION, Section};

/// Returns `true` if the section's poles lie strictly inside the unit circle.
///
/// Uses the stability triangle of the denominator `1 + a1 z^-1 + a2 z^-2`:
/// `|a2| < 1` and `|a1| < 1 + a2`.
pub fn is_stable(section: &Section) -> bool {
    let a1 = -section.neg_a1;
    let a2 = -section.neg_a2;
    a2.abs() < 1.0 && a1.abs() < 1.0 + a2
}

/// Checks that every coefficient is finite and every packed section is stable.
///
/// `coefficients.len()` need not be a multiple of 5; a trailing partial
/// section is only checked for finiteness.
///
/// # Errors
///
/// - [`Error::NonFiniteCoefficient`] with the flat index of the first offender
/// - [`Error::UnstableSection`] with the index of the first unstable section
pub fn check_coefficients(coefficients: &[f32]) -> Result<()> {
    if let Some(index) = coefficients.iter().position(|c| !c.is_finite()) {
        return Err(Error::NonFiniteCoefficient { index });
    }
    for (index, packed) in coefficients.chunks_exact(COEFFS_PER_SECTION).enumerate() {
        let Some(packed) = packed.first_chunk::<COEFFS_PER_SECTION>() else {
            continue;
        };
        if !is_stable(&Section::from_packed(packed)) {
            return Err(Error::UnstableSection { index });
        }
    }
    Ok(())
}

/// Checks that every state value is finite.
///
/// # Errors
///
/// Returns [`Error::NonFiniteState`] with the index of the first offender.
pub fn check_state(state: &[f32]) -> Result<()> {
    match state.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(Error::NonFiniteState { index }),
        None => Ok(()),
    }
}
