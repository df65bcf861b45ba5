// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

use crate::{Block, Error, Result, SosfiltF32, validate};

use super::{
    addressing::{CoefficientMode, required_coefficients, required_state},
    filter::{SOSFILT_REQUIRED_FLAGS, SosFilter},
};

/// Runs the cascade described by a raw filter instance.
///
/// Gates, first failure wins:
/// 1. null or misaligned `instance` → [`Error::InvalidParam`]
/// 2. header validation as an `F32 | PLANAR | PROCESS` block
/// 3. null `coefficients` → [`Error::NullCoefficients`]
/// 4. null `states` → [`Error::NullState`]
/// 5. `n_stages == 0` → [`Error::ZeroStages`]
///
/// Misaligned coefficient or state pointers are rejected with
/// [`Error::InvalidParam`]. Buffers are only touched once every gate passed.
///
/// # Safety
///
/// `instance` must be null or point to a readable [`SosfiltF32`]. Its
/// pointers must satisfy the block contract of
/// [`SosFilter::process_block`], `coefficients` must cover
/// [`required_coefficients`] floats and `states` must cover
/// [`required_state`] floats that no one else accesses during the call.
pub unsafe fn process_instance(instance: *const SosfiltF32) -> Result<()> {
    if instance.is_null() || !instance.is_aligned() {
        return Err(Error::InvalidParam);
    }
    // The header is the first field, so the instance doubles as a block pointer.
    let block = instance.cast::<Block>();
    unsafe { validate::validate_raw(block, SOSFILT_REQUIRED_FLAGS.bits())? };
    let instance = unsafe { &*instance };

    if instance.coefficients.is_null() {
        return Err(Error::NullCoefficients);
    }
    if instance.states.is_null() {
        return Err(Error::NullState);
    }
    if instance.n_stages == 0 {
        return Err(Error::ZeroStages);
    }
    if !instance.coefficients.is_aligned() || !instance.states.is_aligned() {
        return Err(Error::InvalidParam);
    }

    let stages = instance.n_stages as usize;
    let channels = instance.header.input.channels as usize;
    let mode = CoefficientMode::from_flags(instance.flags);
    let coeff_len = required_coefficients(mode, stages, channels).ok_or(Error::InvalidParam)?;
    let state_len = required_state(stages, channels).ok_or(Error::InvalidParam)?;

    let coefficients = unsafe { std::slice::from_raw_parts(instance.coefficients, coeff_len) };
    let state = unsafe { std::slice::from_raw_parts_mut(instance.states, state_len) };

    let mut filter = SosFilter::new(coefficients, state, stages, channels, mode)?;
    unsafe { filter.run_validated(&instance.header) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{new_block, planar_f32};
    use crate::sosfilt::Section;

    fn instance(
        block: Block,
        coefficients: &[f32],
        states: &mut [f32],
        n_stages: u32,
    ) -> SosfiltF32 {
        SosfiltF32 {
            header: block,
            coefficients: coefficients.as_ptr(),
            states: states.as_mut_ptr(),
            n_stages,
            flags: CoefficientMode::Shared.bits(),
        }
    }

    #[test]
    fn null_instance_is_invalid_param() {
        assert_eq!(
            unsafe { process_instance(std::ptr::null()) },
            Err(Error::InvalidParam)
        );
    }

    #[test]
    fn misaligned_instance_is_invalid_param() {
        #[repr(C, align(8))]
        struct Storage([u8; 2 * size_of::<SosfiltF32>()]);

        let coefficients = Section::IDENTITY.to_packed();
        let mut states = [0.0f32; 2];
        let mut input = [1.0f32, 2.0];
        let mut output = [0.0f32; 2];
        let block = new_block(planar_f32(&mut input, 1), planar_f32(&mut output, 1));
        let good = instance(block, &coefficients, &mut states, 1);

        let mut storage = Storage([0; 2 * size_of::<SosfiltF32>()]);
        let bytes = (&raw mut storage).cast::<u8>();
        let shifted = unsafe { bytes.add(1) }.cast::<SosfiltF32>();
        unsafe { shifted.write_unaligned(good) };
        assert_eq!(
            unsafe { process_instance(shifted) },
            Err(Error::InvalidParam)
        );
        assert_eq!(output, [0.0, 0.0]);
    }

    #[test]
    fn gates_run_in_order() {
        let coefficients = Section::IDENTITY.to_packed();
        let mut states = [0.0f32; 2];
        let mut input = [1.0f32, 2.0];
        let mut output = [0.0f32; 2];
        let block = new_block(planar_f32(&mut input, 1), planar_f32(&mut output, 1));

        let mut bad = instance(block, &coefficients, &mut states, 1);
        bad.header.abi_version = 0;
        assert_eq!(unsafe { process_instance(&bad) }, Err(Error::InvalidAbi));

        let mut bad = instance(block, &coefficients, &mut states, 0);
        bad.coefficients = std::ptr::null();
        assert_eq!(
            unsafe { process_instance(&bad) },
            Err(Error::NullCoefficients)
        );

        let mut bad = instance(block, &coefficients, &mut states, 0);
        bad.states = std::ptr::null_mut();
        assert_eq!(unsafe { process_instance(&bad) }, Err(Error::NullState));

        let bad = instance(block, &coefficients, &mut states, 0);
        assert_eq!(unsafe { process_instance(&bad) }, Err(Error::ZeroStages));
        assert_eq!(output, [0.0, 0.0]);
    }

    #[test]
    fn runs_the_kernel() {
        let coefficients = Section {
            b0: 2.0,
            ..Section::IDENTITY
        }
        .to_packed();
        let mut states = [0.0f32; 4];
        let mut input = [1.0f32, 2.0, 3.0, 4.0];
        let mut output = [0.0f32; 4];
        let block = new_block(planar_f32(&mut input, 2), planar_f32(&mut output, 2));
        let inst = instance(block, &coefficients, &mut states, 1);
        assert_eq!(unsafe { process_instance(&inst) }, Ok(()));
        assert_eq!(output, [2.0, 4.0, 6.0, 8.0]);
    }
}
