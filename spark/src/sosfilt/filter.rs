// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Multichannel cascade over caller-owned coefficient and state arrays.

use tracing::trace;

use crate::{
    Block, Error, Result, buffer,
    flags::{BlockType, Layout, RequiredFlags, SampleFormat},
    validate,
    view::{PlanarView, PlanarViewMut},
};

use super::{
    addressing::{
        CoefficientMode, coeff_offset, required_coefficients, required_state, state_offset,
    },
    section::{COEFFS_PER_SECTION, STATE_PER_SECTION, Section},
};

/// Flags every block handed to the kernel must satisfy.
pub const SOSFILT_REQUIRED_FLAGS: RequiredFlags =
    RequiredFlags::new(SampleFormat::F32, Layout::Planar, BlockType::Process);

/// Cascaded biquad filter borrowing its coefficients and state.
///
/// The filter allocates nothing. Coefficients are read-only; the state array
/// is updated in place by every call and must be zeroed by the caller for a
/// cold start. Reusing the same state array across calls continues the
/// filter seamlessly, so processing a signal in chunks yields the same
/// output as processing it in one go.
///
/// # Examples
///
/// ```
/// use spark::sosfilt::{CoefficientMode, Section, SosFilter};
/// use spark::view::PlanarViewMut;
///
/// # fn main() -> Result<(), spark::Error> {
/// let coefficients = Section::IDENTITY.to_packed();
/// let mut state = [0.0f32; 4]; // 2 channels * 1 stage * 2
/// let mut filter = SosFilter::new(&coefficients, &mut state, 1, 2, CoefficientMode::Shared)?;
///
/// let mut samples = [1.0f32, 2.0, 3.0, 4.0];
/// let mut io = PlanarViewMut::new(&mut samples, 2, 2)?;
/// filter.process_in_place(&mut io)?;
/// assert_eq!(samples, [1.0, 2.0, 3.0, 4.0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SosFilter<'a> {
    coefficients: &'a [f32],
    state: &'a mut [f32],
    stages: usize,
    channels: usize,
    mode: CoefficientMode,
}

impl<'a> SosFilter<'a> {
    /// Sets up a filter of `stages` sections for `channels` planes.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroStages`] if `stages == 0`
    /// - [`Error::InvalidParam`] if `channels == 0`
    /// - [`Error::CoefficientsTooShort`] / [`Error::StateTooShort`] if an
    ///   array cannot cover every `(channel, stage)` pair
    /// - with the `strict-checks` feature, any error from [`super::strict`]
    pub fn new(
        coefficients: &'a [f32],
        state: &'a mut [f32],
        stages: usize,
        channels: usize,
        mode: CoefficientMode,
    ) -> Result<Self> {
        if stages == 0 {
            return Err(Error::ZeroStages);
        }
        if channels == 0 {
            return Err(Error::InvalidParam);
        }

        let coeff_len = required_coefficients(mode, stages, channels).ok_or(Error::InvalidParam)?;
        if coefficients.len() < coeff_len {
            return Err(Error::CoefficientsTooShort {
                required: coeff_len,
                actual: coefficients.len(),
            });
        }
        let state_len = required_state(stages, channels).ok_or(Error::InvalidParam)?;
        if state.len() < state_len {
            return Err(Error::StateTooShort {
                required: state_len,
                actual: state.len(),
            });
        }

        if crate::config::strict_checks_enabled() {
            super::strict::check_coefficients(&coefficients[..coeff_len])?;
            super::strict::check_state(&state[..state_len])?;
        }

        trace!(stages, channels, ?mode, "sosfilt configured");
        Ok(Self {
            coefficients,
            state,
            stages,
            channels,
            mode,
        })
    }

    pub fn stages(&self) -> usize {
        self.stages
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn mode(&self) -> CoefficientMode {
        self.mode
    }

    /// Returns the coefficients of `(channel, stage)`.
    pub fn section(&self, channel: usize, stage: usize) -> Option<Section> {
        if channel >= self.channels || stage >= self.stages {
            return None;
        }
        let offset = coeff_offset(self.mode, self.stages, channel, stage);
        self.coefficients
            .get(offset..)
            .and_then(|rest| rest.first_chunk::<COEFFS_PER_SECTION>())
            .map(Section::from_packed)
    }

    /// Returns the `[w1, w2]` state of `(channel, stage)`.
    pub fn state(&self, channel: usize, stage: usize) -> Option<[f32; STATE_PER_SECTION]> {
        if channel >= self.channels || stage >= self.stages {
            return None;
        }
        let offset = state_offset(self.stages, channel, stage);
        self.state
            .get(offset..)
            .and_then(|rest| rest.first_chunk::<STATE_PER_SECTION>())
            .copied()
    }

    /// Zeroes the state used by this filter.
    pub fn reset(&mut self) {
        let used = self.stages * self.channels * STATE_PER_SECTION;
        self.state[..used].fill(0.0);
    }

    /// Splits out the section and mutable state slot of `(channel, stage)`.
    fn slot(
        &mut self,
        channel: usize,
        stage: usize,
    ) -> Result<(Section, &mut [f32; STATE_PER_SECTION])> {
        let coeff = coeff_offset(self.mode, self.stages, channel, stage);
        let section = self
            .coefficients
            .get(coeff..)
            .and_then(|rest| rest.first_chunk::<COEFFS_PER_SECTION>())
            .map(Section::from_packed)
            .ok_or(Error::CoefficientsTooShort {
                required: coeff + COEFFS_PER_SECTION,
                actual: self.coefficients.len(),
            })?;
        let offset = state_offset(self.stages, channel, stage);
        let actual = self.state.len();
        let state = self
            .state
            .get_mut(offset..)
            .and_then(|rest| rest.first_chunk_mut::<STATE_PER_SECTION>())
            .ok_or(Error::StateTooShort {
                required: offset + STATE_PER_SECTION,
                actual,
            })?;
        Ok((section, state))
    }

    fn check_channels(&self, actual: usize) -> Result<()> {
        if actual != self.channels {
            return Err(Error::ChannelMismatch {
                expected: self.channels,
                actual,
            });
        }
        Ok(())
    }

    /// Filters every input plane into the matching output plane.
    ///
    /// Stage 0 reads the input plane and writes the output plane; every later
    /// stage runs in place on the output plane.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelMismatch`] if either view's channel count differs
    ///   from the filter's
    /// - [`Error::InvalidBlock`] if the views differ in frame count
    pub fn process(
        &mut self,
        input: &PlanarView<'_, f32>,
        output: &mut PlanarViewMut<'_, f32>,
    ) -> Result<()> {
        self.check_channels(input.channels())?;
        self.check_channels(output.channels())?;
        if input.frames() != output.frames() {
            return Err(Error::InvalidBlock);
        }

        for (channel, (src, dst)) in input
            .channels_iter()
            .zip(output.channels_iter_mut())
            .enumerate()
        {
            let (section, state) = self.slot(channel, 0)?;
            section.process(state, src, dst);
            for stage in 1..self.stages {
                let (section, state) = self.slot(channel, stage)?;
                section.process_in_place(state, dst);
            }
        }
        Ok(())
    }

    /// Filters every plane of `io` in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelMismatch`] if the view's channel count differs
    /// from the filter's.
    pub fn process_in_place(&mut self, io: &mut PlanarViewMut<'_, f32>) -> Result<()> {
        self.check_channels(io.channels())?;

        for (channel, plane) in io.channels_iter_mut().enumerate() {
            for stage in 0..self.stages {
                let (section, state) = self.slot(channel, stage)?;
                section.process_in_place(state, plane);
            }
        }
        Ok(())
    }

    /// Validates `block` as a planar `f32` Process block and filters it.
    ///
    /// Input and output with the same base pointer are processed in place.
    ///
    /// # Errors
    ///
    /// - any validation error from [`crate::validate::validate_typed`]
    /// - [`Error::OverlappingBuffers`] if the two regions overlap without
    ///   starting at the same address
    /// - [`Error::ChannelMismatch`] if the block's channel count differs from
    ///   the filter's
    ///
    /// # Safety
    ///
    /// Both buffer descriptors must describe live, initialized memory of the
    /// declared shape, not accessed through any other path for the duration
    /// of the call.
    pub unsafe fn process_block(&mut self, block: &Block) -> Result<()> {
        validate::check_header(block)?;
        validate::validate_typed(block, SOSFILT_REQUIRED_FLAGS)?;
        unsafe { self.run_validated(block) }
    }

    /// Runs the cascade over a block that already passed validation.
    ///
    /// # Safety
    ///
    /// Same contract as [`SosFilter::process_block`].
    pub(crate) unsafe fn run_validated(&mut self, block: &Block) -> Result<()> {
        self.check_channels(block.input.channels as usize)?;

        if block.input.base == block.output.base {
            let mut io = unsafe { PlanarViewMut::<f32>::from_buffer(&block.output)? };
            return self.process_in_place(&mut io);
        }
        if regions_overlap(block) {
            return Err(Error::OverlappingBuffers);
        }
        let input = unsafe { PlanarView::<f32>::from_buffer(&block.input)? };
        let mut output = unsafe { PlanarViewMut::<f32>::from_buffer(&block.output)? };
        self.process(&input, &mut output)
    }
}

/// Returns `true` if the byte ranges of input and output intersect.
fn regions_overlap(block: &Block) -> bool {
    let in_len = buffer::byte_len(&block.input);
    let out_len = buffer::byte_len(&block.output);
    let (Some(in_len), Some(out_len)) = (in_len, out_len) else {
        return true;
    };
    let in_start = block.input.base as usize;
    let out_start = block.output.base as usize;
    in_start < out_start.saturating_add(out_len) && out_start < in_start.saturating_add(in_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{new_block, planar_f32};

    fn one_pole(feedback: f32) -> Section {
        Section {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            neg_a1: feedback,
            neg_a2: 0.0,
        }
    }

    #[test]
    fn setup_rejects_bad_shapes() {
        let coefficients = [0.0f32; 10];
        let mut state = [0.0f32; 8];
        assert_eq!(
            SosFilter::new(&coefficients, &mut state, 0, 1, CoefficientMode::Shared).unwrap_err(),
            Error::ZeroStages
        );
        assert_eq!(
            SosFilter::new(&coefficients, &mut state, 1, 0, CoefficientMode::Shared).unwrap_err(),
            Error::InvalidParam
        );
        let independent = CoefficientMode::Independent;
        assert_eq!(
            SosFilter::new(&coefficients, &mut state, 2, 2, independent).unwrap_err(),
            Error::CoefficientsTooShort {
                required: 20,
                actual: 10
            }
        );
        assert_eq!(
            SosFilter::new(&coefficients, &mut state, 2, 3, CoefficientMode::Shared).unwrap_err(),
            Error::StateTooShort {
                required: 12,
                actual: 8
            }
        );
    }

    #[cfg(feature = "strict-checks")]
    #[test]
    fn strict_setup_rejects_unstable_sections_and_bad_state() {
        // pole at z = 1.5
        let unstable = one_pole(1.5).to_packed();
        let mut state = [0.0f32; 2];
        assert_eq!(
            SosFilter::new(&unstable, &mut state, 1, 1, CoefficientMode::Shared).unwrap_err(),
            Error::UnstableSection { index: 0 }
        );

        let mut coefficients = Section::IDENTITY.to_packed();
        coefficients[2] = f32::NAN;
        assert_eq!(
            SosFilter::new(&coefficients, &mut state, 1, 1, CoefficientMode::Shared).unwrap_err(),
            Error::NonFiniteCoefficient { index: 2 }
        );

        let identity = Section::IDENTITY.to_packed();
        let mut state = [0.0f32, f32::NAN];
        assert_eq!(
            SosFilter::new(&identity, &mut state, 1, 1, CoefficientMode::Shared).unwrap_err(),
            Error::NonFiniteState { index: 1 }
        );
    }

    #[cfg(not(feature = "strict-checks"))]
    #[test]
    fn setup_without_strict_checks_accepts_unstable_sections() {
        let unstable = one_pole(1.5).to_packed();
        let mut state = [0.0f32, f32::NAN];
        let filter = SosFilter::new(&unstable, &mut state, 1, 1, CoefficientMode::Shared);
        assert!(filter.is_ok());
    }

    #[test]
    fn cascade_feeds_each_stage_with_the_previous_output() {
        let mut coefficients = one_pole(0.5).to_packed().to_vec();
        coefficients.extend(one_pole(0.5).to_packed());
        let mut state = [0.0f32; 4];
        let mode = CoefficientMode::Independent;
        let mut filter = SosFilter::new(&coefficients, &mut state, 2, 1, mode).unwrap();

        let input = [1.0f32, 0.0, 0.0, 0.0];
        let mut out = [0.0f32; 4];
        let mut output = PlanarViewMut::new(&mut out, 1, 4).unwrap();
        filter
            .process(&PlanarView::new(&input, 1, 4).unwrap(), &mut output)
            .unwrap();
        // (1 - 0.5 z^-1)^-2 impulse response: (n + 1) * 0.5^n
        assert_eq!(out, [1.0, 1.0, 0.75, 0.5]);
    }

    #[test]
    fn independent_mode_gives_each_channel_its_own_sections() {
        let doubled = Section {
            b0: 2.0,
            ..Section::IDENTITY
        };
        let mut coefficients = Section::IDENTITY.to_packed().to_vec();
        coefficients.extend(doubled.to_packed());
        let mut state = [0.0f32; 4];
        let mode = CoefficientMode::Independent;
        let mut filter = SosFilter::new(&coefficients, &mut state, 1, 2, mode).unwrap();
        assert_eq!(filter.section(1, 0).map(|s| s.b0), Some(2.0));

        let mut samples = [1.0f32, 2.0, 1.0, 2.0];
        filter
            .process_in_place(&mut PlanarViewMut::new(&mut samples, 2, 2).unwrap())
            .unwrap();
        assert_eq!(samples, [1.0, 2.0, 2.0, 4.0]);
    }

    #[test]
    fn channel_count_must_match() {
        let coefficients = Section::IDENTITY.to_packed();
        let mut state = [0.0f32; 2];
        let mode = CoefficientMode::Shared;
        let mut filter = SosFilter::new(&coefficients, &mut state, 1, 1, mode).unwrap();
        let mut samples = [0.0f32; 4];
        let mut io = PlanarViewMut::new(&mut samples, 2, 2).unwrap();
        assert_eq!(
            filter.process_in_place(&mut io),
            Err(Error::ChannelMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn aliased_block_runs_in_place() {
        let coefficients = one_pole(0.5).to_packed();
        let mut state = [0.0f32; 2];
        let mut samples = [1.0f32, 0.0, 0.0];
        let io = planar_f32(&mut samples, 1);
        let block = new_block(io, io);
        {
            let mode = CoefficientMode::Shared;
            let mut filter = SosFilter::new(&coefficients, &mut state, 1, 1, mode).unwrap();
            unsafe { filter.process_block(&block) }.unwrap();
        }
        assert_eq!(samples, [1.0, 0.5, 0.25]);
        assert_eq!(state, [0.125, 0.0]);
    }

    #[test]
    fn partial_overlap_is_rejected() {
        let coefficients = Section::IDENTITY.to_packed();
        let mut state = [0.0f32; 2];
        let mut samples = [0.0f32; 5];
        let input = planar_f32(&mut samples[..4], 1);
        let output = planar_f32(&mut samples[1..5], 1);
        let block = new_block(input, output);
        let mode = CoefficientMode::Shared;
        let mut filter = SosFilter::new(&coefficients, &mut state, 1, 1, mode).unwrap();
        assert_eq!(
            unsafe { filter.process_block(&block) },
            Err(Error::OverlappingBuffers)
        );
    }

    #[test]
    fn reset_zeroes_state() {
        let coefficients = one_pole(0.5).to_packed();
        let mut state = [0.0f32; 2];
        let mode = CoefficientMode::Shared;
        let mut filter = SosFilter::new(&coefficients, &mut state, 1, 1, mode).unwrap();
        let mut samples = [1.0f32, 1.0];
        filter
            .process_in_place(&mut PlanarViewMut::new(&mut samples, 1, 2).unwrap())
            .unwrap();
        assert_ne!(filter.state(0, 0), Some([0.0, 0.0]));
        filter.reset();
        assert_eq!(filter.state(0, 0), Some([0.0, 0.0]));
        assert_eq!(filter.state(1, 0), None);
    }
}
