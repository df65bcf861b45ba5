// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Bounds-checked sample views over validated buffers.
//!
//! A view pairs a contiguous sample slice with the `(channels, frames)` shape
//! and the layout that gives it meaning, so callers index channels or frames
//! instead of doing offset arithmetic on `base`.
//!
//! Views are built either from a Rust slice ([`PlanarView::new`] and friends)
//! or from a raw [`Buffer`] that has passed validation
//! ([`PlanarView::from_buffer`] and friends).

use crate::{
    Buffer, Error, Result, buffer,
    flags::{Layout, SampleFormat},
};

mod sealed {
    pub trait Sealed {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Element types a buffer can hold.
pub trait Sample: sealed::Sealed + Copy + Default + PartialEq + std::fmt::Debug + 'static {
    /// Format tag matching this element type.
    const FORMAT: SampleFormat;
}

impl Sample for i16 {
    const FORMAT: SampleFormat = SampleFormat::I16;
}

impl Sample for i32 {
    const FORMAT: SampleFormat = SampleFormat::I32;
}

impl Sample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;
}

impl Sample for f64 {
    const FORMAT: SampleFormat = SampleFormat::F64;
}

/// Checks a shape against a slice length and returns the sample count it covers.
fn shape_len(len: usize, channels: usize, frames: usize) -> Result<usize> {
    if channels == 0 || frames == 0 {
        return Err(Error::InvalidParam);
    }
    let needed = channels.checked_mul(frames).ok_or(Error::InvalidParam)?;
    if needed > len {
        return Err(Error::InvalidParam);
    }
    Ok(needed)
}

/// Checks a raw descriptor for view construction and returns `(channels, frames)`.
fn buffer_shape<T: Sample>(buf: &Buffer, layout: Layout) -> Result<(usize, usize)> {
    if !buffer::is_valid(buf) || !buffer::check_type(buf, T::FORMAT, layout) {
        return Err(Error::InvalidParam);
    }
    if !buf.base.cast::<T>().is_aligned() {
        return Err(Error::InvalidParam);
    }
    let channels = buf.channels as usize;
    let frames = buf.frames as usize;
    channels.checked_mul(frames).ok_or(Error::InvalidParam)?;
    Ok((channels, frames))
}

/// Read-only view of channel-major contiguous planes.
#[derive(Debug, Clone, Copy)]
pub struct PlanarView<'a, T> {
    data: &'a [T],
    channels: usize,
    frames: usize,
}

impl<'a, T: Sample> PlanarView<'a, T> {
    /// Creates a view over the first `channels * frames` samples of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the shape is empty or larger than `data`.
    pub fn new(data: &'a [T], channels: usize, frames: usize) -> Result<Self> {
        let len = shape_len(data.len(), channels, frames)?;
        Ok(Self {
            data: &data[..len],
            channels,
            frames,
        })
    }

    /// Creates a view from a raw planar descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the descriptor is not valid or is
    /// not planar with element type `T`.
    ///
    /// # Safety
    ///
    /// `buf.base` must point to `channels * frames` initialized samples of
    /// type `T` that stay readable and are not written through any other
    /// path for `'a`.
    pub unsafe fn from_buffer(buf: &Buffer) -> Result<Self> {
        let (channels, frames) = buffer_shape::<T>(buf, Layout::Planar)?;
        let data = unsafe { std::slice::from_raw_parts(buf.base.cast::<T>(), channels * frames) };
        Ok(Self {
            data,
            channels,
            frames,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the plane of channel `channel`, or `None` if out of range.
    pub fn channel(&self, channel: usize) -> Option<&'a [T]> {
        if channel >= self.channels {
            return None;
        }
        let data = self.data;
        let start = channel * self.frames;
        Some(&data[start..start + self.frames])
    }

    /// Iterates planes in channel order.
    pub fn channels_iter(&self) -> std::slice::ChunksExact<'a, T> {
        self.data.chunks_exact(self.frames)
    }

    /// All samples, plane after plane.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

/// Mutable view of channel-major contiguous planes.
#[derive(Debug)]
pub struct PlanarViewMut<'a, T> {
    data: &'a mut [T],
    channels: usize,
    frames: usize,
}

impl<'a, T: Sample> PlanarViewMut<'a, T> {
    /// Creates a mutable view over the first `channels * frames` samples of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the shape is empty or larger than `data`.
    pub fn new(data: &'a mut [T], channels: usize, frames: usize) -> Result<Self> {
        let len = shape_len(data.len(), channels, frames)?;
        Ok(Self {
            data: &mut data[..len],
            channels,
            frames,
        })
    }

    /// Creates a mutable view from a raw planar descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the descriptor is not valid or is
    /// not planar with element type `T`.
    ///
    /// # Safety
    ///
    /// `buf.base` must point to `channels * frames` initialized samples of
    /// type `T`, writable and not accessed through any other path for `'a`.
    pub unsafe fn from_buffer(buf: &Buffer) -> Result<Self> {
        let (channels, frames) = buffer_shape::<T>(buf, Layout::Planar)?;
        let data =
            unsafe { std::slice::from_raw_parts_mut(buf.base.cast::<T>(), channels * frames) };
        Ok(Self {
            data,
            channels,
            frames,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn channel(&self, channel: usize) -> Option<&[T]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.frames;
        Some(&self.data[start..start + self.frames])
    }

    /// Returns the plane of channel `channel` for writing, or `None` if out of range.
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [T]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.frames;
        Some(&mut self.data[start..start + self.frames])
    }

    pub fn channels_iter(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.frames)
    }

    pub fn channels_iter_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.frames)
    }

    pub fn as_slice(&self) -> &[T] {
        self.data
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> PlanarView<'_, T> {
        PlanarView {
            data: self.data,
            channels: self.channels,
            frames: self.frames,
        }
    }
}

/// Read-only view of frame-major interleaved samples.
#[derive(Debug, Clone, Copy)]
pub struct InterleavedView<'a, T> {
    data: &'a [T],
    channels: usize,
    frames: usize,
}

impl<'a, T: Sample> InterleavedView<'a, T> {
    /// Creates a view over the first `frames * channels` samples of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the shape is empty or larger than `data`.
    pub fn new(data: &'a [T], channels: usize, frames: usize) -> Result<Self> {
        let len = shape_len(data.len(), channels, frames)?;
        Ok(Self {
            data: &data[..len],
            channels,
            frames,
        })
    }

    /// Creates a view from a raw interleaved descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the descriptor is not valid or is
    /// not interleaved with element type `T`.
    ///
    /// # Safety
    ///
    /// Same contract as [`PlanarView::from_buffer`].
    pub unsafe fn from_buffer(buf: &Buffer) -> Result<Self> {
        let (channels, frames) = buffer_shape::<T>(buf, Layout::Interleaved)?;
        let data = unsafe { std::slice::from_raw_parts(buf.base.cast::<T>(), channels * frames) };
        Ok(Self {
            data,
            channels,
            frames,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the `channels` samples of frame `frame`, or `None` if out of range.
    pub fn frame(&self, frame: usize) -> Option<&'a [T]> {
        if frame >= self.frames {
            return None;
        }
        let data = self.data;
        let start = frame * self.channels;
        Some(&data[start..start + self.channels])
    }

    /// Returns one sample, or `None` if either index is out of range.
    pub fn sample(&self, channel: usize, frame: usize) -> Option<T> {
        if channel >= self.channels {
            return None;
        }
        self.frame(frame).map(|samples| samples[channel])
    }

    pub fn frames_iter(&self) -> std::slice::ChunksExact<'a, T> {
        self.data.chunks_exact(self.channels)
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

/// Mutable view of frame-major interleaved samples.
#[derive(Debug)]
pub struct InterleavedViewMut<'a, T> {
    data: &'a mut [T],
    channels: usize,
    frames: usize,
}

impl<'a, T: Sample> InterleavedViewMut<'a, T> {
    /// Creates a mutable view over the first `frames * channels` samples of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the shape is empty or larger than `data`.
    pub fn new(data: &'a mut [T], channels: usize, frames: usize) -> Result<Self> {
        let len = shape_len(data.len(), channels, frames)?;
        Ok(Self {
            data: &mut data[..len],
            channels,
            frames,
        })
    }

    /// Creates a mutable view from a raw interleaved descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] if the descriptor is not valid or is
    /// not interleaved with element type `T`.
    ///
    /// # Safety
    ///
    /// Same contract as [`PlanarViewMut::from_buffer`].
    pub unsafe fn from_buffer(buf: &Buffer) -> Result<Self> {
        let (channels, frames) = buffer_shape::<T>(buf, Layout::Interleaved)?;
        let data =
            unsafe { std::slice::from_raw_parts_mut(buf.base.cast::<T>(), channels * frames) };
        Ok(Self {
            data,
            channels,
            frames,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn frame_mut(&mut self, frame: usize) -> Option<&mut [T]> {
        if frame >= self.frames {
            return None;
        }
        let start = frame * self.channels;
        Some(&mut self.data[start..start + self.channels])
    }

    /// Writes one sample. Returns `false` if either index is out of range.
    pub fn set_sample(&mut self, channel: usize, frame: usize, value: T) -> bool {
        if channel >= self.channels {
            return false;
        }
        match self.frame_mut(frame) {
            Some(samples) => {
                samples[channel] = value;
                true
            }
            None => false,
        }
    }

    pub fn as_view(&self) -> InterleavedView<'_, T> {
        InterleavedView {
            data: self.data,
            channels: self.channels,
            frames: self.frames,
        }
    }
}
