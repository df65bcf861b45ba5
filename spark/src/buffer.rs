// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Buffer and block descriptor helpers.
//!
//! Predicates here look at descriptor metadata only. They never dereference
//! `base`.

use std::ffi::c_void;

use crate::{
    Block, Buffer,
    flags::{Layout, SampleFormat},
    view::Sample,
};

/// Returns `true` if the buffer has a non-null base and a non-zero shape.
pub fn is_valid(buf: &Buffer) -> bool {
    !buf.base.is_null() && buf.channels > 0 && buf.frames > 0
}

/// Compares two descriptors for metadata equivalence.
///
/// Two descriptors are similar when format, layout, channel count and frame
/// count match; `base` is not compared and neither field is checked for
/// validity. The same descriptor (or two `None`s) is always similar to
/// itself; a `Some`/`None` pair never is.
pub fn is_similar(a: Option<&Buffer>, b: Option<&Buffer>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) if std::ptr::eq(a, b) => true,
        (Some(a), Some(b)) => {
            crate::flags::format_bits(a.flags) == crate::flags::format_bits(b.flags)
                && crate::flags::layout_bits(a.flags) == crate::flags::layout_bits(b.flags)
                && a.channels == b.channels
                && a.frames == b.frames
        }
        _ => false,
    }
}

/// Returns `true` if the buffer's format and layout equal the given ones.
pub fn check_type(buf: &Buffer, format: SampleFormat, layout: Layout) -> bool {
    SampleFormat::from_flags(buf.flags) == Some(format)
        && Layout::from_flags(buf.flags) == Some(layout)
}

/// Total size in bytes of the region a descriptor covers.
///
/// `None` if the format is invalid or the size overflows `usize`.
pub fn byte_len(buf: &Buffer) -> Option<usize> {
    let format = SampleFormat::from_flags(buf.flags)?;
    (buf.channels as usize)
        .checked_mul(buf.frames as usize)?
        .checked_mul(format.bytes_per_sample())
}

/// Builds a descriptor over a caller-owned sample slice.
///
/// `frames` is derived as `data.len() / channels`; trailing samples that do
/// not fill a whole frame are not covered. The descriptor borrows nothing,
/// so the caller keeps `data` alive for as long as the descriptor is used.
pub fn describe<T: Sample>(data: &mut [T], channels: u32, layout: Layout) -> Buffer {
    let frames = match channels {
        0 => 0,
        n => data.len() / n as usize,
    };
    Buffer {
        base: data.as_mut_ptr().cast::<c_void>(),
        channels,
        frames: u32::try_from(frames).unwrap_or(u32::MAX),
        flags: T::FORMAT.bits() | layout.bits(),
    }
}

/// Shorthand for a planar `f32` descriptor, the shape the biquad kernel consumes.
pub fn planar_f32(data: &mut [f32], channels: u32) -> Buffer {
    describe(data, channels, Layout::Planar)
}

/// Builds a block with the ABI header filled in for this library build.
pub fn new_block(input: Buffer, output: Buffer) -> Block {
    Block {
        abi_version: spark_sys::SPARK_ABI_VERSION,
        struct_size: size_of::<Block>() as u32,
        input,
        output,
    }
}
