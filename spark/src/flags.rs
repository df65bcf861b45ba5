// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Packed flags codec.
//!
//! A flags word packs three disjoint fields: sample format (bits `[0..3]`),
//! memory layout (bits `[4..7]`) and block type (bits `[8..10]`). The raw
//! accessors only mask; the typed decoders map every value outside the
//! defined set to `None` and leave error reporting to the validation engine.

use spark_sys::{
    SPARK_BLOCK_CONVERT, SPARK_BLOCK_INVALID, SPARK_BLOCK_PROCESS, SPARK_BLOCK_SINK,
    SPARK_BLOCK_SOURCE, SPARK_BLOCK_TYPE_MASK, SPARK_FMT_F32, SPARK_FMT_F64, SPARK_FMT_I16,
    SPARK_FMT_I32, SPARK_FMT_MASK, SPARK_LAYOUT_INTERLEAVED, SPARK_LAYOUT_MASK,
    SPARK_LAYOUT_PLANAR,
};

use crate::{Error, Result};

/// Extracts the raw format field.
pub const fn format_bits(flags: u32) -> u32 {
    flags & SPARK_FMT_MASK
}

/// Extracts the raw layout field.
pub const fn layout_bits(flags: u32) -> u32 {
    flags & SPARK_LAYOUT_MASK
}

/// Extracts the raw block-type field.
pub const fn block_type_bits(flags: u32) -> u32 {
    flags & SPARK_BLOCK_TYPE_MASK
}

/// Byte width of one sample for the format in `flags`, or 0 if the format is invalid.
pub const fn bytes_per_sample(flags: u32) -> usize {
    match SampleFormat::from_flags(flags) {
        Some(format) => format.bytes_per_sample(),
        None => 0,
    }
}

/// Sample encoding of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    I16,
    I32,
    F32,
    F64,
}

impl SampleFormat {
    /// Decodes the format field of `flags`; `None` for invalid or undefined values.
    pub const fn from_flags(flags: u32) -> Option<Self> {
        match format_bits(flags) {
            SPARK_FMT_I16 => Some(SampleFormat::I16),
            SPARK_FMT_I32 => Some(SampleFormat::I32),
            SPARK_FMT_F32 => Some(SampleFormat::F32),
            SPARK_FMT_F64 => Some(SampleFormat::F64),
            _ => None,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            SampleFormat::I16 => SPARK_FMT_I16,
            SampleFormat::I32 => SPARK_FMT_I32,
            SampleFormat::F32 => SPARK_FMT_F32,
            SampleFormat::F64 => SPARK_FMT_F64,
        }
    }

    pub const fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::I16 => 2,
            SampleFormat::I32 | SampleFormat::F32 => 4,
            SampleFormat::F64 => 8,
        }
    }
}

/// Memory ordering of a buffer's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Frame-major: `[c0, c1, ..., c0, c1, ...]`.
    Interleaved,
    /// Channel-major contiguous planes: plane `k` starts at `k * frames`.
    Planar,
}

impl Layout {
    /// Decodes the layout field of `flags`; `None` for invalid or undefined values.
    pub const fn from_flags(flags: u32) -> Option<Self> {
        match layout_bits(flags) {
            SPARK_LAYOUT_INTERLEAVED => Some(Layout::Interleaved),
            SPARK_LAYOUT_PLANAR => Some(Layout::Planar),
            _ => None,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            Layout::Interleaved => SPARK_LAYOUT_INTERLEAVED,
            Layout::Planar => SPARK_LAYOUT_PLANAR,
        }
    }
}

/// I/O shape contract of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Input and output similar; both required.
    Process,
    /// Input required with the declared type; output required, type free.
    Convert,
    /// Output only.
    Source,
    /// Input only.
    Sink,
}

impl BlockType {
    /// Decodes the block-type field of `flags`.
    ///
    /// Returns `None` both for the invalid value 0 and for the undefined
    /// values 5..=7; use [`block_type_bits`] to tell them apart.
    pub const fn from_flags(flags: u32) -> Option<Self> {
        match block_type_bits(flags) {
            SPARK_BLOCK_PROCESS => Some(BlockType::Process),
            SPARK_BLOCK_CONVERT => Some(BlockType::Convert),
            SPARK_BLOCK_SOURCE => Some(BlockType::Source),
            SPARK_BLOCK_SINK => Some(BlockType::Sink),
            _ => None,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            BlockType::Process => SPARK_BLOCK_PROCESS,
            BlockType::Convert => SPARK_BLOCK_CONVERT,
            BlockType::Source => SPARK_BLOCK_SOURCE,
            BlockType::Sink => SPARK_BLOCK_SINK,
        }
    }
}

/// The decoded `(format, layout, block type)` triple an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequiredFlags {
    pub format: SampleFormat,
    pub layout: Layout,
    pub block_type: BlockType,
}

impl RequiredFlags {
    pub const fn new(format: SampleFormat, layout: Layout, block_type: BlockType) -> Self {
        Self {
            format,
            layout,
            block_type,
        }
    }

    /// Decodes a required-flags word.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParam`] if the format or layout is invalid, or the
    ///   block type field is zero
    /// - [`Error::InvalidBlock`] if the block type field holds an undefined value
    pub fn decode(flags: u32) -> Result<Self> {
        let format = SampleFormat::from_flags(flags);
        let layout = Layout::from_flags(flags);
        let (Some(format), Some(layout)) = (format, layout) else {
            return Err(Error::InvalidParam);
        };
        if block_type_bits(flags) == SPARK_BLOCK_INVALID {
            return Err(Error::InvalidParam);
        }
        let block_type = BlockType::from_flags(flags).ok_or(Error::InvalidBlock)?;
        Ok(Self::new(format, layout, block_type))
    }

    /// Re-encodes the triple as a flags word.
    pub const fn bits(self) -> u32 {
        self.format.bits() | self.layout.bits() | self.block_type.bits()
    }
}
