// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Block validation engine.
//!
//! Checks a [`Block`] against the `(format, layout, block type)` an operation
//! requires. Gates run in a fixed order and the first failure wins, so the
//! same block and flags always yield the same result. Nothing is mutated and
//! no sample memory is read.

use tracing::trace;

use crate::{
    Block, Buffer, Error, Result, buffer,
    flags::{BlockType, RequiredFlags},
};

/// Checks `struct_size`, then `abi_version`.
pub(crate) fn check_header(block: &Block) -> Result<()> {
    check_header_fields(block.struct_size, block.abi_version)
}

fn check_header_fields(struct_size: u32, abi_version: u32) -> Result<()> {
    if (struct_size as usize) < size_of::<Block>() {
        return Err(Error::InvalidSize);
    }
    if abi_version != spark_sys::SPARK_ABI_VERSION {
        return Err(Error::InvalidAbi);
    }
    Ok(())
}

/// Validates `block` against a raw required-flags word.
///
/// # Errors
///
/// In order of precedence:
/// - [`Error::InvalidSize`] if `struct_size` is smaller than [`Block`]
/// - [`Error::InvalidAbi`] on an ABI version mismatch
/// - [`Error::InvalidParam`] / [`Error::InvalidBlock`] if `required_flags`
///   does not decode (see [`RequiredFlags::decode`])
/// - any error from [`validate_typed`]
pub fn validate(block: &Block, required_flags: u32) -> Result<()> {
    let result = check_header(block)
        .and_then(|()| RequiredFlags::decode(required_flags))
        .and_then(|required| validate_typed(block, required));
    if let Err(err) = &result {
        trace!(%err, required_flags, "block rejected");
    }
    result
}

/// Checks the buffers of `block` against an already decoded triple.
///
/// The header is not inspected.
///
/// # Errors
///
/// - Process: [`Error::InvalidBlock`] if input and output are not similar,
///   then [`Error::InvalidInput`] / [`Error::InvalidOutput`] for an invalid
///   buffer, then for a format or layout mismatch
/// - Convert: invalid input, invalid output, then input type; the output type
///   and frame count are left to the converter
/// - Source: output only
/// - Sink: input only
pub fn validate_typed(block: &Block, required: RequiredFlags) -> Result<()> {
    let input = &block.input;
    let output = &block.output;

    match required.block_type {
        BlockType::Process => {
            if !buffer::is_similar(Some(input), Some(output)) {
                return Err(Error::InvalidBlock);
            }
            check_valid(input, Error::InvalidInput)?;
            check_valid(output, Error::InvalidOutput)?;
            check_typed(input, required, Error::InvalidInput)?;
            check_typed(output, required, Error::InvalidOutput)
        }
        BlockType::Convert => {
            check_valid(input, Error::InvalidInput)?;
            check_valid(output, Error::InvalidOutput)?;
            check_typed(input, required, Error::InvalidInput)
        }
        BlockType::Source => {
            check_valid(output, Error::InvalidOutput)?;
            check_typed(output, required, Error::InvalidOutput)
        }
        BlockType::Sink => {
            check_valid(input, Error::InvalidInput)?;
            check_typed(input, required, Error::InvalidInput)
        }
    }
}

fn check_valid(buf: &Buffer, err: Error) -> Result<()> {
    if buffer::is_valid(buf) {
        Ok(())
    } else {
        Err(err)
    }
}

fn check_typed(buf: &Buffer, required: RequiredFlags, err: Error) -> Result<()> {
    if buffer::check_type(buf, required.format, required.layout) {
        Ok(())
    } else {
        Err(err)
    }
}

/// Validates a block behind a raw pointer, as received over the C ABI.
///
/// Only the `abi_version`/`struct_size` header is read until `struct_size`
/// has been checked, so a caller passing a shorter struct is never over-read.
///
/// # Errors
///
/// [`Error::InvalidParam`] if `block` is null or not aligned for [`Block`],
/// otherwise as [`validate`].
///
/// # Safety
///
/// `block` must be null or point to at least 8 readable bytes, and to a full
/// readable [`Block`] whenever its `struct_size` says so.
pub unsafe fn validate_raw(block: *const Block, required_flags: u32) -> Result<()> {
    if block.is_null() {
        trace!("null block rejected");
        return Err(Error::InvalidParam);
    }
    if !block.is_aligned() {
        trace!(?block, "misaligned block rejected");
        return Err(Error::InvalidParam);
    }
    let (struct_size, abi_version) = unsafe {
        (
            (&raw const (*block).struct_size).read(),
            (&raw const (*block).abi_version).read(),
        )
    };
    if let Err(err) = check_header_fields(struct_size, abi_version) {
        trace!(%err, struct_size, abi_version, "block header rejected");
        return Err(err);
    }
    validate(unsafe { &*block }, required_flags)
}

#[cfg(test)]
mod tests {
    use spark_sys::{
        SPARK_BLOCK_CONVERT, SPARK_BLOCK_PROCESS, SPARK_BLOCK_SINK, SPARK_BLOCK_SOURCE,
        SPARK_FMT_F32, SPARK_FMT_I16, SPARK_LAYOUT_INTERLEAVED, SPARK_LAYOUT_PLANAR,
    };

    use super::*;
    use crate::buffer::{describe, new_block, planar_f32};
    use crate::flags::Layout;

    const F32_PLANAR: u32 = SPARK_FMT_F32 | SPARK_LAYOUT_PLANAR;

    #[test]
    fn header_gates_come_first() {
        let mut a = [0.0f32; 4];
        let mut b = [0.0f32; 4];
        let block = new_block(planar_f32(&mut a, 2), planar_f32(&mut b, 2));
        assert_eq!(validate(&block, F32_PLANAR | SPARK_BLOCK_PROCESS), Ok(()));

        let short = Block {
            struct_size: 8,
            abi_version: 99,
            ..block
        };
        assert_eq!(validate(&short, 0), Err(Error::InvalidSize));
        let wrong_abi = Block {
            abi_version: 99,
            ..block
        };
        assert_eq!(validate(&wrong_abi, 0), Err(Error::InvalidAbi));
        let no_format = SPARK_LAYOUT_PLANAR | SPARK_BLOCK_PROCESS;
        assert_eq!(validate(&block, no_format), Err(Error::InvalidParam));
        let bad_type = F32_PLANAR | (0x5 << 8);
        assert_eq!(validate(&block, bad_type), Err(Error::InvalidBlock));
    }

    #[test]
    fn process_checks_similarity_before_validity() {
        let flags = F32_PLANAR | SPARK_BLOCK_PROCESS;
        let mut a = [0.0f32; 4];
        let block = new_block(planar_f32(&mut a, 2), Buffer::default());
        assert_eq!(validate(&block, flags), Err(Error::InvalidBlock));

        // similar but both null
        let null = Buffer {
            base: std::ptr::null_mut(),
            ..planar_f32(&mut a, 2)
        };
        let block = new_block(null, null);
        assert_eq!(validate(&block, flags), Err(Error::InvalidInput));
    }

    #[test]
    fn process_reports_type_mismatch_on_input_first() {
        let mut a = [0i16; 4];
        let mut b = [0i16; 4];
        let block = new_block(
            describe(&mut a, 2, Layout::Planar),
            describe(&mut b, 2, Layout::Planar),
        );
        let f32_flags = F32_PLANAR | SPARK_BLOCK_PROCESS;
        assert_eq!(validate(&block, f32_flags), Err(Error::InvalidInput));
        let i16_flags = SPARK_FMT_I16 | SPARK_LAYOUT_PLANAR | SPARK_BLOCK_PROCESS;
        assert_eq!(validate(&block, i16_flags), Ok(()));
    }

    #[test]
    fn convert_leaves_output_type_and_shape_alone() {
        let mut a = [0i16; 8];
        let mut b = [0.0f32; 3];
        let block = new_block(
            describe(&mut a, 2, Layout::Interleaved),
            planar_f32(&mut b, 1),
        );
        let flags = SPARK_FMT_I16 | SPARK_LAYOUT_INTERLEAVED | SPARK_BLOCK_CONVERT;
        assert_eq!(validate(&block, flags), Ok(()));
        assert_eq!(
            validate(&block, F32_PLANAR | SPARK_BLOCK_CONVERT),
            Err(Error::InvalidInput)
        );
        let no_output = Block {
            output: Buffer::default(),
            ..block
        };
        assert_eq!(validate(&no_output, flags), Err(Error::InvalidOutput));
    }

    #[test]
    fn source_and_sink_look_at_one_side() {
        let source_flags = F32_PLANAR | SPARK_BLOCK_SOURCE;
        let sink_flags = F32_PLANAR | SPARK_BLOCK_SINK;
        let mut a = [0.0f32; 4];
        let live = planar_f32(&mut a, 2);

        let source = new_block(Buffer::default(), live);
        assert_eq!(validate(&source, source_flags), Ok(()));
        assert_eq!(validate(&source, sink_flags), Err(Error::InvalidInput));

        let sink = new_block(live, Buffer::default());
        assert_eq!(validate(&sink, sink_flags), Ok(()));
        assert_eq!(validate(&sink, source_flags), Err(Error::InvalidOutput));
    }

    /// Just the leading `abi_version`/`struct_size` pair, aligned like a block.
    #[repr(C, align(8))]
    #[allow(dead_code)]
    struct Header {
        abi_version: u32,
        struct_size: u32,
    }

    #[test]
    fn raw_form_handles_null_and_short_headers() {
        let flags = F32_PLANAR | SPARK_BLOCK_PROCESS;
        assert_eq!(
            unsafe { validate_raw(std::ptr::null(), flags) },
            Err(Error::InvalidParam)
        );

        // only the 8-byte header exists
        let header = Header {
            abi_version: spark_sys::SPARK_ABI_VERSION,
            struct_size: 8,
        };
        let block = (&raw const header).cast::<Block>();
        assert_eq!(
            unsafe { validate_raw(block, flags) },
            Err(Error::InvalidSize)
        );
    }

    #[test]
    fn raw_form_rejects_misaligned_blocks() {
        #[repr(C, align(8))]
        struct Storage([u8; 2 * size_of::<Block>()]);

        let mut a = [0.0f32; 4];
        let mut b = [0.0f32; 4];
        let block = new_block(planar_f32(&mut a, 2), planar_f32(&mut b, 2));
        let mut storage = Storage([0; 2 * size_of::<Block>()]);
        let bytes = (&raw mut storage).cast::<u8>();
        let shifted = unsafe { bytes.add(1) }.cast::<Block>();
        unsafe { shifted.write_unaligned(block) };

        let flags = F32_PLANAR | SPARK_BLOCK_PROCESS;
        assert_eq!(
            unsafe { validate_raw(shifted, flags) },
            Err(Error::InvalidParam)
        );
        assert_eq!(unsafe { validate_raw(&raw const block, flags) }, Ok(()));
    }
}
