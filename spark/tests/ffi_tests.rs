// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Integration tests for the exported C entry points.
//!
//! These drive the library exactly as a C caller would: raw descriptors,
//! status codes and static strings.

use std::ffi::{CStr, c_void};

use spark::{
    Block, Error, SosfiltF32,
    buffer::{new_block, planar_f32},
    sosfilt::{CoefficientMode, Section},
    spark_abi_version, spark_block_validate, spark_sosfilt_f32, spark_sosfilt_f32_checked,
    spark_strerror, spark_version,
};
use spark_sys::{
    SPARK_BLOCK_PROCESS, SPARK_ERR_INVALID_ABI, SPARK_ERR_INVALID_BLOCK, SPARK_ERR_INVALID_INPUT,
    SPARK_ERR_INVALID_PARAM, SPARK_FMT_F32, SPARK_LAYOUT_INTERLEAVED, SPARK_LAYOUT_PLANAR,
    SPARK_NOERROR,
};

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

fn setup_logging() {
    LOG_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .init();
    });
}

const F32_PLANAR_PROCESS: u32 = SPARK_FMT_F32 | SPARK_LAYOUT_PLANAR | SPARK_BLOCK_PROCESS;
const F32_INTERLEAVED_PROCESS: u32 = SPARK_FMT_F32 | SPARK_LAYOUT_INTERLEAVED | SPARK_BLOCK_PROCESS;

fn validate_status(block: &Block, flags: u32) -> i32 {
    spark_block_validate((block as *const Block).cast::<c_void>(), flags)
}

#[test]
fn validate_reports_status_codes() {
    setup_logging();
    let mut a = [0.0f32; 8];
    let mut b = [0.0f32; 8];
    let block = new_block(planar_f32(&mut a, 2), planar_f32(&mut b, 2));

    assert_eq!(validate_status(&block, F32_PLANAR_PROCESS), SPARK_NOERROR);
    assert_eq!(
        spark_block_validate(std::ptr::null(), F32_PLANAR_PROCESS),
        SPARK_ERR_INVALID_PARAM
    );
    let unversioned = Block {
        abi_version: 0,
        ..block
    };
    assert_eq!(
        validate_status(&unversioned, F32_PLANAR_PROCESS),
        SPARK_ERR_INVALID_ABI
    );
    assert_eq!(
        validate_status(&block, F32_INTERLEAVED_PROCESS),
        SPARK_ERR_INVALID_INPUT
    );

    // status codes convert back to the same errors
    assert_eq!(
        Error::from_status(validate_status(&block, F32_INTERLEAVED_PROCESS)),
        Err(Error::InvalidInput)
    );
}

#[test]
fn strerror_covers_every_code() {
    setup_logging();
    let expected = [
        "no error",
        "invalid parameter",
        "invalid size",
        "invalid ABI version",
        "invalid input buffer",
        "invalid output buffer",
        "invalid block constraints",
    ];
    for (status, phrase) in expected.iter().enumerate() {
        let got = unsafe { CStr::from_ptr(spark_strerror(status as i32)) };
        assert_eq!(got.to_str().unwrap(), *phrase);
    }
    let got = unsafe { CStr::from_ptr(spark_strerror(7)) };
    assert_eq!(got.to_str().unwrap(), "unknown error");
}

#[test]
fn version_symbols() {
    setup_logging();
    let version = unsafe { CStr::from_ptr(spark_version()) };
    assert_eq!(version.to_str().unwrap(), spark::config::version());
    assert_eq!(spark_abi_version(), 1);
}

#[test]
fn sosfilt_instance_filters_in_chunks() {
    setup_logging();
    // y[n] = x[n] + 0.5 * y[n - 1] on both channels, independent coefficients
    let section = Section::from_sos([1.0, 0.0, 0.0, 1.0, -0.5, 0.0]).unwrap();
    let mut coefficients = section.to_packed().to_vec();
    coefficients.extend(section.to_packed());
    let mut states = [0.0f32; 4];

    let mut outputs = Vec::new();
    for chunk in [[1.0f32, 0.0, 2.0, 0.0], [0.0f32; 4]] {
        let mut io = chunk;
        let buf = planar_f32(&mut io, 2);
        let mut instance = SosfiltF32 {
            header: new_block(buf, buf),
            coefficients: coefficients.as_ptr(),
            states: states.as_mut_ptr(),
            n_stages: 1,
            flags: CoefficientMode::Independent.bits(),
        };
        spark_sosfilt_f32(&mut instance);
        outputs.extend(io);
    }
    // planar chunks: [ch0 f0, ch0 f1, ch1 f0, ch1 f1]
    assert_eq!(outputs, [1.0, 0.5, 2.0, 1.0, 0.25, 0.125, 0.5, 0.25]);
}

#[test]
fn checked_entry_point_maps_kernel_errors() {
    setup_logging();
    let coefficients = Section::IDENTITY.to_packed();
    let mut states = [0.0f32; 2];
    let mut a = [0.0f32; 8];
    let mut b = [0.0f32; 8];

    let mut instance = SosfiltF32 {
        header: new_block(planar_f32(&mut a, 1), planar_f32(&mut b, 1)),
        coefficients: std::ptr::null(),
        states: states.as_mut_ptr(),
        n_stages: 1,
        flags: CoefficientMode::Shared.bits(),
    };
    assert_eq!(
        spark_sosfilt_f32_checked(&mut instance),
        SPARK_ERR_INVALID_PARAM
    );

    // input and output overlap without sharing a base
    instance.coefficients = coefficients.as_ptr();
    instance.header = new_block(planar_f32(&mut a[..6], 1), planar_f32(&mut a[2..], 1));
    assert_eq!(
        spark_sosfilt_f32_checked(&mut instance),
        SPARK_ERR_INVALID_BLOCK
    );

    instance.header = new_block(planar_f32(&mut a, 1), planar_f32(&mut b, 1));
    assert_eq!(spark_sosfilt_f32_checked(&mut instance), SPARK_NOERROR);
}
