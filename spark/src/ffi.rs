// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Exported C entry points, declared in `spark-sys/include/spark.h`.
//!
//! All symbols use the `spark_` prefix. No entry point unwinds into the
//! caller; a panic is logged and turned into a fallback value.

use std::ffi::{c_char, c_int, c_void};

use spark_sys::{SPARK_ERR_INVALID_PARAM, SosfiltF32};
use tracing::{debug, error};

use crate::{Block, error::to_status, sosfilt, validate};

mod panic_guard;

use panic_guard::ffi_guard;

/// Validates a block descriptor against `required_flags`.
///
/// Returns `SPARK_NOERROR` or the status code of the first failed check.
#[unsafe(no_mangle)]
pub extern "C" fn spark_block_validate(block: *const c_void, required_flags: u32) -> c_int {
    ffi_guard!(SPARK_ERR_INVALID_PARAM; {
        let block = block.cast::<Block>();
        let status = to_status(unsafe { validate::validate_raw(block, required_flags) });
        if status != spark_sys::SPARK_NOERROR {
            debug!(status, required_flags, "spark_block_validate failed");
        }
        status
    })
}

/// Returns a static, nul-terminated phrase for a status code.
#[unsafe(no_mangle)]
pub extern "C" fn spark_strerror(status: c_int) -> *const c_char {
    crate::error::strerror_cstr(status).as_ptr()
}

/// Runs the biquad cascade described by `instance`.
///
/// When a precondition fails no buffer or state is touched. The failure is
/// logged, and debug or `strict-checks` builds then abort the process.
#[unsafe(no_mangle)]
pub extern "C" fn spark_sosfilt_f32(instance: *mut SosfiltF32) {
    ffi_guard!((); {
        if let Err(err) = unsafe { sosfilt::process_instance(instance) } {
            error!(%err, status = err.status(), "spark_sosfilt_f32 refused to run");
            if crate::config::aborts_on_kernel_misuse() {
                std::process::abort();
            }
        }
    })
}

/// Runs the biquad cascade described by `instance` and reports the outcome.
///
/// Returns `SPARK_NOERROR` on success. Kernel preconditions with no status
/// code of their own are reported as `SPARK_ERR_INVALID_PARAM` or, for
/// shape and aliasing problems, `SPARK_ERR_INVALID_BLOCK`.
#[unsafe(no_mangle)]
pub extern "C" fn spark_sosfilt_f32_checked(instance: *mut SosfiltF32) -> c_int {
    ffi_guard!(SPARK_ERR_INVALID_PARAM; {
        to_status(unsafe { sosfilt::process_instance(instance) })
    })
}

/// Returns the library version as a static, nul-terminated string.
#[unsafe(no_mangle)]
pub extern "C" fn spark_version() -> *const c_char {
    crate::config::version_cstr().as_ptr()
}

/// Returns the block ABI version this build accepts.
#[unsafe(no_mangle)]
pub extern "C" fn spark_abi_version() -> u32 {
    crate::config::abi_version()
}
