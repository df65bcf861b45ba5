// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Keeps panics from unwinding into C callers.

/// Runs an FFI body, returning `$fallback` if it panics.
///
/// ```ignore
/// pub extern "C" fn spark_thing(block: *const c_void) -> c_int {
///     ffi_guard!(SPARK_ERR_INVALID_PARAM; {
///         // ... body ...
///         SPARK_NOERROR
///     })
/// }
/// ```
macro_rules! ffi_guard {
    ($fallback:expr; $($body:tt)*) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(move || { $($body)* })) {
            Ok(result) => result,
            Err(_) => {
                ::tracing::error!("panic caught at the C boundary");
                $fallback
            }
        }
    }};
}

pub(crate) use ffi_guard;
