// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Common utilities shared across examples.

/// Installs a stdout tracing subscriber.
///
/// Defaults to INFO; `RUST_LOG` overrides it (e.g. `RUST_LOG=spark=trace`
/// shows filter setup and validation rejections).
pub fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}
