// SPDX-FileCopyrightText: 2025 Contributors to the libspark project.
// SPDX-License-Identifier: MIT

//! Runs a biquad cascade over a generated signal through the C entry point.
//!
//! ```text
//! cargo run -p spark --example sosfilt -- --sections lowpass.json --chunk 32
//! ```
//!
//! The sections file holds `[[b0, b1, b2, a0, a1, a2], ...]` rows. Without
//! one, a single one-pole smoother is used.

mod common;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use spark::{
    Error, SosfiltF32,
    buffer::{new_block, planar_f32},
    sosfilt::{CoefficientMode, Section, required_state},
    spark_sosfilt_f32_checked,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Signal {
    /// A unit impulse at frame 0 on every channel
    Impulse,
    /// A sine at a fraction of the sample rate, phase-shifted per channel
    Tone,
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with `[[b0, b1, b2, a0, a1, a2], ...]` section rows
    #[arg(long, value_name = "PATH")]
    sections: Option<PathBuf>,

    /// Number of channels
    #[arg(long, default_value_t = 2)]
    channels: u32,

    /// Total number of frames to process
    #[arg(long, default_value_t = 480)]
    frames: u32,

    /// Frames per call into the kernel
    #[arg(long, default_value_t = 64)]
    chunk: u32,

    /// Test signal to filter
    #[arg(long, value_enum, default_value_t = Signal::Impulse)]
    signal: Signal,

    /// Tone frequency as a fraction of the sample rate
    #[arg(long, default_value_t = 0.01)]
    frequency: f32,

    /// Share one coefficient set across all channels
    #[arg(long)]
    share: bool,
}

fn load_sections(path: Option<&PathBuf>) -> Result<Vec<Section>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(vec![Section::from_sos([0.1, 0.0, 0.0, 1.0, -0.9, 0.0])?]);
    };
    let rows: Vec<[f32; 6]> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    if rows.is_empty() {
        return Err(format!("no sections in \"{}\"", path.display()).into());
    }
    let sections = rows.into_iter().map(Section::from_sos);
    Ok(sections.collect::<Result<_, _>>()?)
}

fn generate(signal: Signal, frequency: f32, channels: usize, frames: usize) -> Vec<f32> {
    let mut planes = vec![0.0f32; channels * frames];
    for (channel, plane) in planes.chunks_exact_mut(frames).enumerate() {
        match signal {
            Signal::Impulse => plane[0] = 1.0,
            Signal::Tone => {
                let phase = channel as f32 * std::f32::consts::FRAC_PI_4;
                for (n, sample) in plane.iter_mut().enumerate() {
                    *sample = (std::f32::consts::TAU * frequency * n as f32 + phase).sin();
                }
            }
        }
    }
    planes
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::setup_logging();
    let args = Args::parse();
    if args.channels == 0 || args.frames == 0 || args.chunk == 0 {
        return Err("channels, frames and chunk must be non-zero".into());
    }

    let sections = load_sections(args.sections.as_ref())?;
    let stages = sections.len();
    let channels = args.channels as usize;
    let frames = args.frames as usize;
    let mode = if args.share {
        CoefficientMode::Shared
    } else {
        CoefficientMode::Independent
    };

    let copies = match mode {
        CoefficientMode::Shared => 1,
        CoefficientMode::Independent => channels,
    };
    let coefficients: Vec<f32> = std::iter::repeat_n(&sections, copies)
        .flatten()
        .flat_map(|section| section.to_packed())
        .collect();
    let state_len = required_state(stages, channels).ok_or(Error::InvalidParam)?;
    let mut states = vec![0.0f32; state_len];

    let (major, minor, patch) = spark::config::version_triple();
    info!(
        major,
        minor,
        patch,
        profile = spark::config::build_profile(),
        stages,
        channels,
        ?mode,
        "filtering {frames} frames in chunks of {}",
        args.chunk
    );

    let input = generate(args.signal, args.frequency, channels, frames);
    let mut output = vec![0.0f32; input.len()];
    let mut start = 0;
    while start < frames {
        let len = (args.chunk as usize).min(frames - start);

        // gather one planar chunk, filter it in place, scatter it back
        let mut chunk = Vec::with_capacity(len * channels);
        for plane in input.chunks_exact(frames) {
            chunk.extend_from_slice(&plane[start..start + len]);
        }
        let buf = planar_f32(&mut chunk, args.channels);
        let mut instance = SosfiltF32 {
            header: new_block(buf, buf),
            coefficients: coefficients.as_ptr(),
            states: states.as_mut_ptr(),
            n_stages: u32::try_from(stages)?,
            flags: mode.bits(),
        };
        Error::from_status(spark_sosfilt_f32_checked(&mut instance))?;
        for (plane, filtered) in output.chunks_exact_mut(frames).zip(chunk.chunks_exact(len)) {
            plane[start..start + len].copy_from_slice(filtered);
        }

        debug!(start, len, "chunk done");
        start += len;
    }

    for (channel, plane) in output.chunks_exact(frames).enumerate() {
        let peak = plane.iter().copied().map(f32::abs).fold(0.0, f32::max);
        let energy: f32 = plane.iter().map(|sample| sample * sample).sum();
        let first = &plane[..plane.len().min(4)];
        info!(channel, peak, energy, ?first, "channel filtered");
    }
    Ok(())
}
