// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms
#![allow(clippy::result_large_err)] // Allow large error types for comprehensive error handling
#![allow(clippy::missing_const_for_fn)] // Functions may need mutations in the future
#![allow(clippy::missing_panics_doc)] // Panics are converted to proper errors where needed
#![allow(clippy::needless_borrows_for_generic_args)] // Sometimes clearer with explicit borrows
#![allow(clippy::unnecessary_cast)] // Explicit casts for clarity
#![allow(clippy::identity_op)] // Explicit operations for clarity
//
// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains
//
// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`
//
// Maintainability
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions

//! Reader and writer for RIFF/WAVE audio files.
//!
//! Supports the canonical 44-byte WAV layout with 8/16/24/32-bit PCM
//! and 32-bit IEEE float payloads. Samples are exposed to callers as
//! planar (channel-major) buffers in any of the in-memory types `u8`,
//! `i16`, `i32` (also the 24-bit carrier), and `f32`; conversion
//! between the on-disk representation and the requested type happens
//! during read and write.
//!
//! # Example
//!
//! ```no_run
//! use wavio::{BitDepth, FormatTag, SampleRate, WavReader, WavSpec, WavWriter};
//!
//! let spec = WavSpec::new(SampleRate::Hz44100, 1, BitDepth::Bits16, FormatTag::Pcm)?;
//! let mut writer = WavWriter::create("tone.wav", spec)?;
//! let samples: Vec<f32> = (0..44100)
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//! writer.write(&[&samples[..]])?;
//! writer.finalize()?;
//!
//! let mut reader = WavReader::open("tone.wav")?;
//! let channels: Vec<Vec<f32>> = reader.read(reader.num_frames())?;
//! # Ok::<(), wavio::WavError>(())
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod header;
pub mod reader;
pub mod writer;

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

pub use crate::{
    config::{BitDepth, FormatTag, SampleRate, WavSpec},
    convert::{Sample, SampleKind},
    error::{WavError, WavResult},
    reader::WavReader,
    writer::WavWriter,
};

// Public API

/// Parse a WAV file's header without reading any samples.
///
/// Returns the validated spec, including the payload size recorded in
/// the header.
pub fn info<P: AsRef<Path>>(fp: P) -> WavResult<WavSpec> {
    let reader = WavReader::open(fp)?;
    Ok(*reader.spec())
}

/// Open a WAV file for streaming reads.
///
/// Parses and validates the header; samples are read incrementally via
/// [`WavReader::read`].
pub fn open<P: AsRef<Path>>(fp: P) -> WavResult<WavReader<BufReader<File>>> {
    WavReader::open(fp)
}

/// Create a WAV file for streaming writes.
///
/// The header is written immediately with placeholder sizes; call
/// [`WavWriter::finalize`] (or let the writer drop) to patch them.
pub fn create<P: AsRef<Path>>(fp: P, spec: WavSpec) -> WavResult<WavWriter<BufWriter<File>>> {
    WavWriter::create(fp, spec)
}
