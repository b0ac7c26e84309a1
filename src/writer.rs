//! WAV file writer with deferred header finalization.
//!
//! `WavWriter` emits a provisional header on construction, converts and
//! interleaves caller-supplied planar sample buffers on every write, and
//! patches the two header size fields when finalized. Dropping a writer
//! that was never finalized performs the same finalize-then-close
//! sequence, so no data is lost on scope exit.

use std::{
    fs::File,
    io::{BufWriter, Seek, SeekFrom, Write},
    path::Path,
};

use crate::{
    config::WavSpec,
    convert::{pack_i24_le, Sample, SampleKind},
    error::{WavError, WavResult},
    header::{self, DATA_SIZE_OFFSET, RIFF_SIZE_OFFSET},
};

/// A WAV file writer over any `Write + Seek` destination.
///
/// Samples are supplied planar (one slice per channel) in any supported
/// in-memory type and are converted to the on-disk representation the
/// spec configures, interleaved frame-major.
///
/// # Example
///
/// ```no_run
/// use wavio::{BitDepth, FormatTag, SampleRate, WavSpec, WavWriter};
///
/// let spec = WavSpec::new(SampleRate::Hz44100, 2, BitDepth::Bits16, FormatTag::Pcm)?;
/// let mut writer = WavWriter::create("output.wav", spec)?;
/// let left = vec![0.0f32; 1024];
/// let right = vec![0.0f32; 1024];
/// writer.write(&[&left[..], &right[..]])?;
/// writer.close()?;
/// # Ok::<(), wavio::WavError>(())
/// ```
#[derive(Debug)]
pub struct WavWriter<W: Write + Seek> {
    /// `None` once closed
    writer: Option<W>,
    spec: WavSpec,
    /// Bytes of sample payload written so far (3 per sample for PCM24)
    data_bytes: u32,
    finalized: bool,
    /// Reusable interleave buffer
    byte_buffer: Vec<u8>,
}

impl WavWriter<BufWriter<File>> {
    /// Create the target file and emit the provisional header.
    ///
    /// # Errors
    ///
    /// Fails if the path cannot be created or the header write faults.
    pub fn create<P: AsRef<Path>>(path: P, spec: WavSpec) -> WavResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), spec)
    }
}

impl<W: Write + Seek> WavWriter<W> {
    /// Wrap an existing destination and emit the provisional header.
    pub fn new(mut writer: W, spec: WavSpec) -> WavResult<Self> {
        header::write_header(&mut writer, &spec)?;
        Ok(WavWriter {
            writer: Some(writer),
            spec,
            data_bytes: 0,
            finalized: false,
            byte_buffer: Vec::new(),
        })
    }

    /// The spec this writer was configured with, including the running
    /// data chunk size.
    pub const fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Frames written so far.
    pub const fn frames_written(&self) -> u32 {
        self.spec.num_frames()
    }

    /// Convert, interleave and append `channels` to the file.
    ///
    /// `channels` holds one slice per channel, all of equal length (the
    /// frame count). Samples are converted to the configured on-disk
    /// representation and interleaved frame-major.
    ///
    /// # Panics
    ///
    /// Panics if the slice count does not match the configured channel
    /// count, or the channel slices have unequal lengths. Both are
    /// caller contract violations, not runtime conditions.
    ///
    /// # Errors
    ///
    /// Returns `WavError::Closed` after `close()`, or an I/O error from
    /// the underlying destination.
    pub fn write<T: Sample>(&mut self, channels: &[&[T]]) -> WavResult<()> {
        assert_eq!(
            channels.len(),
            self.spec.channels as usize,
            "writer configured for {} channels, got {} channel buffers",
            self.spec.channels,
            channels.len()
        );
        let frames = channels[0].len();
        for (ch, buf) in channels.iter().enumerate() {
            assert_eq!(
                buf.len(),
                frames,
                "channel {} has {} samples, channel 0 has {}",
                ch,
                buf.len(),
                frames
            );
        }

        let writer = self.writer.as_mut().ok_or(WavError::Closed)?;
        if frames == 0 {
            return Ok(());
        }

        let kind = self.spec.sample_kind();
        let buf = &mut self.byte_buffer;
        buf.clear();
        buf.reserve(frames * channels.len() * kind.bytes_per_sample());

        for frame in 0..frames {
            for channel in channels {
                let sample = channel[frame];
                match kind {
                    SampleKind::U8 => buf.push(sample.to_u8()),
                    SampleKind::I16 => buf.extend_from_slice(&sample.to_i16().to_le_bytes()),
                    SampleKind::I24 => buf.extend_from_slice(&pack_i24_le(sample.to_i24())),
                    SampleKind::I32 => buf.extend_from_slice(&sample.to_i32().to_le_bytes()),
                    SampleKind::F32 => buf.extend_from_slice(&sample.to_f32().to_le_bytes()),
                }
            }
        }

        writer.write_all(buf)?;
        self.data_bytes += buf.len() as u32;
        self.spec.data_chunk_size = self.data_bytes;
        Ok(())
    }

    /// Patch the header size fields. Idempotent.
    ///
    /// Seeks to offset 4 and writes `36 + data_bytes` as the RIFF chunk
    /// size, then to offset 40 and writes `data_bytes` as the data
    /// chunk size, then flushes. Subsequent calls are no-ops.
    pub fn finalize(&mut self) -> WavResult<()> {
        if self.finalized {
            return Ok(());
        }
        let writer = self.writer.as_mut().ok_or(WavError::Closed)?;

        let riff_size = 36 + self.data_bytes;
        writer.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        writer.write_all(&riff_size.to_le_bytes())?;
        writer.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        writer.write_all(&self.data_bytes.to_le_bytes())?;
        writer.flush()?;

        self.finalized = true;
        Ok(())
    }

    /// Finalize the header and release the destination. Idempotent; a
    /// second call is a no-op.
    pub fn close(&mut self) -> WavResult<()> {
        if self.writer.is_none() {
            return Ok(());
        }
        self.finalize()?;
        self.writer = None;
        Ok(())
    }

    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// Scope exit finalizes the file so the header is never left with
/// placeholder sizes. Errors on this path cannot be reported and are
/// dropped.
impl<W: Write + Seek> Drop for WavWriter<W> {
    fn drop(&mut self) {
        if !self.finalized && self.writer.is_some() {
            let _ = self.close();
        }
    }
}
