//! WAV file reader: header validation on open, typed deinterleaved
//! sample reads on demand.

use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use crate::{
    config::WavSpec,
    convert::{unpack_i24_le, Sample, SampleKind},
    error::{WavError, WavResult},
    header::{self, ParsedHeader},
};

/// A WAV file reader over any `Read + Seek` source.
///
/// Construction parses and validates the RIFF/WAVE header; a reader
/// that exists always holds a valid spec. `read` returns planar
/// (channel-major) buffers in any supported in-memory type, converting
/// from the file's native representation on the fly.
///
/// The handle is exclusively owned: it moves with the reader and is
/// never shared or duplicated.
///
/// # Example
///
/// ```no_run
/// use wavio::WavReader;
///
/// let mut reader = WavReader::open("input.wav")?;
/// let channels: Vec<Vec<f32>> = reader.read(1024)?;
/// # Ok::<(), wavio::WavError>(())
/// ```
#[derive(Debug)]
pub struct WavReader<R: Read + Seek> {
    /// `None` once closed
    reader: Option<R>,
    spec: WavSpec,
    /// Absolute offset of the first payload byte
    data_offset: u64,
    /// Current frame position (0-indexed)
    current_frame: u32,
    /// Reusable byte buffer for raw frame reads
    byte_buffer: Vec<u8>,
}

impl WavReader<BufReader<File>> {
    /// Open a WAV file and parse its header.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, the header is malformed, or
    /// any fmt field is outside the supported set.
    pub fn open<P: AsRef<Path>>(path: P) -> WavResult<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Wrap an existing source and parse its header.
    pub fn new(mut reader: R) -> WavResult<Self> {
        let ParsedHeader { spec, data_offset } = header::read_header(&mut reader)?;
        Ok(WavReader {
            reader: Some(reader),
            spec,
            data_offset,
            current_frame: 0,
            byte_buffer: Vec::new(),
        })
    }

    /// The spec parsed from the header, with `block_align` and
    /// `data_chunk_size` filled in.
    pub const fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Total number of complete frames in the data chunk.
    pub const fn num_frames(&self) -> u32 {
        self.spec.num_frames()
    }

    /// Current frame position (0-indexed).
    pub const fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Frames remaining from the current position.
    pub const fn remaining_frames(&self) -> u32 {
        self.num_frames().saturating_sub(self.current_frame)
    }

    /// Seek to an absolute frame position.
    ///
    /// # Errors
    ///
    /// Fails if `frame` is past the end of the data chunk, the seek
    /// faults, or the reader is closed.
    pub fn seek_to_frame(&mut self, frame: u32) -> WavResult<()> {
        if frame > self.num_frames() {
            return Err(WavError::SeekOutOfBounds {
                frame,
                num_frames: self.num_frames(),
            });
        }
        let frame_bytes = self.frame_bytes() as u64;
        let reader = self.reader.as_mut().ok_or(WavError::Closed)?;
        reader.seek(SeekFrom::Start(self.data_offset + u64::from(frame) * frame_bytes))?;
        self.current_frame = frame;
        Ok(())
    }

    /// Reset to the first frame.
    pub fn rewind(&mut self) -> WavResult<()> {
        self.seek_to_frame(0)
    }

    /// Read up to `max_frames` frames, deinterleaved into one `Vec<T>`
    /// per channel.
    ///
    /// Reads the file's native representation, splits it channel-major
    /// and converts every sample to `T` (identity when `T` already
    /// matches the on-disk kind). Fewer frames than requested is not an
    /// error: the frames actually available are returned, and a
    /// trailing partial frame is discarded.
    ///
    /// # Errors
    ///
    /// Returns `WavError::Closed` after `close()`, or an I/O error from
    /// the underlying source.
    pub fn read<T: Sample>(&mut self, max_frames: u32) -> WavResult<Vec<Vec<T>>> {
        let channels = self.spec.channels as usize;
        let kind = self.spec.sample_kind();
        let frames_to_read = max_frames.min(self.remaining_frames()) as usize;
        let frame_bytes = self.frame_bytes();

        let reader = self.reader.as_mut().ok_or(WavError::Closed)?;

        let bytes_wanted = frames_to_read * frame_bytes;
        if self.byte_buffer.len() < bytes_wanted {
            self.byte_buffer.resize(bytes_wanted, 0);
        }
        let bytes_read = read_fully(reader, &mut self.byte_buffer[..bytes_wanted])?;
        let frames_read = bytes_read / frame_bytes;
        let raw = &self.byte_buffer[..frames_read * frame_bytes];

        let mut planar: Vec<Vec<T>> = (0..channels)
            .map(|_| Vec::with_capacity(frames_read))
            .collect();

        match kind {
            SampleKind::U8 => {
                for (i, &byte) in raw.iter().enumerate() {
                    planar[i % channels].push(T::from_u8(byte));
                }
            }
            SampleKind::I16 => {
                for (i, chunk) in raw.chunks_exact(2).enumerate() {
                    let v = i16::from_le_bytes([chunk[0], chunk[1]]);
                    planar[i % channels].push(T::from_i16(v));
                }
            }
            SampleKind::I24 => {
                for (i, chunk) in raw.chunks_exact(3).enumerate() {
                    let v = unpack_i24_le([chunk[0], chunk[1], chunk[2]]);
                    planar[i % channels].push(T::from_i24(v));
                }
            }
            SampleKind::I32 => {
                for (i, chunk) in raw.chunks_exact(4).enumerate() {
                    let v = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    planar[i % channels].push(T::from_i32(v));
                }
            }
            SampleKind::F32 => {
                for (i, chunk) in raw.chunks_exact(4).enumerate() {
                    let v = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    planar[i % channels].push(T::from_f32(v));
                }
            }
        }

        self.current_frame += frames_read as u32;
        Ok(planar)
    }

    /// Release the file handle. Idempotent; no write-back occurs.
    pub fn close(&mut self) {
        self.reader = None;
    }

    /// Bytes per frame implied by the on-disk kind (the declared
    /// `block_align` is not trusted for framing).
    fn frame_bytes(&self) -> usize {
        self.spec.sample_kind().bytes_per_sample() * self.spec.channels as usize
    }
}

/// Read until the buffer is full or the stream ends, returning the
/// byte count. A short count is a truncated read, not an error.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> WavResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
