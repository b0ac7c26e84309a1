use std::io;
use thiserror::Error;

/// Result type for wavio operations
pub type WavResult<T> = Result<T, WavError>;

/// Error type for WAV reading and writing
#[derive(Debug, Error)]
pub enum WavError {
    /// File I/O errors (file not found, permission denied, disk full, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The RIFF/WAVE structure is broken: missing magic markers, missing
    /// fmt or data chunk, or a read fault mid-scan.
    #[error("malformed header at byte offset {offset}: {reason}")]
    MalformedHeader { offset: u64, reason: String },

    /// The header parsed but declares a field value outside the supported
    /// set (format tag, channel count, sample rate, bit depth).
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A seek targeted a frame past the end of the data chunk.
    #[error("seek to frame {frame} is beyond end of data ({num_frames} frames)")]
    SeekOutOfBounds { frame: u32, num_frames: u32 },

    /// The reader or writer has already been closed.
    #[error("stream is closed")]
    Closed,
}

impl WavError {
    pub fn malformed_header(offset: u64, reason: impl Into<String>) -> Self {
        WavError::MalformedHeader {
            offset,
            reason: reason.into(),
        }
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        WavError::UnsupportedFormat(message.into())
    }
}
