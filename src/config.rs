use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    convert::SampleKind,
    error::{WavError, WavResult},
};

/// WAV format codes (wFormatTag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// PCM (uncompressed integer samples)
    Pcm,
    /// IEEE 32-bit float
    Float,
}

impl FormatTag {
    /// Canonical numeric WAV format tag
    pub const fn as_u16(self) -> u16 {
        match self {
            FormatTag::Pcm => 0x0001,
            FormatTag::Float => 0x0003,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FormatTag::Pcm => "PCM",
            FormatTag::Float => "IEEE_FLOAT",
        }
    }
}

impl TryFrom<u16> for FormatTag {
    type Error = WavError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0x0001 => Ok(FormatTag::Pcm),
            0x0003 => Ok(FormatTag::Float),
            other => Err(WavError::unsupported_format(format!(
                "audio format tag 0x{:04X} (only PCM and IEEE float are supported)",
                other
            ))),
        }
    }
}

impl Display for FormatTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Supported sample rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    Hz8000,
    Hz11025,
    Hz16000,
    Hz22050,
    Hz32000,
    Hz44100,
    Hz48000,
    Hz96000,
    Hz176400,
    Hz192000,
    Hz352800,
    Hz384000,
}

impl SampleRate {
    pub const fn as_u32(self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8_000,
            SampleRate::Hz11025 => 11_025,
            SampleRate::Hz16000 => 16_000,
            SampleRate::Hz22050 => 22_050,
            SampleRate::Hz32000 => 32_000,
            SampleRate::Hz44100 => 44_100,
            SampleRate::Hz48000 => 48_000,
            SampleRate::Hz96000 => 96_000,
            SampleRate::Hz176400 => 176_400,
            SampleRate::Hz192000 => 192_000,
            SampleRate::Hz352800 => 352_800,
            SampleRate::Hz384000 => 384_000,
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = WavError;

    fn try_from(rate: u32) -> Result<Self, Self::Error> {
        match rate {
            8_000 => Ok(SampleRate::Hz8000),
            11_025 => Ok(SampleRate::Hz11025),
            16_000 => Ok(SampleRate::Hz16000),
            22_050 => Ok(SampleRate::Hz22050),
            32_000 => Ok(SampleRate::Hz32000),
            44_100 => Ok(SampleRate::Hz44100),
            48_000 => Ok(SampleRate::Hz48000),
            96_000 => Ok(SampleRate::Hz96000),
            176_400 => Ok(SampleRate::Hz176400),
            192_000 => Ok(SampleRate::Hz192000),
            352_800 => Ok(SampleRate::Hz352800),
            384_000 => Ok(SampleRate::Hz384000),
            other => Err(WavError::unsupported_format(format!(
                "sample rate {} Hz is not in the supported set",
                other
            ))),
        }
    }
}

impl Display for SampleRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} Hz", self.as_u32())
    }
}

/// Supported bit depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Bits8,
    Bits16,
    Bits24,
    Bits32,
}

impl BitDepth {
    pub const fn as_u16(self) -> u16 {
        match self {
            BitDepth::Bits8 => 8,
            BitDepth::Bits16 => 16,
            BitDepth::Bits24 => 24,
            BitDepth::Bits32 => 32,
        }
    }

    pub const fn bytes_per_sample(self) -> u16 {
        self.as_u16() / 8
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = WavError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Bits8),
            16 => Ok(BitDepth::Bits16),
            24 => Ok(BitDepth::Bits24),
            32 => Ok(BitDepth::Bits32),
            other => Err(WavError::unsupported_format(format!(
                "bit depth {} (supported: 8, 16, 24, 32)",
                other
            ))),
        }
    }
}

impl Display for BitDepth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-bit", self.as_u16())
    }
}

/// Describes a WAV stream: the caller-chosen fields plus the derived
/// framing fields filled in while reading or writing.
///
/// `block_align` and `data_chunk_size` are derived: a writer computes
/// them from the other fields and the bytes written so far, a reader
/// takes them from the parsed header. They are never caller-settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub sample_rate: SampleRate,
    pub channels: u16,
    pub bit_depth: BitDepth,
    pub format: FormatTag,
    /// Bytes per frame (all channels)
    pub(crate) block_align: u16,
    /// Total bytes of sample payload
    pub(crate) data_chunk_size: u32,
}

impl WavSpec {
    /// Build and validate a spec for writing.
    ///
    /// # Errors
    ///
    /// Returns `WavError::UnsupportedFormat` if `channels == 0` or the
    /// float format is paired with a non-32-bit depth.
    pub fn new(
        sample_rate: SampleRate,
        channels: u16,
        bit_depth: BitDepth,
        format: FormatTag,
    ) -> WavResult<Self> {
        if channels == 0 {
            return Err(WavError::unsupported_format(
                "channel count must be at least 1",
            ));
        }
        if format == FormatTag::Float && bit_depth != BitDepth::Bits32 {
            return Err(WavError::unsupported_format(format!(
                "IEEE float requires 32-bit samples, got {}",
                bit_depth
            )));
        }
        // Both derived fields must fit the fixed-width header fields;
        // header-supplied channel counts reach this path, so overflow is
        // a rejection, not a panic.
        let block_align = u32::from(channels) * u32::from(bit_depth.bytes_per_sample());
        let block_align = u16::try_from(block_align).map_err(|_| {
            WavError::unsupported_format(format!(
                "{} channels at {} exceed the 16-bit block align field",
                channels, bit_depth
            ))
        })?;
        let byte_rate = u64::from(sample_rate.as_u32()) * u64::from(block_align);
        if byte_rate > u64::from(u32::MAX) {
            return Err(WavError::unsupported_format(format!(
                "{} channels at {} and {} exceed the 32-bit byte rate field",
                channels, bit_depth, sample_rate
            )));
        }
        Ok(WavSpec {
            sample_rate,
            channels,
            bit_depth,
            format,
            block_align,
            data_chunk_size: 0,
        })
    }

    /// On-disk sample representation implied by format and bit depth.
    pub const fn sample_kind(&self) -> SampleKind {
        match self.format {
            FormatTag::Float => SampleKind::F32,
            FormatTag::Pcm => match self.bit_depth {
                BitDepth::Bits8 => SampleKind::U8,
                BitDepth::Bits16 => SampleKind::I16,
                BitDepth::Bits24 => SampleKind::I24,
                BitDepth::Bits32 => SampleKind::I32,
            },
        }
    }

    /// Bytes per frame (all channels)
    pub const fn block_align(&self) -> u16 {
        self.block_align
    }

    /// Total bytes of sample payload
    pub const fn data_chunk_size(&self) -> u32 {
        self.data_chunk_size
    }

    /// Bytes of audio per second
    pub const fn byte_rate(&self) -> u32 {
        self.sample_rate.as_u32() * self.block_align as u32
    }

    /// Number of complete frames in the data chunk.
    ///
    /// Zero whenever `block_align` is zero; trailing partial frame
    /// bytes are dropped.
    pub const fn num_frames(&self) -> u32 {
        if self.block_align == 0 {
            0
        } else {
            self.data_chunk_size / self.block_align as u32
        }
    }
}

impl Display for WavSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} {} | {}, {} ch, {} frames",
            self.format, self.bit_depth, self.sample_rate, self.channels,
            self.num_frames()
        )
    }
}
