//! RIFF/WAVE header emission and the chunk-scanning state machine.
//!
//! The writer side emits the canonical 44-byte header with zeroed size
//! fields (patched on finalize). The reader side scans chunks until both
//! `fmt ` and `data` have been found, validating the fmt fields and
//! skipping everything else with RIFF's even-padding rule.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Read, Seek, SeekFrom, Write};

use crate::{
    config::{BitDepth, FormatTag, SampleRate, WavSpec},
    error::{WavError, WavResult},
};

/// FourCC chunk identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(pub [u8; 4]);

pub const RIFF_CHUNK: ChunkId = ChunkId(*b"RIFF");
pub const WAVE_CHUNK: ChunkId = ChunkId(*b"WAVE");
pub const FMT_CHUNK: ChunkId = ChunkId(*b"fmt ");
pub const DATA_CHUNK: ChunkId = ChunkId(*b"data");

impl ChunkId {
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Display for ChunkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match core::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(
                f,
                "0x{:02X}{:02X}{:02X}{:02X}",
                self.0[0], self.0[1], self.0[2], self.0[3]
            ),
        }
    }
}

/// Byte offset of the RIFF chunk size field (patched on finalize)
pub(crate) const RIFF_SIZE_OFFSET: u64 = 4;
/// Byte offset of the data chunk size field in the canonical header
pub(crate) const DATA_SIZE_OFFSET: u64 = 40;

/// Write the provisional 44-byte header.
///
/// The RIFF chunk size and data chunk size fields are zero placeholders;
/// `byte_rate` and `block_align` are derived from the spec here.
pub(crate) fn write_header<W: Write>(writer: &mut W, spec: &WavSpec) -> WavResult<()> {
    writer.write_all(RIFF_CHUNK.as_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?; // patched on finalize
    writer.write_all(WAVE_CHUNK.as_bytes())?;

    writer.write_all(FMT_CHUNK.as_bytes())?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&spec.format.as_u16().to_le_bytes())?;
    writer.write_all(&spec.channels.to_le_bytes())?;
    writer.write_all(&spec.sample_rate.as_u32().to_le_bytes())?;
    writer.write_all(&spec.byte_rate().to_le_bytes())?;
    writer.write_all(&spec.block_align().to_le_bytes())?;
    writer.write_all(&spec.bit_depth.as_u16().to_le_bytes())?;

    writer.write_all(DATA_CHUNK.as_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?; // patched on finalize

    Ok(())
}

/// Header parse result: the validated spec and the absolute byte offset
/// where the sample payload begins.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParsedHeader {
    pub spec: WavSpec,
    pub data_offset: u64,
}

/// Scanner states; each fallible transition reports the offset it
/// faulted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    ScanRiff,
    ScanWave,
    ScanChunks,
}

/// Parse and validate a RIFF/WAVE header.
///
/// Runs `ScanRiff -> ScanWave -> ScanChunks` over the stream. The chunk
/// loop terminates once both `fmt ` and `data` have been seen; unknown
/// chunks are skipped whole, rounded up to an even byte boundary. On
/// success the stream is positioned at the start of the data payload.
///
/// # Errors
///
/// Any missing marker, missing fmt/data chunk, unsupported fmt field
/// value, or read fault mid-scan fails the whole open.
pub(crate) fn read_header<R: Read + Seek>(reader: &mut R) -> WavResult<ParsedHeader> {
    let mut state = ScanState::ScanRiff;
    let mut offset: u64 = 0;

    let mut fmt_fields: Option<(FormatTag, u16, SampleRate, BitDepth)> = None;
    let mut data: Option<(u32, u64)> = None; // (size, payload offset)

    loop {
        match state {
            ScanState::ScanRiff => {
                let id = read_chunk_id(reader, offset)?;
                if id != RIFF_CHUNK {
                    return Err(WavError::malformed_header(
                        offset,
                        format!("expected RIFF marker, found '{}'", id),
                    ));
                }
                // RIFF chunk size is ignored; sizes are recomputed from
                // the subchunks themselves.
                let _riff_size = read_u32(reader, offset + 4)?;
                offset += 8;
                state = ScanState::ScanWave;
            }
            ScanState::ScanWave => {
                let id = read_chunk_id(reader, offset)?;
                if id != WAVE_CHUNK {
                    return Err(WavError::malformed_header(
                        offset,
                        format!("expected WAVE marker, found '{}'", id),
                    ));
                }
                offset += 4;
                state = ScanState::ScanChunks;
            }
            ScanState::ScanChunks => {
                let mut id_bytes = [0u8; 4];
                match reader.read_exact(&mut id_bytes) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                        // Stream exhausted before both chunks were found.
                        return Err(WavError::malformed_header(
                            offset,
                            missing_chunk_reason(fmt_fields.is_some(), data.is_some()),
                        ));
                    }
                    Err(e) => return Err(e.into()),
                }
                let id = ChunkId(id_bytes);
                let size = read_u32(reader, offset + 4)?;
                offset += 8;

                if id == FMT_CHUNK {
                    fmt_fields = Some(parse_fmt(reader, offset, size)?);
                    offset += u64::from(size) + u64::from(size & 1);
                } else if id == DATA_CHUNK {
                    data = Some((size, offset));
                    if fmt_fields.is_some() {
                        break;
                    }
                    // fmt still outstanding: skip past the payload
                    // (even-padded) and keep scanning.
                    let padded = u64::from(size) + u64::from(size & 1);
                    reader.seek(SeekFrom::Current(padded as i64))?;
                    offset += padded;
                } else {
                    // Unknown chunk: skip whole, odd sizes padded to the
                    // next even boundary.
                    let padded = u64::from(size) + u64::from(size & 1);
                    reader.seek(SeekFrom::Current(padded as i64))?;
                    offset += padded;
                }

                if fmt_fields.is_some() && data.is_some() {
                    break;
                }
            }
        }
    }

    // Both are guaranteed present once the loop breaks.
    let (format, channels, sample_rate, bit_depth) =
        fmt_fields.ok_or_else(|| WavError::malformed_header(offset, "fmt chunk not found"))?;
    let (data_size, data_offset) =
        data.ok_or_else(|| WavError::malformed_header(offset, "data chunk not found"))?;

    let mut spec = WavSpec::new(sample_rate, channels, bit_depth, format)?;
    spec.data_chunk_size = data_size;

    reader.seek(SeekFrom::Start(data_offset))?;
    Ok(ParsedHeader { spec, data_offset })
}

/// Parse the 16 canonical fmt bytes, skipping any declared extras and
/// the RIFF pad byte an odd-sized chunk carries.
fn parse_fmt<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    size: u32,
) -> WavResult<(FormatTag, u16, SampleRate, BitDepth)> {
    if size < 16 {
        return Err(WavError::malformed_header(
            offset,
            format!("fmt chunk too small: {} bytes", size),
        ));
    }

    let mut bytes = [0u8; 16];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| fault_at(e, offset))?;

    let format = FormatTag::try_from(u16::from_le_bytes([bytes[0], bytes[1]]))?;
    let channels = u16::from_le_bytes([bytes[2], bytes[3]]);
    if channels == 0 {
        return Err(WavError::unsupported_format("channel count is zero"));
    }
    let sample_rate =
        SampleRate::try_from(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]))?;
    // Byte rate and block align are read and discarded; both are
    // derivable, and a lying header must not poison framing.
    let _byte_rate = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let _block_align = u16::from_le_bytes([bytes[12], bytes[13]]);
    let bit_depth = BitDepth::try_from(u16::from_le_bytes([bytes[14], bytes[15]]))?;

    if format == FormatTag::Float && bit_depth != BitDepth::Bits32 {
        return Err(WavError::unsupported_format(format!(
            "IEEE float requires 32-bit samples, header declares {}",
            bit_depth
        )));
    }

    // Skip extension bytes beyond the canonical 16, plus the pad byte
    // of an odd-sized chunk.
    let extra = i64::from(size) + i64::from(size & 1) - 16;
    if extra > 0 {
        reader.seek(SeekFrom::Current(extra))?;
    }

    Ok((format, channels, sample_rate, bit_depth))
}

fn read_chunk_id<R: Read>(reader: &mut R, offset: u64) -> WavResult<ChunkId> {
    let mut bytes = [0u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| fault_at(e, offset))?;
    Ok(ChunkId(bytes))
}

fn read_u32<R: Read>(reader: &mut R, offset: u64) -> WavResult<u32> {
    let mut bytes = [0u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| fault_at(e, offset))?;
    Ok(u32::from_le_bytes(bytes))
}

fn fault_at(err: std::io::Error, offset: u64) -> WavError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        WavError::malformed_header(offset, "unexpected end of stream")
    } else {
        WavError::Io(err)
    }
}

fn missing_chunk_reason(found_fmt: bool, found_data: bool) -> String {
    match (found_fmt, found_data) {
        (false, false) => "fmt and data chunks not found".to_string(),
        (false, true) => "fmt chunk not found".to_string(),
        (true, false) => "data chunk not found".to_string(),
        (true, true) => "stream exhausted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_spec() -> WavSpec {
        WavSpec::new(SampleRate::Hz44100, 2, BitDepth::Bits16, FormatTag::Pcm)
            .expect("valid spec")
    }

    /// Hand-assemble a header with arbitrary chunks spliced before data.
    fn build_header(fmt: &[u8], pre_data_chunks: &[(&[u8; 4], &[u8])], data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
        buf.extend_from_slice(fmt);
        for (id, payload) in pre_data_chunks {
            buf.extend_from_slice(*id);
            buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            buf.extend_from_slice(payload);
            if payload.len() % 2 == 1 {
                buf.push(0); // RIFF pad byte
            }
        }
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(data);
        buf
    }

    fn fmt_bytes(
        format: u16,
        channels: u16,
        sample_rate: u32,
        block_align: u16,
        bits: u16,
    ) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..2].copy_from_slice(&format.to_le_bytes());
        bytes[2..4].copy_from_slice(&channels.to_le_bytes());
        bytes[4..8].copy_from_slice(&sample_rate.to_le_bytes());
        let byte_rate = sample_rate * u32::from(block_align);
        bytes[8..12].copy_from_slice(&byte_rate.to_le_bytes());
        bytes[12..14].copy_from_slice(&block_align.to_le_bytes());
        bytes[14..16].copy_from_slice(&bits.to_le_bytes());
        bytes
    }

    #[test]
    fn test_write_header_layout() {
        let mut buf = Vec::new();
        write_header(&mut buf, &make_spec()).expect("write failed");

        // RIFF(12) + fmt(8 + 16) + data header(8)
        assert_eq!(buf.len(), 44);
        assert_eq!(&buf[0..4], b"RIFF");
        assert_eq!(&buf[4..8], &0u32.to_le_bytes()); // placeholder
        assert_eq!(&buf[8..12], b"WAVE");
        assert_eq!(&buf[12..16], b"fmt ");
        assert_eq!(&buf[16..20], &16u32.to_le_bytes());
        assert_eq!(&buf[20..22], &1u16.to_le_bytes()); // PCM
        assert_eq!(&buf[22..24], &2u16.to_le_bytes()); // channels
        assert_eq!(&buf[24..28], &44_100u32.to_le_bytes());
        assert_eq!(&buf[28..32], &176_400u32.to_le_bytes()); // byte rate
        assert_eq!(&buf[32..34], &4u16.to_le_bytes()); // block align
        assert_eq!(&buf[34..36], &16u16.to_le_bytes()); // bit depth
        assert_eq!(&buf[36..40], b"data");
        assert_eq!(&buf[40..44], &0u32.to_le_bytes()); // placeholder
    }

    #[test]
    fn test_roundtrip_own_header() {
        let mut buf = Vec::new();
        write_header(&mut buf, &make_spec()).expect("write failed");
        buf.extend_from_slice(&[0u8; 16]); // 4 frames of payload

        let parsed = read_header(&mut Cursor::new(&buf)).expect("parse failed");
        assert_eq!(parsed.spec.sample_rate, SampleRate::Hz44100);
        assert_eq!(parsed.spec.channels, 2);
        assert_eq!(parsed.spec.bit_depth, BitDepth::Bits16);
        assert_eq!(parsed.spec.format, FormatTag::Pcm);
        assert_eq!(parsed.spec.block_align(), 4);
        assert_eq!(parsed.data_offset, 44);
        // Data size is zero until finalize patches it.
        assert_eq!(parsed.spec.data_chunk_size(), 0);
    }

    #[test]
    fn test_rejects_missing_riff() {
        let mut buf = Vec::new();
        write_header(&mut buf, &make_spec()).expect("write failed");
        buf[0..4].copy_from_slice(b"FORM");

        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, WavError::MalformedHeader { offset: 0, .. }));
    }

    #[test]
    fn test_rejects_missing_wave() {
        let mut buf = Vec::new();
        write_header(&mut buf, &make_spec()).expect("write failed");
        buf[8..12].copy_from_slice(b"AIFF");

        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, WavError::MalformedHeader { offset: 8, .. }));
    }

    #[test]
    fn test_skips_unknown_chunks_with_odd_padding() {
        // A 3-byte LIST chunk must be skipped to the next even boundary
        // or the following data chunk id would be misread.
        let fmt = fmt_bytes(1, 1, 44_100, 2, 16);
        let buf = build_header(&fmt, &[(b"LIST", b"abc")], &[0u8; 8]);

        let parsed = read_header(&mut Cursor::new(&buf)).expect("parse failed");
        assert_eq!(parsed.spec.data_chunk_size(), 8);
        assert_eq!(parsed.spec.num_frames(), 4);
    }

    #[test]
    fn test_skips_fmt_extension_bytes() {
        // 18-byte fmt: canonical 16 plus a zero-length extension field.
        let mut fmt = Vec::from(fmt_bytes(1, 1, 16_000, 2, 16));
        fmt.extend_from_slice(&0u16.to_le_bytes());
        let buf = build_header(&fmt, &[], &[0u8; 4]);

        let parsed = read_header(&mut Cursor::new(&buf)).expect("parse failed");
        assert_eq!(parsed.spec.bit_depth, BitDepth::Bits16);
        assert_eq!(parsed.spec.num_frames(), 2);
    }

    #[test]
    fn test_rejects_float_16bit() {
        let fmt = fmt_bytes(3, 1, 44_100, 2, 16);
        let buf = build_header(&fmt, &[], &[0u8; 4]);

        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, WavError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_unknown_format_tag() {
        let fmt = fmt_bytes(2, 1, 44_100, 2, 16); // ADPCM
        let buf = build_header(&fmt, &[], &[0u8; 4]);
        assert!(matches!(
            read_header(&mut Cursor::new(&buf)).unwrap_err(),
            WavError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_rejects_unsupported_sample_rate() {
        let fmt = fmt_bytes(1, 1, 44_000, 2, 16);
        let buf = build_header(&fmt, &[], &[0u8; 4]);
        assert!(matches!(
            read_header(&mut Cursor::new(&buf)).unwrap_err(),
            WavError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_rejects_hostile_channel_count() {
        // 65535 channels at 16-bit needs a 17-bit block align; the
        // open must reject the file, not overflow.
        let fmt = fmt_bytes(1, 65535, 44_100, 0, 16);
        let buf = build_header(&fmt, &[], &[0u8; 4]);
        assert!(matches!(
            read_header(&mut Cursor::new(&buf)).unwrap_err(),
            WavError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_declared_block_align_is_ignored() {
        // A lying block align field must not poison frame accounting.
        let fmt = fmt_bytes(1, 1, 44_100, 255, 16);
        let buf = build_header(&fmt, &[], &[0u8; 8]);

        let parsed = read_header(&mut Cursor::new(&buf)).expect("parse failed");
        assert_eq!(parsed.spec.block_align(), 2);
        assert_eq!(parsed.spec.num_frames(), 4);
    }

    #[test]
    fn test_odd_fmt_size_is_padded() {
        // A 17-byte fmt chunk carries a RIFF pad byte; without skipping
        // it every following chunk id is off by one.
        let fmt = fmt_bytes(1, 1, 44_100, 2, 16);
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&17u32.to_le_bytes());
        buf.extend_from_slice(&fmt);
        buf.push(0xEE); // declared extension byte
        buf.push(0); // RIFF pad byte
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 4]);

        let parsed = read_header(&mut Cursor::new(&buf)).expect("parse failed");
        assert_eq!(parsed.spec.data_chunk_size(), 4);
        assert_eq!(parsed.spec.num_frames(), 2);
    }

    #[test]
    fn test_rejects_zero_channels() {
        let fmt = fmt_bytes(1, 0, 44_100, 0, 16);
        let buf = build_header(&fmt, &[], &[0u8; 4]);
        assert!(matches!(
            read_header(&mut Cursor::new(&buf)).unwrap_err(),
            WavError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_missing_data_chunk_fails() {
        let fmt = fmt_bytes(1, 1, 44_100, 2, 16);
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&fmt);

        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        match err {
            WavError::MalformedHeader { reason, .. } => {
                assert!(reason.contains("data chunk not found"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_mid_scan_fails() {
        let mut buf = Vec::new();
        write_header(&mut buf, &make_spec()).expect("write failed");
        buf.truncate(30); // cut inside the fmt payload

        assert!(read_header(&mut Cursor::new(&buf)).is_err());
    }

    #[test]
    fn test_data_before_fmt_is_found() {
        // Some encoders emit data ahead of fmt; the scanner must skip
        // the payload, find fmt, then rewind to the payload start.
        let fmt = fmt_bytes(1, 1, 8_000, 2, 16);
        let mut buf = Vec::new();
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&6u32.to_le_bytes());
        buf.extend_from_slice(&[1, 0, 2, 0, 3, 0]);
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&fmt);

        let parsed = read_header(&mut Cursor::new(&buf)).expect("parse failed");
        assert_eq!(parsed.spec.data_chunk_size(), 6);
        assert_eq!(parsed.data_offset, 20);
    }
}
