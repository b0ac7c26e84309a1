//! Scalar sample conversions between the supported WAV representations.
//!
//! Every conversion is a pure function with no I/O and no state. The
//! formulas are the bit-exact contract of the crate: all float-to-integer
//! conversions truncate toward zero, signed narrowing uses arithmetic
//! shifts, and 8-bit PCM is offset-biased (0x80 is silence). 24-bit
//! samples have no native type and are carried in an `i32` whose top
//! byte is the sign extension of bit 23.

/// On-disk sample representation of a WAV data chunk.
///
/// `I24` is stored as 3 little-endian bytes on disk and carried in an
/// `i32` in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    U8,
    I16,
    I24,
    I32,
    F32,
}

impl SampleKind {
    /// Bytes one sample of this kind occupies on disk.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            SampleKind::U8 => 1,
            SampleKind::I16 => 2,
            SampleKind::I24 => 3,
            SampleKind::I32 | SampleKind::F32 => 4,
        }
    }

    pub const fn bits_per_sample(self) -> u16 {
        match self {
            SampleKind::U8 => 8,
            SampleKind::I16 => 16,
            SampleKind::I24 => 24,
            SampleKind::I32 | SampleKind::F32 => 32,
        }
    }
}

// To float

pub fn u8_to_f32(sample: u8) -> f32 {
    (sample as f32 - 127.5) / 127.5
}

pub fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 / 32767.0
}

pub fn i32_to_f32(sample: i32) -> f32 {
    sample as f32 / 2_147_483_647.0
}

pub fn i24_to_f32(sample: i32) -> f32 {
    sample as f32 / 8_388_607.0
}

// To uint8

pub fn f32_to_u8(sample: f32) -> u8 {
    // `as` truncates toward zero; out-of-range input saturates.
    (sample * 127.5 + 127.5) as u8
}

pub const fn i16_to_u8(sample: i16) -> u8 {
    (((sample >> 8) + 128) & 0xFF) as u8
}

pub const fn i32_to_u8(sample: i32) -> u8 {
    (((sample >> 24) + 128) & 0xFF) as u8
}

pub const fn i24_to_u8(sample: i32) -> u8 {
    (((sample >> 16) + 128) & 0xFF) as u8
}

// To int16

pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32767.0) as i16
}

pub const fn u8_to_i16(sample: u8) -> i16 {
    (sample as i16 - 128) * 256
}

pub const fn i32_to_i16(sample: i32) -> i16 {
    (sample >> 16) as i16
}

pub const fn i24_to_i16(sample: i32) -> i16 {
    (sample >> 8) as i16
}

// To int24 (carried in i32)

pub fn f32_to_i24(sample: f32) -> i32 {
    (sample * 8_388_607.0) as i32
}

pub const fn u8_to_i24(sample: u8) -> i32 {
    (sample as i32 - 128) * 65536
}

pub const fn i16_to_i24(sample: i16) -> i32 {
    (sample as i32) << 8
}

pub const fn i32_to_i24(sample: i32) -> i32 {
    sample >> 8
}

// To int32

pub fn f32_to_i32(sample: f32) -> i32 {
    (sample * 2_147_483_647.0) as i32
}

pub const fn u8_to_i32(sample: u8) -> i32 {
    (sample as i32 - 128) << 24
}

pub const fn i16_to_i32(sample: i16) -> i32 {
    (sample as i32) << 16
}

pub const fn i24_to_i32(sample: i32) -> i32 {
    sample << 8
}

/// Pack a 24-bit sample (carried in an `i32`) into 3 little-endian bytes.
///
/// Bits above bit 23 are discarded.
pub const fn pack_i24_le(sample: i32) -> [u8; 3] {
    [
        (sample & 0xFF) as u8,
        ((sample >> 8) & 0xFF) as u8,
        ((sample >> 16) & 0xFF) as u8,
    ]
}

/// Reassemble 3 little-endian bytes into a sign-extended `i32` carrier.
///
/// Bit 23 is extended into the high byte so the carrier is numerically
/// correct for negative samples.
pub const fn unpack_i24_le(bytes: [u8; 3]) -> i32 {
    let value = (bytes[0] as i32) | ((bytes[1] as i32) << 8) | ((bytes[2] as i32) << 16);
    if value & 0x80_0000 != 0 {
        value | !0xFF_FFFF
    } else {
        value
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// In-memory sample type usable at the read/write API boundary.
///
/// Implemented for `u8`, `i16`, `i32` and `f32`. Each implementation
/// carries the full converter row and column of the conversion matrix,
/// so a reader or writer picks the correct scalar function with one
/// exhaustive match on [`SampleKind`] instead of re-deriving the branch
/// per call.
///
/// Note that `i32` is the carrier for both 32-bit PCM and 24-bit PCM;
/// `Sample::KIND` for `i32` is [`SampleKind::I32`], and 24-bit handling
/// is selected by the stream's configured kind, never by the in-memory
/// type.
pub trait Sample: Copy + sealed::Sealed {
    const KIND: SampleKind;

    fn from_u8(v: u8) -> Self;
    fn from_i16(v: i16) -> Self;
    fn from_i24(v: i32) -> Self;
    fn from_i32(v: i32) -> Self;
    fn from_f32(v: f32) -> Self;

    fn to_u8(self) -> u8;
    fn to_i16(self) -> i16;
    fn to_i24(self) -> i32;
    fn to_i32(self) -> i32;
    fn to_f32(self) -> f32;
}

impl Sample for u8 {
    const KIND: SampleKind = SampleKind::U8;

    fn from_u8(v: u8) -> Self {
        v
    }
    fn from_i16(v: i16) -> Self {
        i16_to_u8(v)
    }
    fn from_i24(v: i32) -> Self {
        i24_to_u8(v)
    }
    fn from_i32(v: i32) -> Self {
        i32_to_u8(v)
    }
    fn from_f32(v: f32) -> Self {
        f32_to_u8(v)
    }

    fn to_u8(self) -> u8 {
        self
    }
    fn to_i16(self) -> i16 {
        u8_to_i16(self)
    }
    fn to_i24(self) -> i32 {
        u8_to_i24(self)
    }
    fn to_i32(self) -> i32 {
        u8_to_i32(self)
    }
    fn to_f32(self) -> f32 {
        u8_to_f32(self)
    }
}

impl Sample for i16 {
    const KIND: SampleKind = SampleKind::I16;

    fn from_u8(v: u8) -> Self {
        u8_to_i16(v)
    }
    fn from_i16(v: i16) -> Self {
        v
    }
    fn from_i24(v: i32) -> Self {
        i24_to_i16(v)
    }
    fn from_i32(v: i32) -> Self {
        i32_to_i16(v)
    }
    fn from_f32(v: f32) -> Self {
        f32_to_i16(v)
    }

    fn to_u8(self) -> u8 {
        i16_to_u8(self)
    }
    fn to_i16(self) -> i16 {
        self
    }
    fn to_i24(self) -> i32 {
        i16_to_i24(self)
    }
    fn to_i32(self) -> i32 {
        i16_to_i32(self)
    }
    fn to_f32(self) -> f32 {
        i16_to_f32(self)
    }
}

impl Sample for i32 {
    const KIND: SampleKind = SampleKind::I32;

    fn from_u8(v: u8) -> Self {
        u8_to_i32(v)
    }
    fn from_i16(v: i16) -> Self {
        i16_to_i32(v)
    }
    fn from_i24(v: i32) -> Self {
        i24_to_i32(v)
    }
    fn from_i32(v: i32) -> Self {
        v
    }
    fn from_f32(v: f32) -> Self {
        f32_to_i32(v)
    }

    fn to_u8(self) -> u8 {
        i32_to_u8(self)
    }
    fn to_i16(self) -> i16 {
        i32_to_i16(self)
    }
    fn to_i24(self) -> i32 {
        i32_to_i24(self)
    }
    fn to_i32(self) -> i32 {
        self
    }
    fn to_f32(self) -> f32 {
        i32_to_f32(self)
    }
}

impl Sample for f32 {
    const KIND: SampleKind = SampleKind::F32;

    fn from_u8(v: u8) -> Self {
        u8_to_f32(v)
    }
    fn from_i16(v: i16) -> Self {
        i16_to_f32(v)
    }
    fn from_i24(v: i32) -> Self {
        i24_to_f32(v)
    }
    fn from_i32(v: i32) -> Self {
        i32_to_f32(v)
    }
    fn from_f32(v: f32) -> Self {
        v
    }

    fn to_u8(self) -> u8 {
        f32_to_u8(self)
    }
    fn to_i16(self) -> i16 {
        f32_to_i16(self)
    }
    fn to_i24(self) -> i32 {
        f32_to_i24(self)
    }
    fn to_i32(self) -> i32 {
        f32_to_i32(self)
    }
    fn to_f32(self) -> f32 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_float_endpoints() {
        assert_eq!(u8_to_f32(0), -1.0);
        assert_eq!(u8_to_f32(255), 1.0);
        assert!(u8_to_f32(128).abs() < 0.004);
    }

    #[test]
    fn test_i16_float_full_scale() {
        assert_eq!(i16_to_f32(32767), 1.0);
        assert_eq!(i16_to_f32(0), 0.0);
        assert!((i16_to_f32(-32768) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_float_to_i16_truncates_toward_zero() {
        // 0.5 * 32767 = 16383.5, truncation drops the half
        assert_eq!(f32_to_i16(0.5), 16383);
        assert_eq!(f32_to_i16(-0.5), -16383);
        assert_eq!(f32_to_i16(0.0), 0);
    }

    #[test]
    fn test_float_to_u8_truncates_toward_zero() {
        assert_eq!(f32_to_u8(0.0), 127);
        assert_eq!(f32_to_u8(1.0), 255);
        assert_eq!(f32_to_u8(-1.0), 0);
    }

    #[test]
    fn test_signed_narrowing_is_arithmetic() {
        assert_eq!(i16_to_u8(-32768), 0);
        assert_eq!(i16_to_u8(32767), 255);
        assert_eq!(i32_to_i16(i32::MIN), i16::MIN);
        assert_eq!(i32_to_i16(i32::MAX), i16::MAX);
        assert_eq!(i32_to_u8(i32::MIN), 0);
    }

    #[test]
    fn test_u8_widening_is_offset_biased() {
        assert_eq!(u8_to_i16(128), 0);
        assert_eq!(u8_to_i16(0), -32768);
        assert_eq!(u8_to_i32(0), i32::MIN);
        assert_eq!(u8_to_i24(0), -8_388_608);
        assert_eq!(u8_to_i24(255), 127 * 65536);
    }

    #[test]
    fn test_i24_range() {
        assert_eq!(f32_to_i24(1.0), 8_388_607);
        assert_eq!(f32_to_i24(-1.0), -8_388_607);
        assert_eq!(i16_to_i24(i16::MAX), 8_388_352);
        assert_eq!(i32_to_i24(i32::MAX), 8_388_607);
    }

    #[test]
    fn test_pack_unpack_i24_positive() {
        let bytes = pack_i24_le(0x123456);
        assert_eq!(bytes, [0x56, 0x34, 0x12]);
        assert_eq!(unpack_i24_le(bytes), 0x123456);
    }

    #[test]
    fn test_unpack_i24_sign_extends() {
        assert_eq!(unpack_i24_le([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(unpack_i24_le([0x00, 0x00, 0x80]), -8_388_608);
        assert_eq!(unpack_i24_le([0xFF, 0xFF, 0x7F]), 8_388_607);
    }

    #[test]
    fn test_pack_unpack_i24_roundtrip_negatives() {
        for v in [-1, -2, -8_388_608, -42_000, 8_388_607, 0, 1] {
            assert_eq!(unpack_i24_le(pack_i24_le(v)), v, "value {v}");
        }
    }

    #[test]
    fn test_sample_trait_identity() {
        assert_eq!(<u8 as Sample>::from_u8(200), 200);
        assert_eq!(<i16 as Sample>::from_i16(-123), -123);
        assert_eq!(<i32 as Sample>::from_i32(7), 7);
        assert_eq!(<f32 as Sample>::from_f32(0.25), 0.25);
    }

    #[test]
    fn test_sample_kind_widths() {
        assert_eq!(SampleKind::U8.bytes_per_sample(), 1);
        assert_eq!(SampleKind::I16.bytes_per_sample(), 2);
        assert_eq!(SampleKind::I24.bytes_per_sample(), 3);
        assert_eq!(SampleKind::I32.bytes_per_sample(), 4);
        assert_eq!(SampleKind::F32.bytes_per_sample(), 4);
        assert_eq!(SampleKind::I24.bits_per_sample(), 24);
    }
}
