//! Wavetable header and byte-order-aware sample deserialization.
//!
//! A raw wavetable is an 8-byte header followed by the sample payload:
//!
//! ```text
//! offset  size  field
//! 0       2     flags         (u16)
//! 2       2     table_count   (u16)
//! 4       4     sample_count  (u32, samples per table)
//! 8       ...   table_count blocks of sample_count samples (i16 or f32)
//! ```
//!
//! Files are little-endian. [`ByteOrder::Big`] exists for sources produced
//! on big-endian targets.

use crate::validation::{ValidationError, ValidationErrorCode};
use std::fmt;

/// Size of an encoded [`WavetableHeader`] in bytes.
pub const HEADER_LEN: usize = 8;

/// Byte order of a header and its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    #[inline]
    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Little => u16::from_le_bytes(bytes),
            Self::Big => u16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn read_i16(self, bytes: [u8; 2]) -> i16 {
        match self {
            Self::Little => i16::from_le_bytes(bytes),
            Self::Big => i16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn read_f32(self, bytes: [u8; 4]) -> f32 {
        f32::from_bits(self.read_u32(bytes))
    }

    pub fn write_u16(self, value: u16) -> [u8; 2] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub fn write_u32(self, value: u32) -> [u8; 4] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    /// Iterate `data` as 16-bit signed samples. A trailing odd byte is ignored.
    pub fn i16_samples(self, data: &[u8]) -> impl Iterator<Item = i16> + '_ {
        data.chunks_exact(2)
            .map(move |chunk| self.read_i16([chunk[0], chunk[1]]))
    }

    /// Iterate `data` as 32-bit float samples. Trailing partial samples are ignored.
    pub fn f32_samples(self, data: &[u8]) -> impl Iterator<Item = f32> + '_ {
        data.chunks_exact(4)
            .map(move |chunk| self.read_f32([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }
}

/// Sample format flags carried in the header.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct WavetableFlags(u16);

impl WavetableFlags {
    /// Samples are 16-bit signed integers instead of 32-bit floats.
    pub const INT16: Self = Self(1 << 0);
    /// 16-bit samples span the full i16 range and are halved on load.
    pub const INT16_FULL_RANGE: Self = Self(1 << 1);

    const KNOWN: u16 = Self::INT16.0 | Self::INT16_FULL_RANGE.0;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_int16(self) -> bool {
        self.contains(Self::INT16)
    }

    /// Whether 16-bit samples need the one-bit shift into Q14 range.
    ///
    /// Only meaningful together with [`Self::INT16`].
    pub const fn is_full_range(self) -> bool {
        self.is_int16() && self.contains(Self::INT16_FULL_RANGE)
    }

    /// Bits with no meaning for the build: unknown bits, plus the full-range
    /// bit when samples are floats.
    pub const fn ignored_bits(self) -> u16 {
        let mut ignored = self.0 & !Self::KNOWN;
        if !self.is_int16() {
            ignored |= self.0 & Self::INT16_FULL_RANGE.0;
        }
        ignored
    }

    /// Bytes per encoded sample.
    pub const fn sample_size(self) -> usize {
        if self.is_int16() {
            2
        } else {
            4
        }
    }
}

impl std::ops::BitOr for WavetableFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for WavetableFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match (self.is_int16(), self.is_full_range()) {
            (true, true) => "int16 (full range)",
            (true, false) => "int16",
            _ => "float32",
        };
        write!(f, "WavetableFlags({:#06x}, {})", self.0, format)
    }
}

/// Parsed wavetable header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavetableHeader {
    pub flags: WavetableFlags,
    /// Number of tables in the payload.
    pub table_count: u16,
    /// Samples per table at full resolution.
    pub table_length: u32,
}

impl WavetableHeader {
    pub fn new(flags: WavetableFlags, table_count: u16, table_length: u32) -> Self {
        Self {
            flags,
            table_count,
            table_length,
        }
    }

    /// Decode a header from the first [`HEADER_LEN`] bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, ValidationError> {
        if bytes.len() < HEADER_LEN {
            return Err(ValidationError::new(
                ValidationErrorCode::HeaderTooShort,
                format!("{} bytes, need {}", bytes.len(), HEADER_LEN),
            ));
        }

        Ok(Self {
            flags: WavetableFlags::from_bits(order.read_u16([bytes[0], bytes[1]])),
            table_count: order.read_u16([bytes[2], bytes[3]]),
            table_length: order.read_u32([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Encode the header.
    pub fn to_bytes(&self, order: ByteOrder) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&order.write_u16(self.flags.bits()));
        out[2..4].copy_from_slice(&order.write_u16(self.table_count));
        out[4..8].copy_from_slice(&order.write_u32(self.table_length));
        out
    }

    /// Number of payload bytes the header describes.
    pub fn payload_len(&self) -> usize {
        self.table_count as usize * self.table_length as usize * self.flags.sample_size()
    }
}

/// Split a header-prefixed buffer into its header and payload.
pub fn split_wavetable(
    bytes: &[u8],
    order: ByteOrder,
) -> Result<(WavetableHeader, &[u8]), ValidationError> {
    let header = WavetableHeader::from_bytes(bytes, order)?;
    Ok((header, &bytes[HEADER_LEN..]))
}
