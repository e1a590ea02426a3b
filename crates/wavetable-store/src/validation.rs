//! Validation of wavetable headers and payloads.
//!
//! Every check here runs before a build touches the store, so a rejected
//! wavetable leaves the previously built tables in place.
//!
//! # Error Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | E001 | Table length is zero |
//! | E002 | Table length is not a power of two |
//! | E003 | Too many tables |
//! | E004 | Arena size limit exceeded |
//! | E005 | Payload too short |
//! | E006 | NaN sample value |
//! | E007 | Header too short |
//! | E008 | Table length too large |

use crate::header::{ByteOrder, WavetableHeader};
use crate::layout::{
    required_size, MAX_ARENA_SAMPLES, MAX_MIP_LEVELS, MAX_TABLES, SILENCE_TABLES,
};
use std::fmt;

/// Error codes for validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// E001: Table length is 0
    ZeroTableLength,
    /// E002: Table length is not a power of two
    TableLengthNotPowerOfTwo,
    /// E003: Table count (plus silence margin) exceeds the table index
    TooManyTables,
    /// E004: Planned arena would exceed the absolute sample bound
    ArenaLimitExceeded,
    /// E005: Payload holds fewer bytes than the header describes
    PayloadTooShort,
    /// E006: A float sample is NaN. Infinite samples are clamped, not rejected.
    NanSample,
    /// E007: Fewer bytes than a header needs
    HeaderTooShort,
    /// E008: Table length has more mip levels than the index tracks
    TableLengthTooLarge,
}

impl ValidationErrorCode {
    /// Get the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroTableLength => "E001",
            Self::TableLengthNotPowerOfTwo => "E002",
            Self::TooManyTables => "E003",
            Self::ArenaLimitExceeded => "E004",
            Self::PayloadTooShort => "E005",
            Self::NanSample => "E006",
            Self::HeaderTooShort => "E007",
            Self::TableLengthTooLarge => "E008",
        }
    }

    /// Get guidance on how to fix this error.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::ZeroTableLength => "Set the header sample count to a positive power of two.",
            Self::TableLengthNotPowerOfTwo => {
                "Resample each table to a power-of-two length (256, 512, 1024, 2048...)."
            }
            Self::TooManyTables => "Split the wavetable or drop tables to fit the table index.",
            Self::ArenaLimitExceeded => {
                "Reduce the table length or table count; all mip levels must fit the arena bound."
            }
            Self::PayloadTooShort => {
                "The payload must contain table_count * sample_count samples of the flagged format."
            }
            Self::NanSample => "Float samples must be numbers; NaN has no fixed-point value.",
            Self::HeaderTooShort => "A wavetable header is 8 bytes: flags, table count, sample count.",
            Self::TableLengthTooLarge => "Reduce the table length to at most 2^15 samples.",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A wavetable rejected before the build touched the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Stable code, see the table above.
    pub code: ValidationErrorCode,
    /// What was wrong with this particular wavetable.
    pub message: String,
    /// Offending header field (`sample_count`, `table_count`), when there is one.
    pub field: Option<String>,
}

impl ValidationError {
    /// A rejection not tied to a single header field.
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// A rejection caused by one header field.
    pub fn for_field(
        code: ValidationErrorCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::new(code, message)
        }
    }

    /// Fix-it hint for this error's code.
    pub fn guidance(&self) -> &'static str {
        self.code.guidance()
    }

    /// Multi-line report for the CLI: code, field, message and fix-it hint.
    pub fn detailed_message(&self) -> String {
        let mut report = format!("[{}]", self.code);
        if let Some(field) = &self.field {
            report.push_str(&format!(" (field: {})", field));
        }
        report.push_str(&format!(
            ": {}\n  Guidance: {}",
            self.message,
            self.guidance()
        ));
        report
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code)?;
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the header fields on their own.
pub fn validate_header(header: &WavetableHeader) -> Result<(), ValidationError> {
    let length = header.table_length as usize;

    if length == 0 {
        return Err(ValidationError::for_field(
            ValidationErrorCode::ZeroTableLength,
            "sample_count",
            "table length is 0",
        ));
    }

    if !length.is_power_of_two() {
        return Err(ValidationError::for_field(
            ValidationErrorCode::TableLengthNotPowerOfTwo,
            "sample_count",
            format!("table length {} is not a power of two", length),
        ));
    }

    if length > 1 << (MAX_MIP_LEVELS - 1) {
        return Err(ValidationError::for_field(
            ValidationErrorCode::TableLengthTooLarge,
            "sample_count",
            format!(
                "table length {} exceeds maximum of {}",
                length,
                1usize << (MAX_MIP_LEVELS - 1)
            ),
        ));
    }

    let tables = header.table_count as usize;
    if tables + SILENCE_TABLES > MAX_TABLES {
        return Err(ValidationError::for_field(
            ValidationErrorCode::TooManyTables,
            "table_count",
            format!(
                "{} tables exceed maximum of {}",
                tables,
                MAX_TABLES - SILENCE_TABLES
            ),
        ));
    }

    let required = required_size(length, tables);
    if required > MAX_ARENA_SAMPLES {
        return Err(ValidationError::new(
            ValidationErrorCode::ArenaLimitExceeded,
            format!(
                "{} tables of {} samples need {} arena samples, limit is {}",
                tables, length, required, MAX_ARENA_SAMPLES
            ),
        ));
    }

    Ok(())
}

/// Validate the header and check that `payload` holds every sample it
/// describes.
///
/// Float payloads are additionally scanned for NaN. Infinite samples pass
/// and clamp to the Q14 range when converted.
pub fn validate_payload(
    header: &WavetableHeader,
    payload: &[u8],
    order: ByteOrder,
) -> Result<(), ValidationError> {
    validate_header(header)?;

    let expected = header.payload_len();
    if payload.len() < expected {
        return Err(ValidationError::new(
            ValidationErrorCode::PayloadTooShort,
            format!(
                "payload has {} bytes, header describes {}",
                payload.len(),
                expected
            ),
        ));
    }

    if !header.flags.is_int16() {
        let samples = &payload[..expected];
        if let Some((index, value)) = order
            .f32_samples(samples)
            .enumerate()
            .find(|(_, sample)| sample.is_nan())
        {
            return Err(ValidationError::new(
                ValidationErrorCode::NanSample,
                format!("NaN sample at index {} (value: {})", index, value),
            ));
        }
    }

    Ok(())
}
