//! Block conversions between float samples and the Q14 fixed-point format.
//!
//! Q14 maps ±1.0 to ±16384 and is clamped to `[-16384, 16383]` on the way
//! in, leaving headroom in an i16 for the playback interpolator.

/// Fixed-point scale: 1.0 == 2^14.
pub const Q14_ONE: f32 = 16384.0;

/// Smallest Q14 sample.
pub const Q14_MIN: i32 = -16384;

/// Largest Q14 sample.
pub const Q14_MAX: i32 = 16383;

/// Convert a float sample to Q14, truncating toward zero and clamping.
#[inline]
pub fn float_to_q14(sample: f32) -> i16 {
    ((sample * Q14_ONE) as i32).clamp(Q14_MIN, Q14_MAX) as i16
}

/// Convert a Q14 sample to float.
#[inline]
pub fn q14_to_float(sample: i16) -> f32 {
    sample as f32 * (1.0 / Q14_ONE)
}

/// Convert a float block to Q14. Converts `min(src.len(), dst.len())` samples.
pub fn float_to_q14_block(src: &[f32], dst: &mut [i16]) {
    for (out, &sample) in dst.iter_mut().zip(src) {
        *out = float_to_q14(sample);
    }
}

/// Convert a Q14 block to float. Converts `min(src.len(), dst.len())` samples.
pub fn q14_to_float_block(src: &[i16], dst: &mut [f32]) {
    for (out, &sample) in dst.iter_mut().zip(src) {
        *out = q14_to_float(sample);
    }
}

/// Halve full-range 16-bit samples in place (arithmetic shift).
pub fn i16_to_q14_block(block: &mut [i16]) {
    for sample in block {
        *sample >>= 1;
    }
}
