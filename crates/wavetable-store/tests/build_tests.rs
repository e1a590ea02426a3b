//! Integration tests for `WavetableStore::build`.
//!
//! These tests drive the store through its public API with hand-made
//! payloads in both sample formats and both byte orders.

use wavetable_store::layout::{INTERPOLATION_OFFSET, MIN_FLOAT_TABLES, SILENCE_TABLES};
use wavetable_store::{
    required_size, split_wavetable, BuildError, ByteOrder, ValidationErrorCode, WavetableFlags,
    WavetableHeader, WavetableStore,
};

/// Helper to encode float samples as a little-endian payload.
fn float_payload(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Helper to encode 16-bit samples as a little-endian payload.
fn int16_payload(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Helper to read the unpadded fixed-point table.
fn fixed_samples(store: &WavetableStore, table: usize) -> Vec<i16> {
    (0..store.table_length() as isize)
        .map(|offset| store.lookup_i16(table, 0, offset).unwrap())
        .collect()
}

#[test]
fn test_float_source_two_tables() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 2, 4);
    let payload = float_payload(&[0.0, 1.0, 0.0, -1.0, 1.0, 1.0, -1.0, -1.0]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(store.float_table(0, 0).unwrap(), &[0.0, 1.0, 0.0, -1.0]);
    assert_eq!(store.float_table(1, 0).unwrap(), &[1.0, 1.0, -1.0, -1.0]);
    assert_eq!(fixed_samples(&store, 0), vec![0, 16383, 0, -16384]);
    assert_eq!(fixed_samples(&store, 1), vec![16383, 16383, -16384, -16384]);
    assert_eq!(store.lookup_i16(0, 0, -1), Some(-16384));
}

#[test]
fn test_infinite_float_samples_clamp() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 1, 2);
    let payload = float_payload(&[f32::INFINITY, f32::NEG_INFINITY]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(fixed_samples(&store, 0), vec![16383, -16384]);
    assert_eq!(store.lookup_f32(0, 0, 0), Some(f32::INFINITY));
}

#[test]
fn test_int16_full_range_source() {
    let flags = WavetableFlags::INT16 | WavetableFlags::INT16_FULL_RANGE;
    let header = WavetableHeader::new(flags, 1, 2);
    let payload = int16_payload(&[32767, -32768]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(fixed_samples(&store, 0), vec![16383, -16384]);
    let float = store.float_table(0, 0).unwrap();
    assert!((float[0] - 0.999939).abs() < 1e-5);
    assert_eq!(float[1], -1.0);
}

#[test]
fn test_int16_q14_source_is_not_shifted() {
    let header = WavetableHeader::new(WavetableFlags::INT16, 1, 4);
    let payload = int16_payload(&[8192, -8192, 16383, -16384]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(fixed_samples(&store, 0), vec![8192, -8192, 16383, -16384]);
    assert_eq!(store.float_table(0, 0).unwrap()[..2], [0.5, -0.5]);
}

#[test]
fn test_wrap_guards_every_real_table() {
    let length = 16;
    let tables = 5;
    let samples: Vec<f32> = (0..tables * length)
        .map(|i| ((i as f32) * 0.37).sin())
        .collect();
    let header = WavetableHeader::new(WavetableFlags::empty(), tables as u16, length as u32);

    let mut store = WavetableStore::new();
    store.build(&header, &float_payload(&samples), true).unwrap();

    let len = length as isize;
    let guard = INTERPOLATION_OFFSET as isize;
    for table in 0..tables {
        for k in 1..=guard {
            assert_eq!(
                store.lookup_i16(table, 0, -k),
                store.lookup_i16(table, 0, len - k),
                "leading guard {} of table {}",
                k,
                table
            );
            assert_eq!(
                store.lookup_i16(table, 0, len + k - 1),
                store.lookup_i16(table, 0, k - 1),
                "trailing guard {} of table {}",
                k,
                table
            );
        }
        assert_eq!(store.lookup_i16(table, 0, -guard - 1), None);
        assert_eq!(store.lookup_i16(table, 0, len + guard), None);
    }
}

#[test]
fn test_fixed_table_includes_guards() {
    let header = WavetableHeader::new(WavetableFlags::INT16, 1, 8);
    let payload = int16_payload(&[1, 2, 3, 4, 5, 6, 7, 8]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(
        store.fixed_table(0).unwrap(),
        &[5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4]
    );
}

#[test]
fn test_silence_tables_zero_at_every_level() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 4, 32);
    let payload = float_payload(&vec![0.75; 4 * 32]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, true).unwrap();

    assert_eq!(store.effective_table_count() - store.table_count(), SILENCE_TABLES);
    for table in 4..4 + SILENCE_TABLES {
        for level in 0..store.mip_levels() {
            let samples = store.float_table(table, level).unwrap();
            assert_eq!(samples.len(), 32 >> level);
            assert!(samples.iter().all(|&s| s == 0.0));
        }
        let guarded = store.fixed_table(table).unwrap();
        assert!(guarded.iter().all(|&s| s == 0));
    }
    assert_eq!(store.float_table(4 + SILENCE_TABLES, 0), None);
}

#[test]
fn test_single_table_gets_minimum_float_tables() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 1, 8);
    let payload = float_payload(&[0.5; 8]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(store.effective_table_count(), 1);
    for table in 1..MIN_FLOAT_TABLES {
        for level in 0..store.mip_levels() {
            let samples = store.float_table(table, level).unwrap();
            assert!(samples.iter().all(|&s| s == 0.0));
        }
        assert_eq!(store.fixed_table(table), None);
    }
    // the real table is untouched by the stubs
    assert_eq!(store.float_table(0, 0).unwrap(), &[0.5; 8]);
    assert_eq!(store.float_table(MIN_FLOAT_TABLES, 0), None);
}

#[test]
fn test_zero_tables_with_silence() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 0, 64);

    let mut store = WavetableStore::new();
    store.build(&header, &[], true).unwrap();

    assert_eq!(store.effective_table_count(), SILENCE_TABLES);
    assert!(store.float_table(2, 0).unwrap().iter().all(|&s| s == 0.0));
}

#[test]
fn test_build_is_idempotent() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 3, 64);
    let samples: Vec<f32> = (0..3 * 64).map(|i| (i as f32 / 96.0) - 1.0).collect();
    let payload = float_payload(&samples);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, true).unwrap();
    let first = store.clone();
    store.build(&header, &payload, true).unwrap();

    assert_eq!(store, first);
    assert_eq!(store.float_index(), first.float_index());
    assert_eq!(store.fixed_index(), first.fixed_index());
}

#[test]
fn test_rebuild_after_larger_build_matches_fresh_build() {
    let small = WavetableHeader::new(WavetableFlags::INT16, 2, 16);
    let small_payload = int16_payload(&[100; 32]);
    let large = WavetableHeader::new(WavetableFlags::INT16, 8, 256);
    let large_payload = int16_payload(&[-200; 8 * 256]);

    let mut reused = WavetableStore::new();
    reused.build(&large, &large_payload, true).unwrap();
    reused.build(&small, &small_payload, true).unwrap();

    let mut fresh = WavetableStore::new();
    fresh.build(&small, &small_payload, true).unwrap();

    for table in 0..fresh.effective_table_count() {
        assert_eq!(reused.float_table(table, 0), fresh.float_table(table, 0));
        assert_eq!(reused.fixed_table(table), fresh.fixed_table(table));
    }
    assert_eq!(reused.float_index(), fresh.float_index());
}

#[test]
fn test_capacity_covers_required_size() {
    let header = WavetableHeader::new(WavetableFlags::INT16, 100, 2048);
    let payload = int16_payload(&vec![0; 100 * 2048]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, true).unwrap();

    assert!(store.capacity() >= required_size(2048, 100));
}

#[test]
fn test_big_endian_payload() {
    let header = WavetableHeader::new(WavetableFlags::INT16, 1, 4);
    let samples = [1000i16, -1000, 0, 16000];
    let le: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let be: Vec<u8> = samples.iter().flat_map(|s| s.to_be_bytes()).collect();

    let mut from_le = WavetableStore::new();
    from_le.build(&header, &le, false).unwrap();
    let mut from_be = WavetableStore::new();
    from_be
        .build_with_order(&header, &be, false, ByteOrder::Big)
        .unwrap();

    assert_eq!(from_le, from_be);
}

#[test]
fn test_header_prefixed_buffer() {
    let header = WavetableHeader::new(WavetableFlags::empty(), 1, 4);
    let mut bytes = header.to_bytes(ByteOrder::Big).to_vec();
    for sample in [0.25f32, 0.5, 0.75, 1.0] {
        bytes.extend_from_slice(&sample.to_be_bytes());
    }

    let (parsed, payload) = split_wavetable(&bytes, ByteOrder::Big).unwrap();
    let mut store = WavetableStore::new();
    store
        .build_with_order(&parsed, payload, false, ByteOrder::Big)
        .unwrap();

    assert_eq!(store.float_table(0, 0).unwrap(), &[0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn test_trailing_payload_bytes_are_ignored() {
    let header = WavetableHeader::new(WavetableFlags::INT16, 1, 2);
    let payload = int16_payload(&[10, 20, 30]);

    let mut store = WavetableStore::new();
    store.build(&header, &payload, false).unwrap();

    assert_eq!(fixed_samples(&store, 0), vec![10, 20]);
}

#[test]
fn test_validation_errors_leave_store_untouched() {
    let good = WavetableHeader::new(WavetableFlags::empty(), 1, 4);
    let mut store = WavetableStore::new();
    store
        .build(&good, &float_payload(&[0.1, 0.2, 0.3, 0.4]), false)
        .unwrap();
    let before = store.clone();

    let cases = [
        (
            WavetableHeader::new(WavetableFlags::empty(), 1, 0),
            vec![],
            ValidationErrorCode::ZeroTableLength,
        ),
        (
            WavetableHeader::new(WavetableFlags::empty(), 1, 12),
            float_payload(&[0.0; 12]),
            ValidationErrorCode::TableLengthNotPowerOfTwo,
        ),
        (
            WavetableHeader::new(WavetableFlags::INT16, 2, 8),
            int16_payload(&[0; 15]),
            ValidationErrorCode::PayloadTooShort,
        ),
        (
            WavetableHeader::new(WavetableFlags::empty(), 1, 2),
            float_payload(&[f32::NAN, 0.0]),
            ValidationErrorCode::NanSample,
        ),
    ];

    for (header, payload, code) in cases {
        match store.build(&header, &payload, true) {
            Err(BuildError::Validation(err)) => assert_eq!(err.code, code),
            other => panic!("expected {} error, got {:?}", code, other),
        }
        assert_eq!(store, before);
    }
}
