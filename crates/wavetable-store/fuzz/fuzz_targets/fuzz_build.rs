//! Fuzz target for header parsing and table builds.
//!
//! Arbitrary bytes are split into a header and payload and built in both
//! byte orders. Malformed input must be rejected with an error, never a
//! panic.
//!
//! Run with: `cargo +nightly fuzz run fuzz_build`

#![no_main]

use libfuzzer_sys::fuzz_target;
use wavetable_store::{split_wavetable, ByteOrder, WavetableStore};

fuzz_target!(|data: &[u8]| {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let Ok((header, payload)) = split_wavetable(data, order) else {
            continue;
        };

        let mut store = WavetableStore::new();
        if store
            .build_with_order(&header, payload, true, order)
            .is_ok()
        {
            assert!(store.capacity() >= wavetable_store::required_size(
                store.table_length(),
                store.table_count()
            ));
        }
    }
});
