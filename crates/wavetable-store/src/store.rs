//! The wavetable store: sample arenas, table indexes and the build step.
//!
//! A store owns two parallel arenas of the same length, one of `f32`
//! samples and one of Q14 `i16` samples, plus one [`TableIndex`] per arena.
//! [`WavetableStore::build`] is the only mutator and always rebuilds
//! everything from the supplied payload.
//!
//! # Threading
//!
//! A store is not synchronized. Readers on the audio thread must never
//! observe a store while it is being built; build a fresh store off the
//! audio thread and hand it over with [`crate::handoff`].

use crate::convert::{float_to_q14_block, i16_to_q14_block, q14_to_float_block};
use crate::error::BuildError;
use crate::header::{ByteOrder, WavetableFlags, WavetableHeader};
use crate::layout::{
    assert_span, index_of, mip_level_count, required_size, DEFAULT_ARENA_SAMPLES,
    INTERPOLATION_OFFSET, INTERPOLATION_WINDOW, MIN_FLOAT_TABLES, SILENCE_TABLES,
};
use crate::table_index::TableIndex;
use crate::validation::validate_payload;
use log::{debug, warn};
use std::collections::TryReserveError;
use std::fmt;

/// Mip-mapped float and fixed-point tables for one wavetable slot.
#[derive(Clone, PartialEq)]
pub struct WavetableStore {
    float_arena: Vec<f32>,
    fixed_arena: Vec<i16>,
    float_index: TableIndex,
    fixed_index: TableIndex,
    flags: WavetableFlags,
    table_count: usize,
    effective_table_count: usize,
    table_length: usize,
    table_length_log2: u32,
    sample_step: f32,
}

impl WavetableStore {
    /// Create an empty store with a [`DEFAULT_ARENA_SAMPLES`] arena.
    pub fn new() -> Self {
        Self {
            float_arena: vec![0.0; DEFAULT_ARENA_SAMPLES],
            fixed_arena: vec![0; DEFAULT_ARENA_SAMPLES],
            float_index: TableIndex::new(),
            fixed_index: TableIndex::new(),
            flags: WavetableFlags::empty(),
            table_count: 0,
            effective_table_count: 0,
            table_length: 0,
            table_length_log2: 0,
            sample_step: 0.0,
        }
    }

    /// Build the tables from a little-endian payload.
    ///
    /// See [`Self::build_with_order`].
    pub fn build(
        &mut self,
        header: &WavetableHeader,
        payload: &[u8],
        append_silence: bool,
    ) -> Result<(), BuildError> {
        self.build_with_order(header, payload, append_silence, ByteOrder::Little)
    }

    /// Decode `payload` into level 0 of both arenas and rebuild the indexes.
    ///
    /// With `append_silence`, [`SILENCE_TABLES`] zeroed tables follow the
    /// real ones. Slots below [`MIN_FLOAT_TABLES`] that hold no real table
    /// get zeroed float tables at every mip level, as do appended silence
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Validation`] for a malformed header or payload
    /// and [`BuildError::Allocation`] if the arenas cannot grow. In both
    /// cases the store is left untouched.
    pub fn build_with_order(
        &mut self,
        header: &WavetableHeader,
        payload: &[u8],
        append_silence: bool,
        order: ByteOrder,
    ) -> Result<(), BuildError> {
        validate_payload(header, payload, order)?;

        let flags = header.flags;
        let length = header.table_length as usize;
        let tables = header.table_count as usize;

        if flags.ignored_bits() != 0 {
            warn!(
                "ignoring wavetable flag bits {:#06x} in {:?}",
                flags.ignored_bits(),
                flags
            );
        }
        let trailing = payload.len() - header.payload_len();
        if trailing > 0 {
            warn!("ignoring {} trailing payload bytes", trailing);
        }

        let required = required_size(length, tables);
        debug!(
            "building wavetable: {} tables x {} samples, {:?}, {} arena samples required",
            tables, length, flags, required
        );

        if required > self.capacity() {
            let (float_arena, fixed_arena) = allocate_arenas(required).map_err(|_| {
                BuildError::Allocation {
                    requested_samples: required,
                }
            })?;
            debug!("growing arenas from {} to {} samples", self.capacity(), required);
            self.float_arena = float_arena;
            self.fixed_arena = fixed_arena;
        } else {
            self.float_arena.fill(0.0);
            self.fixed_arena.fill(0);
        }

        let effective = tables + if append_silence { SILENCE_TABLES } else { 0 };

        self.float_index.clear();
        self.fixed_index.clear();
        self.flags = flags;
        self.table_count = tables;
        self.effective_table_count = effective;
        self.table_length = length;
        self.table_length_log2 = length.trailing_zeros();
        self.sample_step = 1.0 / length as f32;

        self.register_level_zero();
        self.stub_float_mips();
        self.decode_tables(payload, order);
        self.clear_silence();
        self.write_wrap_guards();

        debug!(
            "wavetable built: {} tables ({} with silence), {} mip levels, capacity {}",
            tables,
            effective,
            self.mip_levels(),
            self.capacity()
        );

        Ok(())
    }

    fn float_offset(&self, table: usize, level: usize) -> usize {
        index_of(table, self.table_length, self.effective_table_count, level, 0)
    }

    /// Start of a padded fixed-point block; samples begin
    /// [`INTERPOLATION_OFFSET`] further in.
    fn fixed_offset(&self, table: usize) -> usize {
        index_of(
            table,
            self.table_length,
            self.effective_table_count,
            0,
            INTERPOLATION_WINDOW,
        )
    }

    fn register_level_zero(&mut self) {
        let capacity = self.capacity();
        let length = self.table_length;

        for table in 0..self.effective_table_count {
            let float_offset = self.float_offset(table, 0);
            assert_span(float_offset, length, capacity);
            self.float_index.set(0, table, float_offset);

            let fixed_offset = self.fixed_offset(table);
            assert_span(fixed_offset, length + INTERPOLATION_WINDOW, capacity);
            self.fixed_index.set(0, table, fixed_offset);
        }
    }

    fn stub_float_mips(&mut self) {
        let capacity = self.capacity();
        let levels = mip_level_count(self.table_length);
        let last = self.effective_table_count.max(MIN_FLOAT_TABLES);

        for table in self.table_count..last {
            for level in 0..levels {
                let len = self.table_length >> level;
                let offset = self.float_offset(table, level);
                assert_span(offset, len, capacity);
                self.float_arena[offset..offset + len].fill(0.0);
                self.float_index.set(level, table, offset);
            }
        }
    }

    fn decode_tables(&mut self, payload: &[u8], order: ByteOrder) {
        let length = self.table_length;
        let block_bytes = length * self.flags.sample_size();

        for (table, src) in payload
            .chunks_exact(block_bytes)
            .take(self.table_count)
            .enumerate()
        {
            let float_start = self.float_offset(table, 0);
            let fixed_start = self.fixed_offset(table) + INTERPOLATION_OFFSET;
            let float = &mut self.float_arena[float_start..float_start + length];
            let fixed = &mut self.fixed_arena[fixed_start..fixed_start + length];

            if self.flags.is_int16() {
                for (out, sample) in fixed.iter_mut().zip(order.i16_samples(src)) {
                    *out = sample;
                }
                if self.flags.is_full_range() {
                    i16_to_q14_block(fixed);
                }
                q14_to_float_block(fixed, float);
            } else {
                for (out, sample) in float.iter_mut().zip(order.f32_samples(src)) {
                    *out = sample;
                }
                float_to_q14_block(float, fixed);
            }
        }
    }

    fn clear_silence(&mut self) {
        let length = self.table_length;

        for table in self.table_count..self.effective_table_count {
            let float_start = self.float_offset(table, 0);
            self.float_arena[float_start..float_start + length].fill(0.0);

            let fixed_start = self.fixed_offset(table);
            self.fixed_arena[fixed_start..fixed_start + length + INTERPOLATION_WINDOW].fill(0);
        }
    }

    fn write_wrap_guards(&mut self) {
        let length = self.table_length;

        for table in 0..self.table_count {
            let start = self.fixed_offset(table);
            let block = &mut self.fixed_arena[start..start + length + INTERPOLATION_WINDOW];
            wrap_block(block, length);
        }
    }

    /// Float samples of `table` at mip `level`.
    pub fn float_table(&self, table: usize, level: usize) -> Option<&[f32]> {
        let offset = self.float_index.get(level, table)?;
        let len = self.table_length >> level;
        self.float_arena.get(offset..offset + len)
    }

    /// Padded fixed-point block of `table` at level 0.
    ///
    /// The block holds [`INTERPOLATION_OFFSET`] guard samples, the table,
    /// then another [`INTERPOLATION_OFFSET`] guard samples.
    pub fn fixed_table(&self, table: usize) -> Option<&[i16]> {
        let offset = self.fixed_index.get(0, table)?;
        self.fixed_arena
            .get(offset..offset + self.table_length + INTERPOLATION_WINDOW)
    }

    /// Float sample `offset` of `table` at `level`, valid in
    /// `[0, table_length >> level)`.
    #[inline]
    pub fn lookup_f32(&self, table: usize, level: usize, offset: usize) -> Option<f32> {
        self.float_table(table, level)?.get(offset).copied()
    }

    /// Fixed-point sample `offset` of `table` at `level`.
    ///
    /// Valid in `[-INTERPOLATION_OFFSET, len + INTERPOLATION_OFFSET)`, where
    /// offsets outside `[0, len)` read the wrap guards. Only level 0 carries
    /// fixed-point tables.
    #[inline]
    pub fn lookup_i16(&self, table: usize, level: usize, offset: isize) -> Option<i16> {
        let base = self.fixed_index.get(level, table)?;
        let guard = INTERPOLATION_OFFSET as isize;
        let len = (self.table_length >> level) as isize;
        if offset < -guard || offset >= len + guard {
            return None;
        }
        self.fixed_arena
            .get((base as isize + guard + offset) as usize)
            .copied()
    }

    /// Samples per arena.
    pub fn capacity(&self) -> usize {
        self.float_arena.len()
    }

    /// Samples per table at level 0. Zero before the first build.
    pub fn table_length(&self) -> usize {
        self.table_length
    }

    pub fn table_length_log2(&self) -> u32 {
        self.table_length_log2
    }

    /// Phase increment of one sample at level 0.
    pub fn sample_step(&self) -> f32 {
        self.sample_step
    }

    /// Tables decoded from the payload.
    pub fn table_count(&self) -> usize {
        self.table_count
    }

    /// Tables including appended silence.
    pub fn effective_table_count(&self) -> usize {
        self.effective_table_count
    }

    pub fn flags(&self) -> WavetableFlags {
        self.flags
    }

    /// Mip levels a table of the current length spans.
    pub fn mip_levels(&self) -> usize {
        mip_level_count(self.table_length)
    }

    pub fn float_index(&self) -> &TableIndex {
        &self.float_index
    }

    pub fn fixed_index(&self) -> &TableIndex {
        &self.fixed_index
    }
}

impl Default for WavetableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WavetableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WavetableStore")
            .field("capacity", &self.capacity())
            .field("flags", &self.flags)
            .field("table_count", &self.table_count)
            .field("effective_table_count", &self.effective_table_count)
            .field("table_length", &self.table_length)
            .finish_non_exhaustive()
    }
}

fn allocate_arenas(samples: usize) -> Result<(Vec<f32>, Vec<i16>), TryReserveError> {
    let mut float_arena = Vec::new();
    float_arena.try_reserve_exact(samples)?;
    float_arena.resize(samples, 0.0);

    let mut fixed_arena = Vec::new();
    fixed_arena.try_reserve_exact(samples)?;
    fixed_arena.resize(samples, 0);

    Ok((float_arena, fixed_arena))
}

/// Fill the guard samples of a padded block so reads past either edge wrap.
fn wrap_block(block: &mut [i16], length: usize) {
    let start = INTERPOLATION_OFFSET;

    for k in 0..INTERPOLATION_OFFSET {
        block[start + length + k] = block[start + k % length];
        block[start - 1 - k] = block[start + length - 1 - k % length];
    }
}
