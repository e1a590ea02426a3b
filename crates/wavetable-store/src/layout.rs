//! Arena layout: constants, capacity planning and offset arithmetic.
//!
//! Tables are laid out mip-level-major inside a single flat arena:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ level 0: table 0 │ table 1 │ ... │ table N-1 │  tableLength (+ padding) each
//! ├──────────────────────────────────────────────┤
//! │ level 1: table 0 │ table 1 │ ... │ table N-1 │  tableLength / 2 (+ padding) each
//! ├──────────────────────────────────────────────┤
//! │ ...                                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The float arena uses no padding. The fixed-point arena pads every table
//! with [`INTERPOLATION_WINDOW`] samples: [`INTERPOLATION_OFFSET`] guard
//! samples before the table and the same number after it.

/// Width of the interpolation kernel used by the playback side.
pub const INTERPOLATION_WINDOW: usize = 8;

/// Guard samples needed on each side of a fixed-point table.
pub const INTERPOLATION_OFFSET: usize = INTERPOLATION_WINDOW >> 1;

/// Silent tables reserved after the last real table.
pub const SILENCE_TABLES: usize = 3;

/// The float representation always exposes at least this many tables.
pub const MIN_FLOAT_TABLES: usize = 3;

/// Number of mip levels tracked by the table index.
pub const MAX_MIP_LEVELS: usize = 16;

/// Number of table slots tracked by the table index.
pub const MAX_TABLES: usize = 512;

/// Absolute upper bound on the arena size, in samples.
pub const MAX_ARENA_SAMPLES: usize = 1 << 21;

/// Arena size of a freshly constructed store, in samples.
pub const DEFAULT_ARENA_SAMPLES: usize = 35_000;

/// Worst-case number of samples needed to hold `table_count` tables of
/// `table_length` samples at every mip level, padding included.
///
/// The [`SILENCE_TABLES`] margin is always reserved, whether or not a build
/// appends silence. Saturates at `usize::MAX`; see [`checked_required_size`].
pub fn required_size(table_length: usize, table_count: usize) -> usize {
    checked_required_size(table_length, table_count).unwrap_or(usize::MAX)
}

/// [`required_size`], or `None` if the total does not fit in `usize`.
pub fn checked_required_size(table_length: usize, table_count: usize) -> Option<usize> {
    let tables = table_count.checked_add(SILENCE_TABLES)?;
    let mut length = table_length;
    let mut size = 0usize;

    while length > 0 {
        let per_table = length.checked_add(INTERPOLATION_OFFSET + INTERPOLATION_WINDOW)?;
        size = size.checked_add(tables.checked_mul(per_table)?)?;
        length >>= 1;
    }

    Some(size)
}

/// Start offset of table `table` at mip level `level`.
///
/// `table_count` is the number of tables stored per level and `padding` the
/// number of extra samples reserved per table (zero for the float arena,
/// [`INTERPOLATION_WINDOW`] for the fixed-point arena).
pub fn index_of(
    table: usize,
    table_length: usize,
    table_count: usize,
    level: usize,
    padding: usize,
) -> usize {
    let level_span = table_count * table_length;
    let mut index = table * ((table_length >> level) + padding);

    for i in 0..level {
        index += level_span >> i;
        index += padding * table_count;
    }

    index
}

/// Number of mip levels reachable from `table_length` by repeated halving,
/// capped at [`MAX_MIP_LEVELS`].
pub fn mip_level_count(table_length: usize) -> usize {
    let levels = (usize::BITS - table_length.leading_zeros()) as usize;
    levels.min(MAX_MIP_LEVELS)
}

/// Panic unless `[offset, offset + len)` lies inside an arena of `capacity`
/// samples.
///
/// A failure here means [`required_size`] under-planned the arena.
#[inline]
#[track_caller]
pub(crate) fn assert_span(offset: usize, len: usize, capacity: usize) {
    assert!(
        offset + len <= capacity && offset + len <= MAX_ARENA_SAMPLES,
        "table span {}..{} exceeds planned arena capacity {}",
        offset,
        offset + len,
        capacity
    );
}
