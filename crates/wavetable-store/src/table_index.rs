//! Offset index mapping `(mip level, table)` to a position in an arena.

use crate::layout::{MAX_MIP_LEVELS, MAX_TABLES};

/// A 2-D table of arena offsets.
///
/// Entries are positions, not references: they stay meaningful only as long
/// as the arena they were computed for is not reallocated. The store clears
/// and recomputes the whole index on every build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIndex {
    offsets: Vec<Option<usize>>,
}

impl TableIndex {
    /// Create an empty index covering [`MAX_MIP_LEVELS`] × [`MAX_TABLES`].
    pub fn new() -> Self {
        Self {
            offsets: vec![None; MAX_MIP_LEVELS * MAX_TABLES],
        }
    }

    #[inline]
    fn slot(level: usize, table: usize) -> Option<usize> {
        (level < MAX_MIP_LEVELS && table < MAX_TABLES).then(|| level * MAX_TABLES + table)
    }

    /// Offset registered for `table` at `level`, if any.
    #[inline]
    pub fn get(&self, level: usize, table: usize) -> Option<usize> {
        Self::slot(level, table).and_then(|slot| self.offsets[slot])
    }

    /// Register `offset` for `table` at `level`.
    ///
    /// Panics if the coordinates fall outside the index; callers validate
    /// table counts and lengths before registering.
    pub(crate) fn set(&mut self, level: usize, table: usize, offset: usize) {
        let slot = Self::slot(level, table).unwrap_or_else(|| {
            panic!(
                "table index slot ({}, {}) outside {}x{}",
                level, table, MAX_MIP_LEVELS, MAX_TABLES
            )
        });
        self.offsets[slot] = Some(offset);
    }

    /// Forget every registered offset.
    pub(crate) fn clear(&mut self) {
        self.offsets.fill(None);
    }

    /// Number of tables registered at `level`.
    pub fn registered_at(&self, level: usize) -> usize {
        if level >= MAX_MIP_LEVELS {
            return 0;
        }
        let start = level * MAX_TABLES;
        self.offsets[start..start + MAX_TABLES]
            .iter()
            .filter(|entry| entry.is_some())
            .count()
    }
}

impl Default for TableIndex {
    fn default() -> Self {
        Self::new()
    }
}
