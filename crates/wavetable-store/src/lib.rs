//! # wavetable-store
//!
//! Decodes raw wavetable payloads into mip-mapped sample tables ready for
//! real-time oscillator playback.
//!
//! ## Overview
//!
//! A [`WavetableStore`] owns two parallel flat arenas:
//!
//! ```text
//! float arena  │ t0 │ t1 │ ... │ level 1 stubs │ ...
//! fixed arena  │ g t0 g │ g t1 g │ ...            g = wrap guard samples
//! ```
//!
//! [`WavetableStore::build`] sizes the arenas with [`required_size`],
//! decodes 16-bit integer or 32-bit float samples into both representations
//! and pads each fixed-point table with wrap-around guard samples so an
//! interpolator can read past either edge without bounds checks.
//!
//! ## Example
//!
//! ```rust
//! use wavetable_store::{WavetableFlags, WavetableHeader, WavetableStore};
//!
//! let header = WavetableHeader::new(WavetableFlags::empty(), 1, 4);
//! let payload: Vec<u8> = [0.0f32, 1.0, 0.0, -1.0]
//!     .iter()
//!     .flat_map(|s| s.to_le_bytes())
//!     .collect();
//!
//! let mut store = WavetableStore::new();
//! store.build(&header, &payload, true)?;
//!
//! assert_eq!(store.float_table(0, 0), Some(&[0.0, 1.0, 0.0, -1.0][..]));
//! assert_eq!(store.lookup_i16(0, 0, -1), store.lookup_i16(0, 0, 3));
//! # Ok::<(), wavetable_store::BuildError>(())
//! ```

pub mod convert;
pub mod error;
pub mod handoff;
pub mod header;
pub mod layout;
pub mod store;
pub mod table_index;
pub mod validation;

pub use error::BuildError;
pub use header::{split_wavetable, ByteOrder, WavetableFlags, WavetableHeader, HEADER_LEN};
pub use layout::{checked_required_size, index_of, required_size};
pub use store::WavetableStore;
pub use validation::{ValidationError, ValidationErrorCode};
