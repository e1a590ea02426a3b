//! Hand built stores from a control thread to the audio thread.
//!
//! The control side builds a fresh [`WavetableStore`] and publishes it; the
//! audio side swaps it in between blocks and sends the retired store back so
//! it is dropped on the control thread. Both directions are wait-free
//! single-producer/single-consumer ring buffers, so the audio side never
//! locks, allocates or frees.
//!
//! ```rust
//! use wavetable_store::handoff::store_handoff;
//! use wavetable_store::{WavetableFlags, WavetableHeader, WavetableStore};
//!
//! let (mut publisher, mut receiver) = store_handoff(2);
//!
//! // control thread
//! let header = WavetableHeader::new(WavetableFlags::INT16, 1, 4);
//! let mut store = WavetableStore::new();
//! store.build(&header, &[0u8; 8], true).unwrap();
//! publisher.publish(store).unwrap();
//!
//! // audio thread, once per block
//! receiver.refresh();
//! assert_eq!(receiver.current().map(|s| s.table_length()), Some(4));
//! ```

use crate::store::WavetableStore;
use rtrb::{Consumer, Producer, PushError, RingBuffer};

/// Create a connected publisher/receiver pair.
///
/// `depth` is how many published stores may wait for the audio side.
pub fn store_handoff(depth: usize) -> (StorePublisher, StoreReceiver) {
    let depth = depth.max(1);
    let (pending_tx, pending_rx) = RingBuffer::new(depth);
    let (retired_tx, retired_rx) = RingBuffer::new(depth + 1);

    (
        StorePublisher {
            pending: pending_tx,
            retired: retired_rx,
        },
        StoreReceiver {
            pending: pending_rx,
            retired: retired_tx,
            current: None,
        },
    )
}

/// Control-thread end of the handoff.
pub struct StorePublisher {
    pending: Producer<Box<WavetableStore>>,
    retired: Consumer<Box<WavetableStore>>,
}

impl StorePublisher {
    /// Queue a completed store for the audio thread.
    ///
    /// Returns the store back if the queue is full.
    pub fn publish(&mut self, store: WavetableStore) -> Result<(), WavetableStore> {
        self.collect_retired();
        match self.pending.push(Box::new(store)) {
            Ok(()) => Ok(()),
            Err(PushError::Full(store)) => Err(*store),
        }
    }

    /// Drop every store the audio thread has retired. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut collected = 0;
        while let Ok(store) = self.retired.pop() {
            drop(store);
            collected += 1;
        }
        collected
    }
}

/// Audio-thread end of the handoff.
pub struct StoreReceiver {
    pending: Consumer<Box<WavetableStore>>,
    retired: Producer<Box<WavetableStore>>,
    current: Option<Box<WavetableStore>>,
}

impl StoreReceiver {
    /// Swap in the newest published store.
    ///
    /// Returns `true` if the current store changed. A pending store stays
    /// queued while the retire queue is full, so nothing is ever freed here.
    pub fn refresh(&mut self) -> bool {
        let mut swapped = false;

        loop {
            if self.current.is_some() && self.retired.is_full() {
                break;
            }
            let Ok(next) = self.pending.pop() else {
                break;
            };
            if let Some(old) = self.current.replace(next) {
                // Slot checked above
                let _ = self.retired.push(old);
            }
            swapped = true;
        }

        swapped
    }

    /// The store in use, if one has been published.
    #[inline]
    pub fn current(&self) -> Option<&WavetableStore> {
        self.current.as_deref()
    }
}
