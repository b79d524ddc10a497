//! Swap-buffer channel between driver callback threads and the update loop.
//!
//! Producers append under the lock; the single consumer exchanges the whole
//! buffer for an empty one and processes the batch after releasing the lock.
//! Producer stall is bounded by the exchange, never by consumer-side work.

use parking_lot::Mutex;

const DEFAULT_CAPACITY: usize = 64;

/// Lock-guarded, drain-by-swap event buffer.
///
/// Every value published before a [`drain`](Self::drain) appears in exactly
/// one drained batch, in the order the lock serialized the appends.
#[derive(Debug)]
pub struct SwapChannel<T> {
    pending: Mutex<Vec<T>>,
}

impl<T> SwapChannel<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Producer side. Safe to call concurrently from any number of threads.
    #[inline]
    pub fn publish(&self, value: T) {
        self.pending.lock().push(value);
    }

    /// Publish a batch under a single lock acquisition.
    pub fn publish_all<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.pending.lock().extend(values);
    }

    /// Consumer side. Takes everything published so far.
    pub fn drain(&self) -> Vec<T> {
        let mut batch = Vec::new();
        self.drain_into(&mut batch);
        batch
    }

    /// Swap the pending buffer with `batch`.
    ///
    /// `batch` is cleared first, so its allocation is recycled as the next
    /// pending buffer. Call once per update tick with the same scratch vector
    /// to avoid reallocating on the producer side.
    pub fn drain_into(&self, batch: &mut Vec<T>) {
        batch.clear();
        let mut pending = self.pending.lock();
        std::mem::swap(&mut *pending, batch);
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl<T> Default for SwapChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}
