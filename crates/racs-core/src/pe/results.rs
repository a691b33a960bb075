use std::sync::{Arc, Mutex};

/// Slot-per-PE result buffer shared between the home PE and worker PEs.
///
/// Convention carried over from the status board: a worker writes only
/// the slot matching its own PE index, the home PE collects every slot
/// once the rendezvous has settled. Slots are individually synchronized,
/// which is what lets the reader trust a value written by another PE.
///
/// The buffer itself is reference counted; once the home PE and all
/// workers drop their handles the storage is released, on every exit
/// path including timeouts. `handle_count` exposes the live count so
/// leak checks can observe it.
pub struct SharedResults<T> {
    slots: Arc<Vec<Mutex<Option<T>>>>,
}

impl<T> Clone for SharedResults<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<T> SharedResults<T> {
    pub fn new(pe_count: u32) -> Self {
        let slots = (0..pe_count).map(|_| Mutex::new(None)).collect();
        Self {
            slots: Arc::new(slots),
        }
    }

    pub fn pe_count(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Write this PE's slot. A second publish to the same slot replaces
    /// the first; the collection pass sees only the latest value.
    pub fn publish(&self, pe: u32, value: T) {
        let mut slot = self.slots[pe as usize]
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *slot = Some(value);
    }

    /// Collect one slot, leaving it empty. `None` means the owning PE
    /// never published (it timed out or was never dispatched).
    pub fn take(&self, pe: u32) -> Option<T> {
        let mut slot = self.slots[pe as usize]
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        slot.take()
    }

    /// Number of live handles to the backing storage.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn publish_and_take_round_trip_per_slot() {
        let results = SharedResults::<u64>::new(3);
        results.publish(0, 10);
        results.publish(2, 30);

        assert_eq!(results.take(0), Some(10));
        assert_eq!(results.take(1), None);
        assert_eq!(results.take(2), Some(30));
    }

    #[test]
    fn take_drains_the_slot() {
        let results = SharedResults::<u32>::new(1);
        results.publish(0, 7);

        assert_eq!(results.take(0), Some(7));
        assert_eq!(results.take(0), None);
    }

    #[test]
    fn writes_from_other_threads_are_visible_after_join() {
        let results = SharedResults::<u32>::new(4);

        let handles: Vec<_> = (1..4)
            .map(|pe| {
                let shared = results.clone();
                thread::spawn(move || shared.publish(pe, pe * 100))
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread");
        }

        assert_eq!(results.take(1), Some(100));
        assert_eq!(results.take(2), Some(200));
        assert_eq!(results.take(3), Some(300));
    }

    #[test]
    fn handle_count_tracks_clones() {
        let results = SharedResults::<u8>::new(2);
        assert_eq!(results.handle_count(), 1);

        let extra = results.clone();
        assert_eq!(results.handle_count(), 2);

        drop(extra);
        assert_eq!(results.handle_count(), 1);
    }
}
