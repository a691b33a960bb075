//! Multi-PE rendezvous.
//!
//! Runs one worker on every PE: inline on the home PE, dispatched
//! one-shot to each other PE with an independent bounded wait. A PE
//! that never reports is failed in place and abandoned; there is no
//! retry and no cancellation, and one stalled PE cannot stall the
//! others.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::exec::status::{TestStatus, worst_of};
use crate::platform::Platform;

use super::board::{PeSlot, PeVerdict};

/// Default bound on how long the home PE waits for one remote PE.
pub const DEFAULT_WAIT_BOUND: Duration = Duration::from_millis(150);

/// Fixed delay between the last wait and the collection pass, giving
/// just-late writers time to land before slots are read.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1);

/// Checkpoint recorded when a remote PE never reports.
pub const TIMEOUT_CHECKPOINT: u32 = 0xF;

/// Checkpoint recorded when dispatch to a remote PE is refused.
pub const DISPATCH_CHECKPOINT: u32 = 0xE;

pub struct Rendezvous<'p> {
    platform: &'p dyn Platform,
    wait_bound: Duration,
    settle_delay: Duration,
}

impl<'p> Rendezvous<'p> {
    pub fn new(platform: &'p dyn Platform) -> Self {
        Self {
            platform,
            wait_bound: DEFAULT_WAIT_BOUND,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_wait_bound(mut self, bound: Duration) -> Self {
        self.wait_bound = bound;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Run `worker` once per PE and collect every slot.
    ///
    /// The worker must post a verdict for its own PE to the status
    /// board. The home PE runs first, directly on the calling thread.
    /// Each remote PE is then dispatched to and waited on in turn; a
    /// slot still pending when its wait expires is recorded as FAIL
    /// and the loop moves on. Slots are read only after the settling
    /// delay, so a worker that finishes just past its deadline may
    /// still land its own slot without disturbing any other.
    pub fn run_on_all_pes<F>(&self, worker: F) -> Vec<PeSlot>
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        let platform = self.platform;
        let pe_count = platform.pe_count();
        let home = platform.current_pe();
        let board = platform.board();

        board.reset();

        let worker = Arc::new(worker);
        worker(home);

        for pe in 0..pe_count {
            if pe == home {
                continue;
            }

            let job_worker = Arc::clone(&worker);
            match platform.execute_on_pe(pe, Box::new(move || job_worker(pe))) {
                Ok(()) => {
                    let slot = board.wait_while_pending(pe, self.wait_bound);
                    if slot.is_pending() {
                        warn!(pe, "PE did not report within the wait bound");
                        board.set(pe, PeVerdict::fail(TIMEOUT_CHECKPOINT));
                    }
                }
                Err(err) => {
                    warn!(pe, %err, "dispatch to PE refused");
                    board.set(pe, PeVerdict::fail(DISPATCH_CHECKPOINT));
                }
            }
        }

        platform.settle(self.settle_delay);
        (0..pe_count).map(|pe| board.get(pe)).collect()
    }
}

/// Worst-of reduction over collected slots. A slot that somehow stayed
/// pending counts as FAIL, as does an empty collection.
pub fn reduce_slots(slots: &[PeSlot]) -> TestStatus {
    worst_of(slots.iter().map(|slot| match slot {
        PeSlot::Ready(verdict) => verdict.status,
        PeSlot::Pending => TestStatus::Fail,
    }))
    .unwrap_or(TestStatus::Fail)
}
