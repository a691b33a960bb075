use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::exec::status::TestStatus;

/// Terminal result a PE posts for its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeVerdict {
    pub status: TestStatus,
    /// Payload-defined progress marker identifying where a check
    /// stopped; 0 when unused.
    pub checkpoint: u32,
}

impl PeVerdict {
    pub fn pass() -> Self {
        Self {
            status: TestStatus::Pass,
            checkpoint: 0,
        }
    }

    pub fn fail(checkpoint: u32) -> Self {
        Self {
            status: TestStatus::Fail,
            checkpoint,
        }
    }

    pub fn skip(checkpoint: u32) -> Self {
        Self {
            status: TestStatus::Skip,
            checkpoint,
        }
    }

    pub fn warn(checkpoint: u32) -> Self {
        Self {
            status: TestStatus::Warn,
            checkpoint,
        }
    }
}

/// One PE's slot state: pending until the PE posts a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeSlot {
    Pending,
    Ready(PeVerdict),
}

impl PeSlot {
    pub fn is_pending(self) -> bool {
        matches!(self, PeSlot::Pending)
    }
}

struct Cell {
    state: Mutex<PeSlot>,
    changed: Condvar,
}

/// Per-PE status slots shared between the home PE and the worker PEs.
///
/// Each PE writes only the slot matching its own index; the home PE
/// waits on and reads any slot. The wait is bounded: a slot that never
/// leaves `Pending` stalls its caller for at most the given timeout.
pub struct StatusBoard {
    cells: Vec<Cell>,
}

impl StatusBoard {
    pub fn new(pe_count: u32) -> Self {
        let cells = (0..pe_count)
            .map(|_| Cell {
                state: Mutex::new(PeSlot::Pending),
                changed: Condvar::new(),
            })
            .collect();
        Self { cells }
    }

    pub fn pe_count(&self) -> u32 {
        self.cells.len() as u32
    }

    fn lock(&self, pe: u32) -> MutexGuard<'_, PeSlot> {
        let cell = &self.cells[pe as usize];
        cell.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Put every slot back to `Pending` before a new broadcast.
    pub fn reset(&self) {
        for pe in 0..self.pe_count() {
            *self.lock(pe) = PeSlot::Pending;
        }
    }

    pub fn set(&self, pe: u32, verdict: PeVerdict) {
        *self.lock(pe) = PeSlot::Ready(verdict);
        self.cells[pe as usize].changed.notify_all();
    }

    pub fn get(&self, pe: u32) -> PeSlot {
        *self.lock(pe)
    }

    /// Block until the slot leaves `Pending` or the timeout elapses,
    /// returning whatever state the slot holds at that point. The
    /// caller decides what a still-pending slot means.
    pub fn wait_while_pending(&self, pe: u32, timeout: Duration) -> PeSlot {
        let cell = &self.cells[pe as usize];
        let guard = self.lock(pe);
        let (guard, _outcome) = cell
            .changed
            .wait_timeout_while(guard, timeout, |slot| slot.is_pending())
            .unwrap_or_else(|e| e.into_inner());
        *guard
    }
}
