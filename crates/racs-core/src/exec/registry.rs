//! Test entry registration and the context payloads run against.
//!
//! A payload is anything implementing [`TestEntry`]; the registry maps
//! entry ids to payloads at startup. Looking up an id nothing
//! registered is not an error: the rule reads as unsupported on this
//! platform, which is exactly what an absent implementation means.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::ids::{RuleId, TestEntryId};
use crate::pe::board::PeSlot;
use crate::pe::rendezvous::Rendezvous;
use crate::platform::pfdi::{PfdiRequest, PfdiReturn};
use crate::platform::profile::PlatformProfile;
use crate::platform::{Platform, PlatformKind};

use super::context::{RunContext, RunOptions};
use super::status::{TestStatus, fold_worst};

/// What one payload invocation sees: the platform, the registry (for
/// composite payloads), and the statuses recorded so far.
pub struct TestContext<'run> {
    pub platform: &'run Arc<dyn Platform>,
    pub options: &'run RunOptions,
    pub registry: &'run EntryRegistry,
    pub recorded: &'run BTreeMap<RuleId, TestStatus>,
}

impl<'run> TestContext<'run> {
    pub fn new(
        platform: &'run Arc<dyn Platform>,
        options: &'run RunOptions,
        registry: &'run EntryRegistry,
        ctx: &'run RunContext,
    ) -> Self {
        Self {
            platform,
            options,
            registry,
            recorded: ctx.results(),
        }
    }

    pub fn description(&self) -> &PlatformProfile {
        self.platform.description()
    }

    pub fn kind(&self) -> PlatformKind {
        self.platform.kind()
    }

    pub fn pe_count(&self) -> u32 {
        self.platform.pe_count()
    }

    pub fn pfdi(&self, pe: u32, request: PfdiRequest) -> PfdiReturn {
        self.platform.pfdi_call(pe, request)
    }

    /// Owned platform handle for workers that outlive the borrow.
    pub fn shared_platform(&self) -> Arc<dyn Platform> {
        Arc::clone(self.platform)
    }

    /// Run `worker` on every PE and collect the slots, using the
    /// run-wide wait bound and settle delay.
    pub fn rendezvous<F>(&self, worker: F) -> Vec<PeSlot>
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        Rendezvous::new(self.platform.as_ref())
            .with_wait_bound(self.options.wait_bound)
            .with_settle_delay(self.options.settle_delay)
            .run_on_all_pes(worker)
    }

    /// True when `rule` already ran in this run and passed.
    pub fn prerequisite_met(&self, rule: RuleId) -> bool {
        matches!(self.recorded.get(&rule), Some(TestStatus::Pass))
    }

    /// Run a registered entry by id. An unregistered id reads as a
    /// platform support gap.
    pub fn run_entry(&self, entry: TestEntryId) -> TestStatus {
        match self.registry.lookup(entry) {
            Some(payload) => payload.run(self),
            None => TestStatus::NotSupportedOnPlatform,
        }
    }
}

/// One runnable payload.
pub trait TestEntry: Send + Sync {
    fn run(&self, ctx: &TestContext<'_>) -> TestStatus;
}

impl<F> TestEntry for F
where
    F: Fn(&TestContext<'_>) -> TestStatus + Send + Sync,
{
    fn run(&self, ctx: &TestContext<'_>) -> TestStatus {
        self(ctx)
    }
}

/// Entry id to payload map. Registration replaces silently, so a
/// harness can stub out individual payloads.
#[derive(Default)]
pub struct EntryRegistry {
    entries: BTreeMap<TestEntryId, Box<dyn TestEntry>>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: TestEntry + 'static>(&mut self, id: TestEntryId, entry: E) {
        self.entries.insert(id, Box::new(entry));
    }

    pub fn lookup(&self, id: TestEntryId) -> Option<&dyn TestEntry> {
        self.entries.get(&id).map(|entry| entry.as_ref())
    }

    pub fn contains(&self, id: TestEntryId) -> bool {
        self.entries.contains_key(&id)
    }
}

/// Runs a fixed list of registered entries and reports the worst
/// sub-status.
pub struct CompositeEntry {
    parts: &'static [TestEntryId],
}

impl CompositeEntry {
    pub fn new(parts: &'static [TestEntryId]) -> Self {
        Self { parts }
    }
}

impl TestEntry for CompositeEntry {
    fn run(&self, ctx: &TestContext<'_>) -> TestStatus {
        let mut worst: Option<TestStatus> = None;
        for &part in self.parts {
            let status = ctx.run_entry(part);
            worst = fold_worst(worst, status);
        }
        worst.unwrap_or(TestStatus::NotImplemented)
    }
}

/// Pairs a static configuration check with an exerciser-driven check
/// of the same requirement. A side that skips is a coverage gap, not
/// an outcome: if everything that did run passed, the pair reports
/// partial coverage. Both sides skipping skips the pair.
pub struct StaticExerciserEntry {
    pub static_part: TestEntryId,
    pub exerciser_part: TestEntryId,
}

impl TestEntry for StaticExerciserEntry {
    fn run(&self, ctx: &TestContext<'_>) -> TestStatus {
        let static_status = ctx.run_entry(self.static_part);
        let exerciser_status = ctx.run_entry(self.exerciser_part);

        let mut gap = false;
        let mut folded = None;
        for status in [static_status, exerciser_status] {
            if status == TestStatus::Skip {
                gap = true;
            } else {
                folded = fold_worst(folded, status);
            }
        }

        match folded {
            Some(TestStatus::Pass) if gap => TestStatus::PartialCoverage,
            Some(status) => status,
            None => TestStatus::Skip,
        }
    }
}
