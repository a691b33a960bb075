//! PMU checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

const RECOMMENDED_COUNTERS: u32 = 4;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Pmu001, pmu001);
    registry.register(TestEntryId::Spm001, spm001);
}

fn pmu001(ctx: &TestContext<'_>) -> TestStatus {
    match ctx.description().pmu.counters {
        0 => TestStatus::Fail,
        n if n < RECOMMENDED_COUNTERS => TestStatus::Warn,
        _ => TestStatus::Pass,
    }
}

fn spm001(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().pmu.extended {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}
