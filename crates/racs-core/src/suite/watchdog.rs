//! Watchdog checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Wd001, wd001);
    registry.register(TestEntryId::Wd002, wd002);
    registry.register(TestEntryId::Pwd001, pwd001);
}

fn wd001(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().watchdog.count >= 1 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Dual-signal behaviour only applies where a watchdog exists at all;
/// its absence is already wd001's failure.
fn wd002(ctx: &TestContext<'_>) -> TestStatus {
    let watchdog = &ctx.description().watchdog;
    if watchdog.count == 0 {
        TestStatus::Skip
    } else if watchdog.dual_signal {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Client platforms expect exactly one watchdog; extras are legal but
/// unusual enough to flag.
fn pwd001(ctx: &TestContext<'_>) -> TestStatus {
    match ctx.description().watchdog.count {
        0 => TestStatus::Fail,
        1 => TestStatus::Pass,
        _ => TestStatus::Warn,
    }
}
