//! GIC checks.
//!
//! The ITS requirement is split into two parts that fold through a
//! composite entry: presence (relative to PCIe) and version coupling.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{CompositeEntry, EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

const ITS_PARTS: &[TestEntryId] = &[TestEntryId::Gic003, TestEntryId::Gic004];

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Gic001, gic001);
    registry.register(TestEntryId::Gic002, CompositeEntry::new(ITS_PARTS));
    registry.register(TestEntryId::Gic003, gic003);
    registry.register(TestEntryId::Gic004, gic004);
    registry.register(TestEntryId::Ppi000, ppi000);
}

fn gic001(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().gic.version >= 3 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// ITS presence. A platform without PCIe has no MSI producers, so a
/// missing ITS is only a skip there.
fn gic003(ctx: &TestContext<'_>) -> TestStatus {
    let description = ctx.description();
    if description.gic.its_count > 0 {
        TestStatus::Pass
    } else if description.pcie.is_some() {
        TestStatus::Fail
    } else {
        TestStatus::Skip
    }
}

/// GICv4 virtual LPIs require at least one ITS regardless of PCIe.
fn gic004(ctx: &TestContext<'_>) -> TestStatus {
    let gic = &ctx.description().gic;
    if gic.version >= 4 && gic.its_count == 0 {
        TestStatus::Fail
    } else {
        TestStatus::Pass
    }
}

fn ppi000(ctx: &TestContext<'_>) -> TestStatus {
    let gic = &ctx.description().gic;
    if !(16..=31).contains(&gic.el1_timer_ppi) {
        return TestStatus::Fail;
    }
    if gic.watchdog_ws0_ppi == 0 {
        return TestStatus::Warn;
    }
    if !(16..=31).contains(&gic.watchdog_ws0_ppi) {
        return TestStatus::Fail;
    }
    TestStatus::Pass
}
