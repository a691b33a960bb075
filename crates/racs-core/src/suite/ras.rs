//! RAS checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Ras001, ras001);
    registry.register(TestEntryId::Sra001, sra001);
}

/// RAS nodes must exist and every PE should implement the extension.
/// A platform that wires the nodes but leaves some PEs out gets a
/// warning rather than a failure since errors remain detectable.
fn ras001(ctx: &TestContext<'_>) -> TestStatus {
    let description = ctx.description();
    let Some(ras) = &description.ras else {
        return TestStatus::Skip;
    };
    if ras.node_count == 0 {
        return TestStatus::Fail;
    }
    if description.pes.iter().any(|pe| !pe.ras_ext) {
        TestStatus::Warn
    } else {
        TestStatus::Pass
    }
}

fn sra001(ctx: &TestContext<'_>) -> TestStatus {
    let Some(ras) = &ctx.description().ras else {
        return TestStatus::Skip;
    };
    if ras.fault_injection {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}
