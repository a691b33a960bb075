//! Memory map checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

const MIN_USABLE_BYTES: u64 = 64 * 1024 * 1024;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Mem001, mem001);
    registry.register(TestEntryId::Mem002, mem002);
}

fn mem001(ctx: &TestContext<'_>) -> TestStatus {
    let regions = &ctx.description().memory;
    if regions.is_empty() {
        return TestStatus::Fail;
    }

    let total: u64 = regions.iter().map(|region| region.size).sum();
    if total < MIN_USABLE_BYTES {
        TestStatus::Warn
    } else {
        TestStatus::Pass
    }
}

/// Regions must not overlap. Zero-sized entries are tolerated but
/// flagged since they usually mean a truncated description.
fn mem002(ctx: &TestContext<'_>) -> TestStatus {
    let mut regions: Vec<(u64, u64)> = ctx
        .description()
        .memory
        .iter()
        .map(|region| (region.base, region.size))
        .collect();
    regions.sort_unstable_by_key(|&(base, _)| base);

    for pair in regions.windows(2) {
        let (base, size) = pair[0];
        let (next_base, _) = pair[1];
        if base.saturating_add(size) > next_base {
            return TestStatus::Fail;
        }
    }

    if regions.iter().any(|&(_, size)| size == 0) {
        TestStatus::Warn
    } else {
        TestStatus::Pass
    }
}
