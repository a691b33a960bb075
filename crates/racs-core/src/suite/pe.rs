//! PE checks.
//!
//! The symmetry and responsiveness checks run on every PE through the
//! rendezvous; the rest read the machine description from the home PE.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;
use crate::pe::board::PeVerdict;
use crate::pe::rendezvous::reduce_slots;
use crate::pe::results::SharedResults;

/// Client platforms cap out well below server core counts.
const CLIENT_PE_LIMIT: u32 = 64;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Pe001, pe001);
    registry.register(TestEntryId::Pe002, pe002);
    registry.register(TestEntryId::Pe003, pe003);
    registry.register(TestEntryId::Pe004, pe004);
    registry.register(TestEntryId::Spe001, spe001);
    registry.register(TestEntryId::Spe002, spe002);
    registry.register(TestEntryId::Spe003, spe003);
    registry.register(TestEntryId::Spe004, spe004);
    registry.register(TestEntryId::Ppe001, ppe001);
}

/// Every PE publishes its revision and cache line size; the home PE
/// then checks the samples agree. A PE that never reports fails the
/// rendezvous itself.
fn pe001(ctx: &TestContext<'_>) -> TestStatus {
    let pe_count = ctx.pe_count();
    let results: SharedResults<(u32, u32)> = SharedResults::new(pe_count);

    let platform = ctx.shared_platform();
    let shared = results.clone();
    let slots = ctx.rendezvous(move |pe| {
        let info = platform.description().pe(pe);
        shared.publish(pe, (info.revision, info.cache_line_bytes));
        platform.board().set(pe, PeVerdict::pass());
    });

    let rendezvous_status = reduce_slots(&slots);
    if rendezvous_status != TestStatus::Pass {
        return rendezvous_status;
    }

    let Some(baseline) = results.take(0) else {
        return TestStatus::Fail;
    };
    for pe in 1..pe_count {
        if results.take(pe) != Some(baseline) {
            return TestStatus::Fail;
        }
    }
    TestStatus::Pass
}

fn pe002(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().pes.iter().all(|pe| pe.aa64) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Crypto must be uniform: a mixed configuration is worth flagging
/// even though some crypto exists.
fn pe003(ctx: &TestContext<'_>) -> TestStatus {
    let with_crypto = ctx
        .description()
        .pes
        .iter()
        .filter(|pe| pe.crypto)
        .count();
    let total = ctx.description().pes.len();

    if with_crypto == total {
        TestStatus::Pass
    } else if with_crypto > 0 {
        TestStatus::Warn
    } else {
        TestStatus::Fail
    }
}

fn pe004(ctx: &TestContext<'_>) -> TestStatus {
    let pes = &ctx.description().pes;
    let mut ids: Vec<u64> = pes.iter().map(|pe| pe.id).collect();
    ids.sort_unstable();
    ids.dedup();

    if !pes.is_empty() && ids.len() == pes.len() {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

fn spe001(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().pes.iter().all(|pe| pe.spe) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

fn spe002(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().pes.iter().all(|pe| pe.brbe) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Dispatch smoke check: every PE must accept work and report back.
fn spe003(ctx: &TestContext<'_>) -> TestStatus {
    let platform = ctx.shared_platform();
    let slots = ctx.rendezvous(move |pe| {
        platform.board().set(pe, PeVerdict::pass());
    });
    reduce_slots(&slots)
}

/// Future requirement: hardware without it skips rather than fails.
fn spe004(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().pes.iter().all(|pe| pe.mte) {
        TestStatus::Pass
    } else {
        TestStatus::Skip
    }
}

fn ppe001(ctx: &TestContext<'_>) -> TestStatus {
    let count = ctx.pe_count();
    if count >= 1 && count <= CLIENT_PE_LIMIT {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}
