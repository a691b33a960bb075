//! PFDI firmware interface checks.
//!
//! The discovery checks issue calls from the home PE. The self-test
//! check fans out through the rendezvous so every PE exercises its own
//! firmware path, and it only runs once version discovery has passed.

use crate::catalog::ids::{RuleId, TestEntryId};
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;
use crate::pe::board::PeVerdict;
use crate::pe::rendezvous::reduce_slots;
use crate::pe::results::SharedResults;
use crate::platform::pfdi::{self, PfdiRequest, function, unpack_version};

const SELF_TEST_CHECKPOINT: u32 = 1;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Pfd001, pfd001);
    registry.register(TestEntryId::Pfd002, pfd002);
    registry.register(TestEntryId::Pfd003, pfd003);
    registry.register(TestEntryId::Pfd004, pfd004);
    registry.register(TestEntryId::Pfd005, pfd005);
    registry.register(TestEntryId::Pfd006, pfd006);
}

fn pfd001(ctx: &TestContext<'_>) -> TestStatus {
    let home = ctx.platform.current_pe();
    let ret = ctx.pfdi(home, PfdiRequest::new(function::VERSION));
    if !ret.is_success() {
        return TestStatus::Fail;
    }

    let (major, _) = unpack_version(ret.x1);
    if major >= 1 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Probes every mandatory function through FEATURES.
fn pfd002(ctx: &TestContext<'_>) -> TestStatus {
    let home = ctx.platform.current_pe();
    for &probed in function::MANDATORY {
        let request = PfdiRequest::with_args(function::FEATURES, probed as u64, 0);
        if !ctx.pfdi(home, request).is_success() {
            return TestStatus::Fail;
        }
    }
    TestStatus::Pass
}

/// Reserved fields of the version reply must read back as zero.
fn pfd003(ctx: &TestContext<'_>) -> TestStatus {
    let home = ctx.platform.current_pe();
    let ret = ctx.pfdi(home, PfdiRequest::new(function::VERSION));
    if ret.is_success() && ret.x2 == 0 && ret.x3 == 0 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Per-PE firmware self test. Every PE invokes PE_TEST_RUN on itself
/// and publishes the return code for the home PE to cross-check.
fn pfd004(ctx: &TestContext<'_>) -> TestStatus {
    if !ctx.prerequisite_met(RuleId::BPfd01) {
        return TestStatus::Skip;
    }

    let pe_count = ctx.pe_count();
    let codes: SharedResults<i64> = SharedResults::new(pe_count);

    let platform = ctx.shared_platform();
    let shared = codes.clone();
    let slots = ctx.rendezvous(move |pe| {
        let ret = platform.pfdi_call(pe, PfdiRequest::new(function::PE_TEST_RUN));
        shared.publish(pe, ret.x0);
        let verdict = if ret.is_success() {
            PeVerdict::pass()
        } else {
            PeVerdict::fail(SELF_TEST_CHECKPOINT)
        };
        platform.board().set(pe, verdict);
    });

    let status = reduce_slots(&slots);
    if status != TestStatus::Pass {
        return status;
    }
    for pe in 0..pe_count {
        if codes.take(pe) != Some(pfdi::SUCCESS) {
            return TestStatus::Fail;
        }
    }
    TestStatus::Pass
}

/// Test identity and result reporting, driven from the home PE.
fn pfd005(ctx: &TestContext<'_>) -> TestStatus {
    let home = ctx.platform.current_pe();

    if !ctx.pfdi(home, PfdiRequest::new(function::PE_TEST_ID)).is_success() {
        return TestStatus::Fail;
    }

    let parts = ctx.pfdi(home, PfdiRequest::new(function::PE_TEST_PART_COUNT));
    if !parts.is_success() {
        return TestStatus::Fail;
    }

    for pe in 0..ctx.pe_count() {
        let ret = ctx.pfdi(pe, PfdiRequest::new(function::PE_TEST_RESULT));
        if !ret.is_success() {
            return TestStatus::Fail;
        }
    }

    if parts.x1 == 0 {
        TestStatus::Warn
    } else {
        TestStatus::Pass
    }
}

/// FORCE_ERROR is optional; where implemented it must echo the
/// requested error token back.
fn pfd006(ctx: &TestContext<'_>) -> TestStatus {
    let home = ctx.platform.current_pe();

    let probe = PfdiRequest::with_args(function::FEATURES, function::FORCE_ERROR as u64, 0);
    if !ctx.pfdi(home, probe).is_success() {
        return TestStatus::Skip;
    }

    let token = 0xACE5_u64;
    let ret = ctx.pfdi(home, PfdiRequest::with_args(function::FORCE_ERROR, token, 0));
    if ret.is_success() && ret.x1 == token {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}
