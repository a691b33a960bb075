//! PCIe checks.
//!
//! ECAM coverage pairs a static description check with an exerciser
//! probe so a board whose description omits segment data can still
//! claim partial coverage when the exerciser proves the path.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, StaticExerciserEntry, TestContext};
use crate::exec::status::TestStatus;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Pci001, pci001);
    registry.register(
        TestEntryId::Pci002,
        StaticExerciserEntry {
            static_part: TestEntryId::Pci003,
            exerciser_part: TestEntryId::Pci004,
        },
    );
    registry.register(TestEntryId::Pci003, pci003);
    registry.register(TestEntryId::Pci004, pci004);
}

fn pci001(ctx: &TestContext<'_>) -> TestStatus {
    let Some(pcie) = &ctx.description().pcie else {
        return TestStatus::Skip;
    };
    if pcie.ecam_present && pcie.segments >= 1 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Static half of the ECAM access check.
fn pci003(ctx: &TestContext<'_>) -> TestStatus {
    let Some(pcie) = &ctx.description().pcie else {
        return TestStatus::Skip;
    };
    if pcie.segments == 0 {
        return TestStatus::Skip;
    }
    if pcie.ecam_present {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Exerciser half: only runs where the board carries the plug-in card.
fn pci004(ctx: &TestContext<'_>) -> TestStatus {
    let Some(pcie) = &ctx.description().pcie else {
        return TestStatus::Skip;
    };
    if pcie.exerciser_present {
        TestStatus::Pass
    } else {
        TestStatus::Skip
    }
}
