//! Generic timer checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

/// Architected bounds on the system counter frequency.
const MIN_COUNTER_HZ: u64 = 10_000_000;
const MAX_COUNTER_HZ: u64 = 400_000_000;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Tim001, tim001);
    registry.register(TestEntryId::Tim002, tim002);
    registry.register(TestEntryId::Tim003, tim003);
}

fn tim001(ctx: &TestContext<'_>) -> TestStatus {
    let freq = ctx.description().timer.counter_freq_hz;
    if (MIN_COUNTER_HZ..=MAX_COUNTER_HZ).contains(&freq) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

fn tim002(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().timer.wakeup_capable {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

/// Future requirement: counter scaling.
fn tim003(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().timer.scaling {
        TestStatus::Pass
    } else {
        TestStatus::Skip
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::exec::context::{RunContext, RunOptions};
    use crate::platform::profile::{PlatformProfile, builders};
    use crate::platform::sim::SimPlatform;
    use crate::platform::{Platform, PlatformKind};

    fn check(
        profile: PlatformProfile,
        payload: impl Fn(&TestContext<'_>) -> TestStatus,
    ) -> TestStatus {
        let kind = profile.kind;
        let platform: Arc<dyn Platform> = Arc::new(SimPlatform::new(profile).unwrap());
        let options = RunOptions::for_platform(kind);
        let registry = EntryRegistry::new();
        let ctx = RunContext::new();
        let tcx = TestContext::new(&platform, &options, &registry, &ctx);
        payload(&tcx)
    }

    #[test]
    fn counter_frequency_must_sit_in_the_architected_band() {
        let mut profile = builders::profile(PlatformKind::Uefi, 1);
        assert_eq!(check(profile.clone(), tim001), TestStatus::Pass);

        profile.timer.counter_freq_hz = 1_000_000;
        assert_eq!(check(profile.clone(), tim001), TestStatus::Fail);

        profile.timer.counter_freq_hz = 500_000_000;
        assert_eq!(check(profile, tim001), TestStatus::Fail);
    }

    #[test]
    fn wakeup_timer_is_mandatory() {
        let mut profile = builders::profile(PlatformKind::Uefi, 1);
        assert_eq!(check(profile.clone(), tim002), TestStatus::Pass);

        profile.timer.wakeup_capable = false;
        assert_eq!(check(profile, tim002), TestStatus::Fail);
    }

    #[test]
    fn counter_scaling_skips_until_hardware_arrives() {
        let mut profile = builders::profile(PlatformKind::Uefi, 1);
        assert_eq!(check(profile.clone(), tim003), TestStatus::Skip);

        profile.timer.scaling = true;
        assert_eq!(check(profile, tim003), TestStatus::Pass);
    }
}
