//! MPAM checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Mpa000, mpa000);
    registry.register(TestEntryId::Mpa001, mpa001);
}

/// Precheck: fails when the platform has no MPAM fabric at all, which
/// turns the enclosing requirement into a skip instead of a failure
/// storm.
fn mpa000(ctx: &TestContext<'_>) -> TestStatus {
    match &ctx.description().mpam {
        Some(mpam) if mpam.msc_count > 0 => TestStatus::Pass,
        _ => TestStatus::Fail,
    }
}

fn mpa001(ctx: &TestContext<'_>) -> TestStatus {
    let description = ctx.description();
    let Some(mpam) = &description.mpam else {
        return TestStatus::Skip;
    };
    if mpam.msc_count == 0 {
        return TestStatus::Skip;
    }
    if description.pes.iter().all(|pe| pe.mpam_regs) {
        TestStatus::Pass
    } else {
        TestStatus::Fail
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
    fn precheck_fails_without_an_mpam_fabric() {
        let mut profile = builders::profile(PlatformKind::Uefi, 2);
        assert_eq!(check(profile.clone(), mpa000), TestStatus::Pass);

        if let Some(mpam) = &mut profile.mpam {
            mpam.msc_count = 0;
        }
        assert_eq!(check(profile.clone(), mpa000), TestStatus::Fail);

        profile.mpam = None;
        assert_eq!(check(profile, mpa000), TestStatus::Fail);
    }

    #[test]
    fn register_check_skips_without_mscs_and_fails_on_bare_pes() {
        let mut profile = builders::profile(PlatformKind::Uefi, 2);
        assert_eq!(check(profile.clone(), mpa001), TestStatus::Pass);

        profile.pes[0].mpam_regs = false;
        assert_eq!(check(profile.clone(), mpa001), TestStatus::Fail);

        if let Some(mpam) = &mut profile.mpam {
            mpam.msc_count = 0;
        }
        assert_eq!(check(profile.clone(), mpa001), TestStatus::Skip);

        profile.mpam = None;
        assert_eq!(check(profile, mpa001), TestStatus::Skip);
    }
}
