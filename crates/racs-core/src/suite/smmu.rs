//! SMMU checks.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Smu001, smu001);
    registry.register(TestEntryId::Smu002, smu002);
}

fn smu001(ctx: &TestContext<'_>) -> TestStatus {
    let Some(smmu) = &ctx.description().smmu else {
        return TestStatus::Skip;
    };
    if smmu.version_major >= 3 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

fn smu002(ctx: &TestContext<'_>) -> TestStatus {
    let Some(smmu) = &ctx.description().smmu else {
        return TestStatus::Skip;
    };
    if smmu.stage2 {
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
    fn smmu_version_gate() {
        let mut profile = builders::profile(PlatformKind::Baremetal, 2);
        assert_eq!(check(profile.clone(), smu001), TestStatus::Pass);

        if let Some(smmu) = &mut profile.smmu {
            smmu.version_major = 2;
        }
        assert_eq!(check(profile.clone(), smu001), TestStatus::Fail);

        profile.smmu = None;
        assert_eq!(check(profile, smu001), TestStatus::Skip);
    }

    #[test]
    fn stage2_translation_gate() {
        let mut profile = builders::profile(PlatformKind::Baremetal, 2);
        assert_eq!(check(profile.clone(), smu002), TestStatus::Pass);

        if let Some(smmu) = &mut profile.smmu {
            smmu.stage2 = false;
        }
        assert_eq!(check(profile.clone(), smu002), TestStatus::Fail);

        profile.smmu = None;
        assert_eq!(check(profile, smu002), TestStatus::Skip);
    }
}
