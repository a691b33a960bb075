use serde::{Deserialize, Serialize};

/// Terminal outcome of one rule or one payload invocation.
///
/// The declaration order is the aggregation order: later variants are
/// worse. Merging N sub-results takes the maximum, so any FAIL among
/// sub-results drags the aggregate to at least FAIL, while an all-PASS
/// set stays PASS.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Pass,
    Warn,
    Skip,
    PartialCoverage,
    Fail,
    NotSupportedOnPlatform,
    NotImplemented,
}

impl TestStatus {
    /// Console wording used by the text report.
    pub fn console_label(self) -> &'static str {
        match self {
            TestStatus::Pass => "PASSED",
            TestStatus::Warn => "WARNING",
            TestStatus::Skip => "SKIPPED",
            TestStatus::PartialCoverage => "PASSED (*PARTIAL)",
            TestStatus::Fail => "FAILED",
            TestStatus::NotSupportedOnPlatform => "NOT TESTED (PLATFORM NOT SUPPORTED)",
            TestStatus::NotImplemented => "NOT TESTED (NOT IMPLEMENTED)",
        }
    }

    /// True for the two outcomes that mean "could not be exercised on
    /// this platform/build" rather than "exercised and judged".
    pub fn is_coverage_gap(self) -> bool {
        matches!(
            self,
            TestStatus::NotSupportedOnPlatform | TestStatus::NotImplemented
        )
    }
}

/// Worst-of-N merge. `None` means nothing was folded (no sub-result ran).
pub fn worst_of<I: IntoIterator<Item = TestStatus>>(statuses: I) -> Option<TestStatus> {
    statuses.into_iter().max()
}

/// Fold one more sub-result into a running aggregate.
pub fn fold_worst(aggregate: Option<TestStatus>, next: TestStatus) -> Option<TestStatus> {
    Some(match aggregate {
        Some(current) => current.max(next),
        None => next,
    })
}
