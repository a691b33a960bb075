//! Run-wide state and knobs, threaded explicitly through the executor
//! instead of living in globals.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use crate::catalog::ids::RuleId;
use crate::pe::rendezvous::{DEFAULT_WAIT_BOUND, SETTLE_DELAY};
use crate::platform::PlatformKind;

use super::status::TestStatus;

/// Knobs that shape one whole run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Bound on how long the home PE waits for one remote PE.
    pub wait_bound: Duration,
    /// Settling delay before rendezvous slots are collected.
    pub settle_delay: Duration,
    /// Whether rules with no implementation on this platform appear in
    /// results at all. OS-hosted runs would drown in them, so the
    /// Linux default drops them silently.
    pub report_unsupported: bool,
}

impl RunOptions {
    pub fn for_platform(kind: PlatformKind) -> Self {
        Self {
            wait_bound: DEFAULT_WAIT_BOUND,
            settle_delay: SETTLE_DELAY,
            report_unsupported: !matches!(kind, PlatformKind::Linux),
        }
    }

    /// Scale the rendezvous wait bound for slow machines. A zero
    /// multiplier reads as one.
    pub fn with_timeout_multiplier(mut self, multiplier: u32) -> Self {
        self.wait_bound *= multiplier.max(1);
        self
    }
}

/// Accumulated outcome of a run: the latest recorded status per rule,
/// plus catalog defects noticed along the way.
#[derive(Debug, Default)]
pub struct RunContext {
    results: BTreeMap<RuleId, TestStatus>,
    defects: Vec<String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rule: RuleId, status: TestStatus) {
        self.results.insert(rule, status);
    }

    pub fn status_of(&self, rule: RuleId) -> Option<TestStatus> {
        self.results.get(&rule).copied()
    }

    pub fn results(&self) -> &BTreeMap<RuleId, TestStatus> {
        &self.results
    }

    /// Note an internal catalog inconsistency. Defects never abort the
    /// run; they surface in the report.
    pub fn note_defect(&mut self, message: String) {
        warn!(defect = %message, "catalog defect");
        self.defects.push(message);
    }

    pub fn defects(&self) -> &[String] {
        &self.defects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_runs_drop_unsupported_rules_by_default() {
        assert!(RunOptions::for_platform(PlatformKind::Uefi).report_unsupported);
        assert!(RunOptions::for_platform(PlatformKind::Baremetal).report_unsupported);
        assert!(!RunOptions::for_platform(PlatformKind::Linux).report_unsupported);
    }

    #[test]
    fn timeout_multiplier_scales_the_wait_bound() {
        let options = RunOptions::for_platform(PlatformKind::Uefi).with_timeout_multiplier(3);
        assert_eq!(options.wait_bound, DEFAULT_WAIT_BOUND * 3);

        let options = RunOptions::for_platform(PlatformKind::Uefi).with_timeout_multiplier(0);
        assert_eq!(options.wait_bound, DEFAULT_WAIT_BOUND);
    }

    #[test]
    fn records_keep_the_latest_status() {
        let mut ctx = RunContext::new();
        ctx.record(RuleId::BPe01, TestStatus::Fail);
        ctx.record(RuleId::BPe01, TestStatus::Pass);

        assert_eq!(ctx.status_of(RuleId::BPe01), Some(TestStatus::Pass));
        assert_eq!(ctx.status_of(RuleId::BPe02), None);
    }

    #[test]
    fn defects_accumulate_in_order() {
        let mut ctx = RunContext::new();
        ctx.note_defect("first".to_string());
        ctx.note_defect("second".to_string());
        assert_eq!(ctx.defects(), ["first", "second"]);
    }
}
