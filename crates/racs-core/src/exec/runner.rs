//! Rule execution.
//!
//! Each rule in the run list goes through the same path: a support
//! check against the capability table, then either a direct payload
//! invocation for base rules or an expansion walk for aliases. An
//! alias folds its base outcomes worst-first, except that support gaps
//! are recorded but never folded; a clean pass over a gap reports
//! partial coverage instead.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::alias::expansion;
use crate::catalog::ids::RuleId;
use crate::catalog::table::{RuleDescriptor, RuleKind, descriptor};
use crate::platform::Platform;
use crate::select::Selections;

use super::context::{RunContext, RunOptions};
use super::registry::{EntryRegistry, TestContext};
use super::status::{TestStatus, fold_worst};

/// Outcome of one base rule invocation inside an alias run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRecord {
    pub rule: RuleId,
    pub status: TestStatus,
}

/// Final outcome of one run-list slot.
#[derive(Debug, Clone)]
pub struct RuleRecord {
    pub rule: RuleId,
    /// `None` when the rule was abandoned without a verdict: a catalog
    /// defect, or an alias whose whole expansion was excluded.
    pub status: Option<TestStatus>,
    /// Base outcomes behind an alias run, in expansion order.
    pub bases: Vec<BaseRecord>,
}

pub struct RuleRunner<'run> {
    platform: &'run Arc<dyn Platform>,
    registry: &'run EntryRegistry,
    selections: &'run Selections,
    options: RunOptions,
}

impl<'run> RuleRunner<'run> {
    pub fn new(
        platform: &'run Arc<dyn Platform>,
        registry: &'run EntryRegistry,
        selections: &'run Selections,
        options: RunOptions,
    ) -> Self {
        Self {
            platform,
            registry,
            selections,
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run every rule in `rules`, in catalog order regardless of input
    /// order. Duplicate entries run again. Returns one record per rule
    /// that produced a reportable outcome.
    pub fn run_rules(&self, rules: &[RuleId], ctx: &mut RunContext) -> Vec<RuleRecord> {
        let mut ordered = rules.to_vec();
        ordered.sort();

        let mut records = Vec::with_capacity(ordered.len());
        for rule in ordered {
            if let Some(record) = self.run_one(rule, ctx) {
                records.push(record);
            }
        }
        records
    }

    /// Run a single rule. `None` means the rule left no trace in the
    /// results: unsupported on a platform that drops such rules.
    pub fn run_one(&self, rule: RuleId, ctx: &mut RunContext) -> Option<RuleRecord> {
        let desc = descriptor(rule);
        info!(rule = %rule, module = %desc.module, "running rule");

        if let Some(status) = self.support_gap(desc) {
            if !self.options.report_unsupported {
                debug!(rule = %rule, "no implementation on this platform; dropped");
                return None;
            }
            ctx.record(rule, status);
            return Some(RuleRecord {
                rule,
                status: Some(status),
                bases: Vec::new(),
            });
        }

        match desc.kind {
            RuleKind::Base => self.run_base(rule, desc, ctx),
            RuleKind::Alias => self.run_alias(rule, ctx),
        }
    }

    /// Support check against the capability table. `None` means the
    /// rule can run here.
    fn support_gap(&self, desc: &RuleDescriptor) -> Option<TestStatus> {
        if desc.platforms.is_empty() {
            Some(TestStatus::NotImplemented)
        } else if !desc.platforms.contains(self.platform.kind()) {
            Some(TestStatus::NotSupportedOnPlatform)
        } else {
            None
        }
    }

    fn run_base(
        &self,
        rule: RuleId,
        desc: &RuleDescriptor,
        ctx: &mut RunContext,
    ) -> Option<RuleRecord> {
        let Some(entry) = desc.entry else {
            ctx.note_defect(format!("base rule {rule} names no payload entry"));
            return Some(RuleRecord {
                rule,
                status: None,
                bases: Vec::new(),
            });
        };

        let status = self.invoke(entry, ctx);
        ctx.record(rule, status);
        Some(RuleRecord {
            rule,
            status: Some(status),
            bases: Vec::new(),
        })
    }

    fn run_alias(&self, rule: RuleId, ctx: &mut RunContext) -> Option<RuleRecord> {
        let Some(exp) = expansion(rule) else {
            // The table says alias but no expansion exists. The rule is
            // abandoned; its slot stays unknown.
            ctx.note_defect(format!("alias rule {rule} has no expansion"));
            return Some(RuleRecord {
                rule,
                status: None,
                bases: Vec::new(),
            });
        };

        if let Some(gate) = exp.precheck {
            let gate_status = self.invoke(gate, ctx);
            if gate_status == TestStatus::Fail {
                debug!(rule = %rule, "precheck failed; alias skipped");
                ctx.record(rule, TestStatus::Skip);
                return Some(RuleRecord {
                    rule,
                    status: Some(TestStatus::Skip),
                    bases: Vec::new(),
                });
            }
        }

        let mut aggregate: Option<TestStatus> = None;
        let mut gap = false;
        let mut bases = Vec::new();

        for &base in exp.bases {
            let base_desc = descriptor(base);
            if self.selections.skipped(base, base_desc.module) {
                debug!(rule = %rule, base = %base, "base rule excluded by caller");
                continue;
            }

            let status = self.alias_base_status(base_desc, ctx);
            bases.push(BaseRecord { rule: base, status });
            ctx.record(base, status);

            if status.is_coverage_gap() {
                // Recorded for visibility, never folded into the verdict.
                gap = true;
            } else {
                aggregate = fold_worst(aggregate, status);
            }
        }

        match aggregate {
            Some(folded) => {
                let status = if gap && folded == TestStatus::Pass {
                    TestStatus::PartialCoverage
                } else {
                    folded
                };
                ctx.record(rule, status);
                Some(RuleRecord {
                    rule,
                    status: Some(status),
                    bases,
                })
            }
            // Nothing ran to completion; there is no honest verdict.
            None => Some(RuleRecord {
                rule,
                status: None,
                bases,
            }),
        }
    }

    /// Status of one base rule run under an alias. Support gaps here
    /// become statuses instead of dropping the rule, so the alias can
    /// account for them.
    fn alias_base_status(&self, desc: &RuleDescriptor, ctx: &RunContext) -> TestStatus {
        if let Some(status) = self.support_gap(desc) {
            return status;
        }
        match desc.entry {
            Some(entry) => self.invoke(entry, ctx),
            None => TestStatus::NotSupportedOnPlatform,
        }
    }

    fn invoke(&self, entry: crate::catalog::ids::TestEntryId, ctx: &RunContext) -> TestStatus {
        let tcx = TestContext::new(self.platform, &self.options, self.registry, ctx);
        tcx.run_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::catalog::ids::TestEntryId;
    use crate::catalog::presets::Architecture;
    use crate::platform::PlatformKind;
    use crate::platform::profile::builders;
    use crate::platform::sim::SimPlatform;

    struct Harness {
        platform: Arc<dyn Platform>,
        registry: EntryRegistry,
        selections: Selections,
        options: RunOptions,
    }

    impl Harness {
        fn new(kind: PlatformKind) -> Self {
            let platform: Arc<dyn Platform> =
                Arc::new(SimPlatform::new(builders::profile(kind, 2)).unwrap());
            Self {
                platform,
                registry: EntryRegistry::new(),
                selections: Selections::new(vec![Architecture::Bsa]),
                options: RunOptions::for_platform(kind),
            }
        }

        fn stub(&mut self, id: TestEntryId, status: TestStatus) {
            self.registry
                .register(id, move |_: &TestContext<'_>| status);
        }

        fn run(&self, rules: &[RuleId], ctx: &mut RunContext) -> Vec<RuleRecord> {
            let runner = RuleRunner::new(
                &self.platform,
                &self.registry,
                &self.selections,
                self.options.clone(),
            );
            runner.run_rules(rules, ctx)
        }
    }

    #[test]
    fn base_rule_records_its_payload_status() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Pe001, TestStatus::Pass);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BPe01], &mut ctx);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, Some(TestStatus::Pass));
        assert!(records[0].bases.is_empty());
        assert_eq!(ctx.status_of(RuleId::BPe01), Some(TestStatus::Pass));
    }

    #[test]
    fn missing_registration_reads_as_unsupported() {
        let harness = Harness::new(PlatformKind::Uefi);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BPe01], &mut ctx);

        assert_eq!(
            records[0].status,
            Some(TestStatus::NotSupportedOnPlatform)
        );
    }

    #[test]
    fn unimplemented_rule_reports_not_implemented() {
        let harness = Harness::new(PlatformKind::Uefi);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BPe05], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::NotImplemented));
    }

    #[test]
    fn off_platform_rule_is_reported_where_gaps_are_visible() {
        let harness = Harness::new(PlatformKind::Uefi);

        let mut ctx = RunContext::new();
        // Linux-only rule on a UEFI platform.
        let records = harness.run(&[RuleId::BPe04], &mut ctx);

        assert_eq!(
            records[0].status,
            Some(TestStatus::NotSupportedOnPlatform)
        );
    }

    #[test]
    fn off_platform_rule_is_dropped_quietly_on_linux() {
        let harness = Harness::new(PlatformKind::Linux);

        let mut ctx = RunContext::new();
        // Firmware-only rule on an OS-hosted run.
        let records = harness.run(&[RuleId::BPfd01], &mut ctx);

        assert!(records.is_empty());
        assert_eq!(ctx.status_of(RuleId::BPfd01), None);
    }

    #[test]
    fn alias_folds_the_worst_base_outcome() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Gic001, TestStatus::Pass);
        harness.stub(TestEntryId::Gic002, TestStatus::Fail);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::SL3Gic01], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::Fail));
        assert_eq!(
            records[0].bases,
            vec![
                BaseRecord {
                    rule: RuleId::BGic01,
                    status: TestStatus::Pass
                },
                BaseRecord {
                    rule: RuleId::BGic02,
                    status: TestStatus::Fail
                },
            ]
        );
        assert_eq!(ctx.status_of(RuleId::BGic02), Some(TestStatus::Fail));
    }

    #[test]
    fn support_gap_under_a_clean_pass_reads_as_partial_coverage() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Pe002, TestStatus::Pass);
        harness.stub(TestEntryId::Smu001, TestStatus::Pass);

        let mut ctx = RunContext::new();
        // BSec01 expands over BPe05, which is implemented nowhere.
        let records = harness.run(&[RuleId::BSec01], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::PartialCoverage));
        assert!(records[0].bases.contains(&BaseRecord {
            rule: RuleId::BPe05,
            status: TestStatus::NotImplemented
        }));
        assert_eq!(ctx.status_of(RuleId::BPe05), Some(TestStatus::NotImplemented));
    }

    #[test]
    fn warn_verdicts_are_not_downgraded_by_gaps() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Pe002, TestStatus::Warn);
        harness.stub(TestEntryId::Smu001, TestStatus::Pass);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BSec01], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::Warn));
    }

    #[test]
    fn precheck_failure_skips_the_alias_without_running_bases() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Mpa000, TestStatus::Fail);
        harness.stub(TestEntryId::Mpa001, TestStatus::Pass);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::SL5Mpam01], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::Skip));
        assert!(records[0].bases.is_empty());
        assert_eq!(ctx.status_of(RuleId::BMpa01), None);
    }

    #[test]
    fn passing_precheck_releases_the_expansion() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Mpa000, TestStatus::Pass);
        harness.stub(TestEntryId::Mpa001, TestStatus::Pass);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::SL5Mpam01], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::Pass));
        assert_eq!(ctx.status_of(RuleId::BMpa01), Some(TestStatus::Pass));
    }

    #[test]
    fn caller_skips_exclude_bases_from_an_alias_run() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Gic001, TestStatus::Pass);
        harness.stub(TestEntryId::Gic002, TestStatus::Fail);
        harness.selections.skip_rules.insert(RuleId::BGic02);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::SL3Gic01], &mut ctx);

        assert_eq!(records[0].status, Some(TestStatus::Pass));
        assert_eq!(records[0].bases.len(), 1);
        assert_eq!(ctx.status_of(RuleId::BGic02), None);
    }

    #[test]
    fn alias_with_its_whole_expansion_excluded_has_no_verdict() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.selections.skip_rules.insert(RuleId::BGic01);
        harness.selections.skip_rules.insert(RuleId::BGic02);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::SL3Gic01], &mut ctx);

        assert_eq!(records[0].status, None);
        assert!(records[0].bases.is_empty());
        assert!(ctx.defects().is_empty());
    }

    #[test]
    fn rules_execute_in_catalog_order() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Pe001, TestStatus::Pass);
        harness.stub(TestEntryId::Gic001, TestStatus::Pass);

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BGic01, RuleId::BPe01], &mut ctx);

        let order: Vec<RuleId> = records.iter().map(|r| r.rule).collect();
        assert_eq!(order, vec![RuleId::BPe01, RuleId::BGic01]);
    }

    #[test]
    fn duplicate_rules_run_once_per_slot() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        let invocations = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&invocations);
        harness.registry.register(
            TestEntryId::Pe001,
            move |_: &TestContext<'_>| {
                counter.fetch_add(1, Ordering::SeqCst);
                TestStatus::Pass
            },
        );

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BPe01, RuleId::BPe01], &mut ctx);

        assert_eq!(records.len(), 2);
        assert_eq!(invocations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn earlier_outcomes_feed_later_prerequisites() {
        let mut harness = Harness::new(PlatformKind::Uefi);
        harness.stub(TestEntryId::Pfd001, TestStatus::Fail);
        harness.registry.register(
            TestEntryId::Pfd004,
            |ctx: &TestContext<'_>| {
                if ctx.prerequisite_met(RuleId::BPfd01) {
                    TestStatus::Pass
                } else {
                    TestStatus::Skip
                }
            },
        );

        let mut ctx = RunContext::new();
        let records = harness.run(&[RuleId::BPfd04, RuleId::BPfd01], &mut ctx);

        // BPfd01 sorts first, fails, and the dependent rule skips.
        assert_eq!(records[0].rule, RuleId::BPfd01);
        assert_eq!(records[1].status, Some(TestStatus::Skip));
    }
}
