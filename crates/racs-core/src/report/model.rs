use serde::{Deserialize, Serialize};

use crate::catalog::table::descriptor;
use crate::exec::runner::RuleRecord;
use crate::exec::status::TestStatus;
use crate::platform::PlatformKind;
use crate::platform::profile::PlatformProfile;
use crate::select::Selections;
use crate::{RULE_CATALOG_VERSION, SCHEMA_VERSION};

/// Top-level run report.
///
/// This struct is the stable JSON contract. For a given platform
/// description and selection it must serialize deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub catalog_version: String,
    pub tool: ToolInfo,
    pub platform: PlatformInfo,
    pub selections: SelectionsInfo,
    pub results: Vec<RuleResultInfo>,
    pub defects: Vec<String>,
    pub summary: Summary,
}

impl Report {
    /// Assemble a report from run outputs. `records` are kept in the
    /// order the runner produced them.
    pub fn new(
        tool: ToolInfo,
        platform: PlatformInfo,
        selections: SelectionsInfo,
        records: &[RuleRecord],
        defects: Vec<String>,
    ) -> Self {
        let summary = Summary::from_records(records);
        let results = records
            .iter()
            .map(|record| {
                let desc = descriptor(record.rule);
                RuleResultInfo {
                    rule: record.rule.to_string(),
                    module: desc.module.to_string(),
                    summary: desc.summary.to_string(),
                    status: record.status,
                    bases: record
                        .bases
                        .iter()
                        .map(|base| BaseResultInfo {
                            rule: base.rule.to_string(),
                            status: base.status,
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            catalog_version: RULE_CATALOG_VERSION.to_string(),
            tool,
            platform,
            selections,
            results,
            defects,
            summary,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// The machine the suite ran against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub name: String,
    pub kind: PlatformKind,
    pub pe_count: u32,
    pub description: ProfileInfo,
}

impl PlatformInfo {
    pub fn new(profile: &PlatformProfile, description: ProfileInfo) -> Self {
        Self {
            name: profile.name.clone(),
            kind: profile.kind,
            pe_count: profile.pe_count(),
            description,
        }
    }
}

/// Provenance of the platform description file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: ProfileHash,
}

/// Cryptographic description fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileHash {
    pub algorithm: String,
    pub value: String,
}

/// Echo of what the caller selected, resolved to the final run list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionsInfo {
    pub architectures: Vec<String>,
    pub level: String,
    pub future_requirements: bool,
    pub rules: Vec<String>,
}

impl SelectionsInfo {
    pub fn new(selections: &Selections, run_list: &[crate::catalog::ids::RuleId]) -> Self {
        let level = match selections.level {
            crate::catalog::presets::LevelFilter::Max(n) => format!("max:{n}"),
            crate::catalog::presets::LevelFilter::Exact(n) => format!("exact:{n}"),
        };
        Self {
            architectures: selections
                .archs
                .iter()
                .map(|arch| arch.to_string())
                .collect(),
            level,
            future_requirements: selections.include_future,
            rules: run_list.iter().map(|rule| rule.to_string()).collect(),
        }
    }
}

/// One rule outcome. `status` is `None` when the rule was abandoned
/// without a verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResultInfo {
    pub rule: String,
    pub module: String,
    pub summary: String,
    pub status: Option<TestStatus>,
    pub bases: Vec<BaseResultInfo>,
}

/// One base outcome behind an alias run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResultInfo {
    pub rule: String,
    pub status: TestStatus,
}

/// Run counters, one per verdict class plus the total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u32,
    pub passed: u32,
    pub passed_partial: u32,
    pub warnings: u32,
    pub skipped: u32,
    pub failed: u32,
    pub not_supported: u32,
    pub not_implemented: u32,
}

impl Summary {
    pub fn from_records(records: &[RuleRecord]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            summary.total += 1;
            match record.status {
                Some(TestStatus::Pass) => summary.passed += 1,
                Some(TestStatus::PartialCoverage) => summary.passed_partial += 1,
                Some(TestStatus::Warn) => summary.warnings += 1,
                Some(TestStatus::Skip) => summary.skipped += 1,
                Some(TestStatus::Fail) => summary.failed += 1,
                Some(TestStatus::NotSupportedOnPlatform) => summary.not_supported += 1,
                Some(TestStatus::NotImplemented) => summary.not_implemented += 1,
                None => {}
            }
        }
        summary
    }

    /// Process exit code for this outcome: failures make the run
    /// nonzero, everything else is clean. Setup errors exit with 2
    /// before a summary ever exists.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 { 1 } else { 0 }
    }
}
