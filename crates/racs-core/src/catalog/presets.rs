//! Architecture presets.
//!
//! Each architecture contributes an ordered list of rules with the
//! compliance level the rule belongs to and the view classes it is
//! relevant for. The run list starts as the union of the selected
//! presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{RuleId, UnknownIdError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Bsa,
    Sbsa,
    Pcbsa,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Bsa => "bsa",
            Architecture::Sbsa => "sbsa",
            Architecture::Pcbsa => "pcbsa",
        }
    }

    /// Compliance level a run starts from when none is given.
    pub fn base_level(&self) -> u8 {
        match self {
            Architecture::Bsa => 1,
            Architecture::Sbsa => 4,
            Architecture::Pcbsa => 1,
        }
    }

    pub fn preset(&self) -> &'static [PresetEntry] {
        match self {
            Architecture::Bsa => &BSA_PRESET,
            Architecture::Sbsa => &SBSA_PRESET,
            Architecture::Pcbsa => &PCBSA_PRESET,
        }
    }

    /// Preset row for `rule`, if this architecture catalogues it.
    pub fn find(&self, rule: RuleId) -> Option<&'static PresetEntry> {
        self.preset().iter().find(|entry| entry.rule == rule)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = UnknownIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bsa" => Ok(Architecture::Bsa),
            "sbsa" => Ok(Architecture::Sbsa),
            "pcbsa" => Ok(Architecture::Pcbsa),
            other => Err(UnknownIdError(other.to_string())),
        }
    }
}

/// Compliance level a preset row belongs to. Future requirements sit
/// outside the numbered ladder and only run when asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    Numbered(u8),
    Future,
}

/// Numeric level selection. Future requirements are gated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Keep rules at or below this level.
    Max(u8),
    /// Keep rules at exactly this level.
    Exact(u8),
}

impl LevelFilter {
    pub fn allows(&self, level: RuleLevel, include_future: bool) -> bool {
        match level {
            RuleLevel::Future => include_future,
            RuleLevel::Numbered(n) => match self {
                LevelFilter::Max(max) => n <= *max,
                LevelFilter::Exact(exact) => n == *exact,
            },
        }
    }
}

/// Views a rule is relevant for: what the OS sees, what a hypervisor
/// sees, what the platform security side sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMask(u8);

impl ViewMask {
    pub const OS: Self = Self(1 << 0);
    pub const HYP: Self = Self(1 << 1);
    pub const PS: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PresetEntry {
    pub rule: RuleId,
    pub level: RuleLevel,
    pub view: ViewMask,
}

const fn at(rule: RuleId, level: u8) -> PresetEntry {
    PresetEntry {
        rule,
        level: RuleLevel::Numbered(level),
        view: ViewMask::ALL,
    }
}

const fn at_view(rule: RuleId, level: u8, view: ViewMask) -> PresetEntry {
    PresetEntry {
        rule,
        level: RuleLevel::Numbered(level),
        view,
    }
}

const fn future(rule: RuleId) -> PresetEntry {
    PresetEntry {
        rule,
        level: RuleLevel::Future,
        view: ViewMask::ALL,
    }
}

static BSA_PRESET: [PresetEntry; 32] = [
    at(RuleId::BPe01, 1),
    at(RuleId::BPe02, 1),
    at_view(RuleId::BPe03, 1, ViewMask::OS),
    at_view(RuleId::BPe04, 1, ViewMask::OS),
    at(RuleId::BPe05, 1),
    at(RuleId::BGic01, 1),
    at(RuleId::BGic02, 1),
    at(RuleId::BPpi00, 1),
    at(RuleId::BTim01, 1),
    at(RuleId::BTim02, 1),
    future(RuleId::BTimFr01),
    at(RuleId::BWd01, 1),
    at(RuleId::BWd02, 1),
    at(RuleId::BMem01, 1),
    at(RuleId::BMem02, 1),
    at_view(RuleId::BPer01, 1, ViewMask::OS),
    at(RuleId::BPer02, 1),
    at_view(RuleId::BPer03, 1, ViewMask::OS),
    at(RuleId::BPci01, 1),
    at(RuleId::BPci02, 1),
    at_view(RuleId::BSmu01, 1, ViewMask::OS.or(ViewMask::HYP)),
    at_view(RuleId::BSmu02, 1, ViewMask::HYP),
    at_view(RuleId::BSec01, 1, ViewMask::HYP.or(ViewMask::PS)),
    at(RuleId::BPmu01, 1),
    at(RuleId::BRas01, 1),
    at(RuleId::BMpa01, 1),
    at(RuleId::BPfd01, 1),
    at(RuleId::BPfd02, 1),
    at(RuleId::BPfd03, 1),
    at(RuleId::BPfd04, 1),
    at(RuleId::BPfd05, 1),
    at(RuleId::BPfd06, 1),
];

static SBSA_PRESET: [PresetEntry; 18] = [
    at(RuleId::BPe01, 4),
    at(RuleId::BPe02, 4),
    at(RuleId::BPe03, 4),
    at(RuleId::BGic01, 4),
    at(RuleId::BGic02, 4),
    at(RuleId::BPmu01, 4),
    at(RuleId::BRas01, 4),
    at(RuleId::BMpa01, 4),
    at(RuleId::SL3Pe01, 3),
    at(RuleId::SL3Gic01, 3),
    at(RuleId::SL4Pe01, 4),
    at(RuleId::SL4Pmu01, 4),
    at(RuleId::SRas01, 4),
    at(RuleId::SL5Pe01, 5),
    at(RuleId::SL5Mpam01, 5),
    at(RuleId::SL6Ras01, 6),
    at(RuleId::SL7Pe01, 7),
    future(RuleId::SPeFr01),
];

static PCBSA_PRESET: [PresetEntry; 6] = [
    at(RuleId::BPe01, 1),
    at(RuleId::BWd01, 1),
    at(RuleId::BPfd01, 1),
    at(RuleId::PL1Pe01, 1),
    at(RuleId::PL1Wd01, 1),
    at(RuleId::PL1Pfd01, 1),
];
