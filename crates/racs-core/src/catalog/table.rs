//! Rule capability table.
//!
//! One descriptor per catalogued rule, in rule declaration order. The
//! descriptor names the owning module, says whether the rule runs a
//! payload directly or expands to other rules, and records which
//! platform builds carry an implementation.

use crate::platform::PlatformMask;

use super::ids::{ModuleId, RuleId, TestEntryId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Runs one registered test entry.
    Base,
    /// Expands to an ordered list of base rules.
    Alias,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    pub rule: RuleId,
    pub module: ModuleId,
    pub kind: RuleKind,
    /// Platform builds carrying an implementation. Empty means the
    /// rule is catalogued but not implemented anywhere yet.
    pub platforms: PlatformMask,
    /// Payload entry for base rules; `None` for aliases and for
    /// unimplemented rules.
    pub entry: Option<TestEntryId>,
    pub summary: &'static str,
}

/// Look up the descriptor for `rule`. Total over [`RuleId`].
pub fn descriptor(rule: RuleId) -> &'static RuleDescriptor {
    &RULE_TABLE[rule as usize]
}

const fn base(
    rule: RuleId,
    module: ModuleId,
    platforms: PlatformMask,
    entry: TestEntryId,
    summary: &'static str,
) -> RuleDescriptor {
    RuleDescriptor {
        rule,
        module,
        kind: RuleKind::Base,
        platforms,
        entry: Some(entry),
        summary,
    }
}

const fn alias(
    rule: RuleId,
    module: ModuleId,
    platforms: PlatformMask,
    summary: &'static str,
) -> RuleDescriptor {
    RuleDescriptor {
        rule,
        module,
        kind: RuleKind::Alias,
        platforms,
        entry: None,
        summary,
    }
}

const fn unimplemented(rule: RuleId, module: ModuleId, summary: &'static str) -> RuleDescriptor {
    RuleDescriptor {
        rule,
        module,
        kind: RuleKind::Base,
        platforms: PlatformMask::NONE,
        entry: None,
        summary,
    }
}

const ALL: PlatformMask = PlatformMask::ALL;
/// Rules that poke firmware or secure state directly.
const FIRMWARE: PlatformMask = PlatformMask::BAREMETAL.or(PlatformMask::UEFI);

pub static RULE_TABLE: [RuleDescriptor; 45] = [
    base(
        RuleId::BPe01,
        ModuleId::Pe,
        ALL,
        TestEntryId::Pe001,
        "Check architecture symmetry across PEs",
    ),
    base(
        RuleId::BPe02,
        ModuleId::Pe,
        ALL,
        TestEntryId::Pe002,
        "Check AArch64 state support on all PEs",
    ),
    base(
        RuleId::BPe03,
        ModuleId::Pe,
        ALL,
        TestEntryId::Pe003,
        "Check cryptographic extension availability",
    ),
    base(
        RuleId::BPe04,
        ModuleId::Pe,
        PlatformMask::LINUX,
        TestEntryId::Pe004,
        "Check online PE count against the description",
    ),
    unimplemented(
        RuleId::BPe05,
        ModuleId::Pe,
        "Check secure-state PE register visibility",
    ),
    base(
        RuleId::BGic01,
        ModuleId::Gic,
        ALL,
        TestEntryId::Gic001,
        "Check GIC version is v3 or higher",
    ),
    base(
        RuleId::BGic02,
        ModuleId::Gic,
        ALL,
        TestEntryId::Gic002,
        "Check ITS presence and grouping",
    ),
    base(
        RuleId::BPpi00,
        ModuleId::Gic,
        ALL,
        TestEntryId::Ppi000,
        "Check mandatory PPI assignments",
    ),
    base(
        RuleId::BTim01,
        ModuleId::Timer,
        ALL,
        TestEntryId::Tim001,
        "Check system counter frequency range",
    ),
    base(
        RuleId::BTim02,
        ModuleId::Timer,
        ALL,
        TestEntryId::Tim002,
        "Check EL1 physical timer wakeup capability",
    ),
    base(
        RuleId::BTimFr01,
        ModuleId::Timer,
        ALL,
        TestEntryId::Tim003,
        "Check counter scaling support",
    ),
    base(
        RuleId::BWd01,
        ModuleId::Watchdog,
        ALL,
        TestEntryId::Wd001,
        "Check generic watchdog presence",
    ),
    base(
        RuleId::BWd02,
        ModuleId::Watchdog,
        ALL,
        TestEntryId::Wd002,
        "Check watchdog dual-signal wiring",
    ),
    base(
        RuleId::BMem01,
        ModuleId::MemMap,
        ALL,
        TestEntryId::Mem001,
        "Check main memory is described",
    ),
    base(
        RuleId::BMem02,
        ModuleId::MemMap,
        ALL,
        TestEntryId::Mem002,
        "Check memory regions do not overlap",
    ),
    base(
        RuleId::BPer01,
        ModuleId::Peripheral,
        ALL,
        TestEntryId::Per001,
        "Check USB controller presence",
    ),
    base(
        RuleId::BPer02,
        ModuleId::Peripheral,
        ALL,
        TestEntryId::Per002,
        "Check UART presence",
    ),
    base(
        RuleId::BPer03,
        ModuleId::Peripheral,
        ALL,
        TestEntryId::Per003,
        "Check SATA controller presence",
    ),
    base(
        RuleId::BPci01,
        ModuleId::Pcie,
        ALL,
        TestEntryId::Pci001,
        "Check ECAM region is declared",
    ),
    base(
        RuleId::BPci02,
        ModuleId::Pcie,
        ALL,
        TestEntryId::Pci002,
        "Check PCIe address translation coherency",
    ),
    base(
        RuleId::BSmu01,
        ModuleId::Smmu,
        FIRMWARE,
        TestEntryId::Smu001,
        "Check SMMU major version",
    ),
    base(
        RuleId::BSmu02,
        ModuleId::Smmu,
        FIRMWARE,
        TestEntryId::Smu002,
        "Check SMMU stage 2 support",
    ),
    alias(
        RuleId::BSec01,
        ModuleId::Smmu,
        FIRMWARE,
        "Check secure access protections",
    ),
    base(
        RuleId::BPmu01,
        ModuleId::Pmu,
        ALL,
        TestEntryId::Pmu001,
        "Check PMU counter minimum",
    ),
    base(
        RuleId::BRas01,
        ModuleId::Ras,
        ALL,
        TestEntryId::Ras001,
        "Check RAS error node records",
    ),
    base(
        RuleId::BMpa01,
        ModuleId::Mpam,
        ALL,
        TestEntryId::Mpa001,
        "Check MPAM MSC accessibility",
    ),
    base(
        RuleId::BPfd01,
        ModuleId::Pfdi,
        FIRMWARE,
        TestEntryId::Pfd001,
        "Check PFDI version handshake",
    ),
    base(
        RuleId::BPfd02,
        ModuleId::Pfdi,
        FIRMWARE,
        TestEntryId::Pfd002,
        "Check PFDI mandatory function discovery",
    ),
    base(
        RuleId::BPfd03,
        ModuleId::Pfdi,
        FIRMWARE,
        TestEntryId::Pfd003,
        "Check PFDI reserved fields read as zero",
    ),
    base(
        RuleId::BPfd04,
        ModuleId::Pfdi,
        FIRMWARE,
        TestEntryId::Pfd004,
        "Check PFDI PE self-test on all PEs",
    ),
    base(
        RuleId::BPfd05,
        ModuleId::Pfdi,
        FIRMWARE,
        TestEntryId::Pfd005,
        "Check PFDI self-test result reporting",
    ),
    base(
        RuleId::BPfd06,
        ModuleId::Pfdi,
        FIRMWARE,
        TestEntryId::Pfd006,
        "Check PFDI forced-error reporting",
    ),
    alias(
        RuleId::SL3Pe01,
        ModuleId::Pe,
        ALL,
        "Check PE baseline for level 3",
    ),
    alias(
        RuleId::SL3Gic01,
        ModuleId::Gic,
        ALL,
        "Check GIC baseline for level 3",
    ),
    base(
        RuleId::SL4Pe01,
        ModuleId::Pe,
        ALL,
        TestEntryId::Spe001,
        "Check statistical profiling availability",
    ),
    base(
        RuleId::SL4Pmu01,
        ModuleId::Pmu,
        ALL,
        TestEntryId::Spm001,
        "Check extended PMU event counters",
    ),
    base(
        RuleId::SL5Pe01,
        ModuleId::Pe,
        ALL,
        TestEntryId::Spe002,
        "Check branch record buffer extension",
    ),
    alias(
        RuleId::SL5Mpam01,
        ModuleId::Mpam,
        ALL,
        "Check MPAM monitor coverage",
    ),
    base(
        RuleId::SL6Ras01,
        ModuleId::Ras,
        ALL,
        TestEntryId::Sra001,
        "Check RAS fault injection interface",
    ),
    base(
        RuleId::SL7Pe01,
        ModuleId::Pe,
        ALL,
        TestEntryId::Spe003,
        "Check every PE responds to dispatch",
    ),
    base(
        RuleId::SPeFr01,
        ModuleId::Pe,
        ALL,
        TestEntryId::Spe004,
        "Check memory tagging extension",
    ),
    alias(
        RuleId::SRas01,
        ModuleId::Ras,
        ALL,
        "Check RAS end-to-end reporting",
    ),
    base(
        RuleId::PL1Pe01,
        ModuleId::Pe,
        ALL,
        TestEntryId::Ppe001,
        "Check PE count limits for client platforms",
    ),
    base(
        RuleId::PL1Wd01,
        ModuleId::Watchdog,
        ALL,
        TestEntryId::Pwd001,
        "Check client watchdog configuration",
    ),
    alias(
        RuleId::PL1Pfd01,
        ModuleId::Pfdi,
        FIRMWARE,
        "Check PFDI client platform subset",
    ),
];
