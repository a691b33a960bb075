//! Run list selection: what the caller asked to run, and the filter
//! that turns architecture presets plus command-line choices into the
//! final ordered rule list.

pub mod filter;

use std::collections::BTreeSet;

use crate::catalog::ids::{ModuleId, RuleId};
use crate::catalog::presets::{Architecture, LevelFilter, ViewMask};

/// Everything the caller chose about which rules run.
#[derive(Debug, Clone)]
pub struct Selections {
    /// Selected architectures, in the order given. Never empty.
    pub archs: Vec<Architecture>,
    /// Explicit candidate list. When present it replaces the preset
    /// union verbatim, duplicates included.
    pub rules: Option<Vec<RuleId>>,
    pub skip_rules: BTreeSet<RuleId>,
    /// Module allow-list; empty means every module.
    pub modules: BTreeSet<ModuleId>,
    pub skip_modules: BTreeSet<ModuleId>,
    pub level: LevelFilter,
    pub include_future: bool,
    /// Requested view classes. Only meaningful for BSA rows; preset
    /// rows elsewhere carry [`ViewMask::ALL`].
    pub view: ViewMask,
}

impl Selections {
    pub fn new(archs: Vec<Architecture>) -> Self {
        let level = LevelFilter::Max(default_level(&archs));
        Self {
            archs,
            rules: None,
            skip_rules: BTreeSet::new(),
            modules: BTreeSet::new(),
            skip_modules: BTreeSet::new(),
            level,
            include_future: false,
            view: ViewMask::ALL,
        }
    }

    /// True when the caller excluded `rule` outright, either by id or
    /// through its module.
    pub fn skipped(&self, rule: RuleId, module: ModuleId) -> bool {
        self.skip_rules.contains(&rule) || self.skip_modules.contains(&module)
    }
}

/// Highest base level across the selected architectures.
pub fn default_level(archs: &[Architecture]) -> u8 {
    archs
        .iter()
        .map(|arch| arch.base_level())
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_tracks_the_deepest_architecture() {
        assert_eq!(default_level(&[Architecture::Bsa]), 1);
        assert_eq!(default_level(&[Architecture::Bsa, Architecture::Sbsa]), 4);
        assert_eq!(default_level(&[Architecture::Pcbsa]), 1);
    }

    #[test]
    fn skipped_covers_rule_and_module_exclusions() {
        let mut selections = Selections::new(vec![Architecture::Bsa]);
        selections.skip_rules.insert(RuleId::BPe01);
        selections.skip_modules.insert(ModuleId::Gic);

        assert!(selections.skipped(RuleId::BPe01, ModuleId::Pe));
        assert!(selections.skipped(RuleId::BGic02, ModuleId::Gic));
        assert!(!selections.skipped(RuleId::BTim01, ModuleId::Timer));
    }
}
