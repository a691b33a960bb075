//! Rule list filtering.
//!
//! The candidate list is either the caller's explicit rule list, taken
//! verbatim, or the union of the selected architecture presets with
//! cross-preset duplicates dropped (first occurrence wins). One stable
//! retain pass then applies, in order: explicit rule skips, module
//! skips, the module allow-list, and the level/view row checks. A rule
//! no selected architecture catalogues passes the row checks by
//! default rather than being guessed at.

use std::collections::BTreeSet;

use crate::catalog::ids::RuleId;
use crate::catalog::presets::Architecture;
use crate::catalog::table::descriptor;

use super::Selections;

/// Produce the final ordered run list.
pub fn filter_rule_list(selections: &Selections) -> Vec<RuleId> {
    let mut list = match &selections.rules {
        Some(explicit) => explicit.clone(),
        None => preset_union(&selections.archs),
    };

    list.retain(|&rule| keep(rule, selections));
    list
}

fn preset_union(archs: &[Architecture]) -> Vec<RuleId> {
    let mut seen = BTreeSet::new();
    let mut list = Vec::new();
    for arch in archs {
        for entry in arch.preset() {
            if seen.insert(entry.rule) {
                list.push(entry.rule);
            }
        }
    }
    list
}

fn keep(rule: RuleId, selections: &Selections) -> bool {
    let desc = descriptor(rule);

    // Skips win over everything, the allow-list included.
    if selections.skipped(rule, desc.module) {
        return false;
    }
    if !selections.modules.is_empty() && !selections.modules.contains(&desc.module) {
        return false;
    }

    // Level and view come from the first selected architecture that
    // catalogues the rule.
    let Some(entry) = selections.archs.iter().find_map(|arch| arch.find(rule)) else {
        return true;
    };
    if !selections.level.allows(entry.level, selections.include_future) {
        return false;
    }
    entry.view.intersects(selections.view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids::ModuleId;
    use crate::catalog::presets::{LevelFilter, ViewMask};

    fn bsa() -> Selections {
        Selections::new(vec![Architecture::Bsa])
    }

    fn sbsa() -> Selections {
        Selections::new(vec![Architecture::Sbsa])
    }

    #[test]
    fn default_list_follows_preset_order_without_future_rules() {
        let list = filter_rule_list(&bsa());

        let expected: Vec<RuleId> = Architecture::Bsa
            .preset()
            .iter()
            .map(|entry| entry.rule)
            .filter(|&rule| rule != RuleId::BTimFr01)
            .collect();
        assert_eq!(list, expected);
    }

    #[test]
    fn future_rules_appear_only_on_request() {
        let mut selections = bsa();
        selections.include_future = true;

        let list = filter_rule_list(&selections);
        assert!(list.contains(&RuleId::BTimFr01));
    }

    #[test]
    fn explicit_skip_wins_over_module_allow() {
        let mut selections = bsa();
        selections.modules.insert(ModuleId::Pe);
        selections.skip_rules.insert(RuleId::BPe02);

        let list = filter_rule_list(&selections);
        assert!(list.contains(&RuleId::BPe01));
        assert!(!list.contains(&RuleId::BPe02));
        assert!(!list.contains(&RuleId::BGic01));
    }

    #[test]
    fn module_skip_drops_the_whole_family() {
        let mut selections = bsa();
        selections.skip_modules.insert(ModuleId::Gic);

        let list = filter_rule_list(&selections);
        assert!(!list.contains(&RuleId::BGic01));
        assert!(!list.contains(&RuleId::BGic02));
        assert!(!list.contains(&RuleId::BPpi00));
        assert!(list.contains(&RuleId::BTim01));
    }

    #[test]
    fn filtering_twice_yields_the_same_list() {
        let mut selections = bsa();
        selections.skip_modules.insert(ModuleId::Pcie);
        selections.modules.insert(ModuleId::Pe);
        selections.modules.insert(ModuleId::Pcie);

        let first = filter_rule_list(&selections);
        let second = filter_rule_list(&selections);
        assert_eq!(first, second);
    }

    #[test]
    fn allow_list_keeps_exactly_the_selected_modules() {
        let mut selections = bsa();
        selections.modules.insert(ModuleId::Timer);

        let list = filter_rule_list(&selections);
        assert_eq!(list, vec![RuleId::BTim01, RuleId::BTim02]);
    }

    #[test]
    fn surviving_rules_keep_their_relative_order() {
        let mut selections = bsa();
        selections.skip_rules.insert(RuleId::BGic01);

        let with_skip = filter_rule_list(&selections);
        let without_skip = filter_rule_list(&bsa());

        let repositioned: Vec<RuleId> = without_skip
            .into_iter()
            .filter(|&rule| rule != RuleId::BGic01)
            .collect();
        assert_eq!(with_skip, repositioned);
    }

    #[test]
    fn sbsa_default_level_caps_at_its_base() {
        let list = filter_rule_list(&sbsa());

        assert!(list.contains(&RuleId::SL3Pe01));
        assert!(list.contains(&RuleId::SL4Pe01));
        assert!(list.contains(&RuleId::SRas01));
        assert!(!list.contains(&RuleId::SL5Pe01));
        assert!(!list.contains(&RuleId::SL6Ras01));
        assert!(!list.contains(&RuleId::SL7Pe01));
    }

    #[test]
    fn raising_the_level_admits_deeper_rungs() {
        let mut selections = sbsa();
        selections.level = LevelFilter::Max(6);

        let list = filter_rule_list(&selections);
        assert!(list.contains(&RuleId::SL5Pe01));
        assert!(list.contains(&RuleId::SL6Ras01));
        assert!(!list.contains(&RuleId::SL7Pe01));
    }

    #[test]
    fn exact_level_selects_a_single_rung() {
        let mut selections = sbsa();
        selections.level = LevelFilter::Exact(3);

        let list = filter_rule_list(&selections);
        assert_eq!(list, vec![RuleId::SL3Pe01, RuleId::SL3Gic01]);
    }

    #[test]
    fn view_mask_drops_rows_outside_the_requested_views() {
        let mut selections = bsa();
        selections.view = ViewMask::OS;

        let list = filter_rule_list(&selections);
        assert!(list.contains(&RuleId::BPe03));
        assert!(list.contains(&RuleId::BSmu01));
        assert!(!list.contains(&RuleId::BSmu02));
        assert!(!list.contains(&RuleId::BSec01));
        assert!(list.contains(&RuleId::BTim01));
    }

    #[test]
    fn union_keeps_first_occurrence_across_presets() {
        let selections = Selections::new(vec![Architecture::Bsa, Architecture::Sbsa]);

        let list = filter_rule_list(&selections);
        assert_eq!(list[0], RuleId::BPe01);
        assert_eq!(
            list.iter().filter(|&&rule| rule == RuleId::BPe01).count(),
            1
        );
        assert!(list.contains(&RuleId::SL3Pe01));
    }

    #[test]
    fn explicit_list_passes_through_verbatim() {
        let mut selections = bsa();
        selections.rules = Some(vec![RuleId::BPe01, RuleId::BPe01, RuleId::BGic01]);

        let list = filter_rule_list(&selections);
        assert_eq!(list, vec![RuleId::BPe01, RuleId::BPe01, RuleId::BGic01]);
    }

    #[test]
    fn uncatalogued_rule_is_conservatively_kept() {
        let mut selections = Selections::new(vec![Architecture::Pcbsa]);
        selections.rules = Some(vec![RuleId::BGic01, RuleId::PL1Pe01]);

        let list = filter_rule_list(&selections);
        assert_eq!(list, vec![RuleId::BGic01, RuleId::PL1Pe01]);
    }
}
