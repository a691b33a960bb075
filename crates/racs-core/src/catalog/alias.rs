//! Alias rule expansions.
//!
//! An alias rule carries no payload of its own. It expands to an
//! ordered list of base rules which run in place of the alias, and may
//! name a precheck entry that gates the whole expansion.

use super::ids::{RuleId, TestEntryId};

#[derive(Debug, Clone, Copy)]
pub struct AliasExpansion {
    pub alias: RuleId,
    /// Gate payload run before any base rule. A failing precheck skips
    /// the alias without running the expansion.
    pub precheck: Option<TestEntryId>,
    /// Base rules, in run order.
    pub bases: &'static [RuleId],
}

static EXPANSIONS: [AliasExpansion; 6] = [
    AliasExpansion {
        alias: RuleId::BSec01,
        precheck: None,
        bases: &[RuleId::BPe02, RuleId::BPe05, RuleId::BSmu01],
    },
    AliasExpansion {
        alias: RuleId::SL3Pe01,
        precheck: None,
        bases: &[RuleId::BPe01, RuleId::BPe02, RuleId::BPe03],
    },
    AliasExpansion {
        alias: RuleId::SL3Gic01,
        precheck: None,
        bases: &[RuleId::BGic01, RuleId::BGic02],
    },
    AliasExpansion {
        alias: RuleId::SL5Mpam01,
        precheck: Some(TestEntryId::Mpa000),
        bases: &[RuleId::BMpa01],
    },
    AliasExpansion {
        alias: RuleId::SRas01,
        precheck: None,
        bases: &[RuleId::BRas01, RuleId::SL6Ras01],
    },
    AliasExpansion {
        alias: RuleId::PL1Pfd01,
        precheck: None,
        bases: &[RuleId::BPfd01, RuleId::BPfd02, RuleId::BPfd04],
    },
];

/// Expansion for `alias`, or `None` if the rule has none. A rule whose
/// descriptor says [`RuleKind::Alias`] but has no expansion here is a
/// catalog defect.
///
/// [`RuleKind::Alias`]: super::table::RuleKind::Alias
pub fn expansion(alias: RuleId) -> Option<&'static AliasExpansion> {
    EXPANSIONS.iter().find(|exp| exp.alias == alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::table::{RULE_TABLE, RuleKind, descriptor};

    #[test]
    fn every_alias_rule_expands() {
        for desc in &RULE_TABLE {
            match desc.kind {
                RuleKind::Alias => assert!(
                    expansion(desc.rule).is_some(),
                    "{} has no expansion",
                    desc.rule
                ),
                RuleKind::Base => assert!(
                    expansion(desc.rule).is_none(),
                    "{} is a base rule with an expansion",
                    desc.rule
                ),
            }
        }
    }

    #[test]
    fn expansions_reference_base_rules_only() {
        for exp in &EXPANSIONS {
            assert!(!exp.bases.is_empty(), "{} expands to nothing", exp.alias);
            for &rule in exp.bases {
                assert!(
                    matches!(descriptor(rule).kind, RuleKind::Base),
                    "{} expands to non-base rule {}",
                    exp.alias,
                    rule
                );
            }
        }
    }

    #[test]
    fn expansion_order_is_preserved() {
        let exp = expansion(RuleId::SL3Pe01).unwrap();
        assert_eq!(exp.bases, &[RuleId::BPe01, RuleId::BPe02, RuleId::BPe03]);
    }

    #[test]
    fn mpam_alias_is_gated_by_precheck() {
        let exp = expansion(RuleId::SL5Mpam01).unwrap();
        assert_eq!(exp.precheck, Some(TestEntryId::Mpa000));
        assert!(expansion(RuleId::SL3Gic01).unwrap().precheck.is_none());
    }

    #[test]
    fn alias_may_expand_to_an_unimplemented_base() {
        let exp = expansion(RuleId::BSec01).unwrap();
        assert!(exp.bases.contains(&RuleId::BPe05));
        assert!(descriptor(RuleId::BPe05).platforms.is_empty());
    }
}
