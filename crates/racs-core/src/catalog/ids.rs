use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An identifier token that does not name anything in the catalog.
///
/// Selection inputs (skip lists, rule files) tolerate these: the caller
/// logs the token and drops it rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown identifier `{0}`")]
pub struct UnknownIdError(pub String);

/// Defines a fieldless identifier enum together with its canonical
/// string form, used for display, parsing and serialization.
///
/// Declaration order is the sort order; rule ids are declared grouped
/// by architecture and module so an ordinary sort groups the run list
/// the way reports expect.
macro_rules! identifier_enum {
    ($(#[$meta:meta])* $ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $ty {
            $($variant),+
        }

        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(UnknownIdError(s.to_string())),
                }
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

identifier_enum! {
    /// Functional module owning a rule; the unit of module-level
    /// skip/select filtering.
    ModuleId {
        Pe => "PE",
        Gic => "GIC",
        Timer => "TIMER",
        Watchdog => "WATCHDOG",
        MemMap => "MEM_MAP",
        Peripheral => "PERIPHERAL",
        Pcie => "PCIE",
        Smmu => "SMMU",
        Pmu => "PMU",
        Ras => "RAS",
        Mpam => "MPAM",
        Pfdi => "PFDI",
    }
}

identifier_enum! {
    /// One identified conformance requirement.
    ///
    /// Naming follows the rule documents: `B_*` BSA, `S_*` SBSA
    /// (with the owning compliance level in the id), `P_*` PC-BSA.
    RuleId {
        BPe01 => "B_PE_01",
        BPe02 => "B_PE_02",
        BPe03 => "B_PE_03",
        BPe04 => "B_PE_04",
        BPe05 => "B_PE_05",
        BGic01 => "B_GIC_01",
        BGic02 => "B_GIC_02",
        BPpi00 => "B_PPI_00",
        BTim01 => "B_TIM_01",
        BTim02 => "B_TIM_02",
        BTimFr01 => "B_TIM_FR_01",
        BWd01 => "B_WD_01",
        BWd02 => "B_WD_02",
        BMem01 => "B_MEM_01",
        BMem02 => "B_MEM_02",
        BPer01 => "B_PER_01",
        BPer02 => "B_PER_02",
        BPer03 => "B_PER_03",
        BPci01 => "B_PCI_01",
        BPci02 => "B_PCI_02",
        BSmu01 => "B_SMU_01",
        BSmu02 => "B_SMU_02",
        BSec01 => "B_SEC_01",
        BPmu01 => "B_PMU_01",
        BRas01 => "B_RAS_01",
        BMpa01 => "B_MPA_01",
        BPfd01 => "B_PFD_01",
        BPfd02 => "B_PFD_02",
        BPfd03 => "B_PFD_03",
        BPfd04 => "B_PFD_04",
        BPfd05 => "B_PFD_05",
        BPfd06 => "B_PFD_06",
        SL3Pe01 => "S_L3_PE_01",
        SL3Gic01 => "S_L3_GIC_01",
        SL4Pe01 => "S_L4_PE_01",
        SL4Pmu01 => "S_L4_PMU_01",
        SL5Pe01 => "S_L5_PE_01",
        SL5Mpam01 => "S_L5_MPAM_01",
        SL6Ras01 => "S_L6_RAS_01",
        SL7Pe01 => "S_L7_PE_01",
        SPeFr01 => "S_PE_FR_01",
        SRas01 => "S_RAS_01",
        PL1Pe01 => "P_L1_PE_01",
        PL1Wd01 => "P_L1_WD_01",
        PL1Pfd01 => "P_L1_PFD_01",
    }
}

identifier_enum! {
    /// Key into the test entry registry. One payload routine per id;
    /// a few ids name composite wrappers over other entries.
    TestEntryId {
        Pe001 => "pe001",
        Pe002 => "pe002",
        Pe003 => "pe003",
        Pe004 => "pe004",
        Gic001 => "gic001",
        Gic002 => "gic002",
        Gic003 => "gic003",
        Gic004 => "gic004",
        Ppi000 => "ppi000",
        Tim001 => "tim001",
        Tim002 => "tim002",
        Tim003 => "tim003",
        Wd001 => "wd001",
        Wd002 => "wd002",
        Mem001 => "mem001",
        Mem002 => "mem002",
        Per001 => "per001",
        Per002 => "per002",
        Per003 => "per003",
        Pci001 => "pci001",
        Pci002 => "pci002",
        Pci003 => "pci003",
        Pci004 => "pci004",
        Smu001 => "smu001",
        Smu002 => "smu002",
        Pmu001 => "pmu001",
        Ras001 => "ras001",
        Mpa000 => "mpa000",
        Mpa001 => "mpa001",
        Pfd001 => "pfd001",
        Pfd002 => "pfd002",
        Pfd003 => "pfd003",
        Pfd004 => "pfd004",
        Pfd005 => "pfd005",
        Pfd006 => "pfd006",
        Spe001 => "spe001",
        Spe002 => "spe002",
        Spe003 => "spe003",
        Spe004 => "spe004",
        Spm001 => "spm001",
        Sra001 => "sra001",
        Ppe001 => "ppe001",
        Pwd001 => "pwd001",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_id_round_trips_through_display() {
        for &rule in RuleId::ALL {
            let parsed: RuleId = rule.as_str().parse().expect("canonical form parses");
            assert_eq!(parsed, rule);
        }
    }

    #[test]
    fn unknown_rule_id_is_rejected() {
        let err = "B_XYZ_99".parse::<RuleId>().unwrap_err();
        assert_eq!(err, UnknownIdError("B_XYZ_99".to_string()));
    }

    #[test]
    fn module_id_parses_canonical_names() {
        assert_eq!("GIC".parse::<ModuleId>().unwrap(), ModuleId::Gic);
        assert_eq!("MEM_MAP".parse::<ModuleId>().unwrap(), ModuleId::MemMap);
        assert!("gic".parse::<ModuleId>().is_err());
    }

    #[test]
    fn rule_ids_serialize_as_canonical_strings() {
        let json = serde_json::to_string(&RuleId::BPe01).unwrap();
        assert_eq!(json, "\"B_PE_01\"");

        let back: RuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RuleId::BPe01);
    }

    #[test]
    fn declaration_order_groups_architectures() {
        // Sorting a mixed list must yield BSA ids before SBSA before PC-BSA.
        let mut list = vec![RuleId::PL1Pe01, RuleId::SL3Pe01, RuleId::BPe01];
        list.sort_unstable();
        assert_eq!(list, vec![RuleId::BPe01, RuleId::SL3Pe01, RuleId::PL1Pe01]);
    }
}
