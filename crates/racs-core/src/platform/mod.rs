//! Platform abstraction layer.
//!
//! Everything the engine needs from the machine goes through the
//! [`Platform`] trait: PE discovery and dispatch, the shared status
//! board, PFDI firmware calls, and the machine description. The engine
//! itself never touches hardware state directly.

pub mod pfdi;
pub mod profile;
pub mod read;
pub mod sim;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pe::board::StatusBoard;
use pfdi::{PfdiRequest, PfdiReturn};
use profile::PlatformProfile;

/// Build target family of the suite binary. Each kind occupies one bit
/// of a [`PlatformMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Baremetal,
    Uefi,
    Linux,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Baremetal => "baremetal",
            PlatformKind::Uefi => "uefi",
            PlatformKind::Linux => "linux",
        }
    }

    pub fn mask(self) -> PlatformMask {
        match self {
            PlatformKind::Baremetal => PlatformMask::BAREMETAL,
            PlatformKind::Uefi => PlatformMask::UEFI,
            PlatformKind::Linux => PlatformMask::LINUX,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of platform kinds a rule has a test implementation on. An empty
/// mask means the rule is catalogued but not implemented anywhere yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformMask(u8);

impl PlatformMask {
    pub const NONE: Self = Self(0);
    pub const BAREMETAL: Self = Self(1 << 0);
    pub const UEFI: Self = Self(1 << 1);
    pub const LINUX: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, kind: PlatformKind) -> bool {
        self.0 & kind.mask().0 != 0
    }
}

/// Work item handed to a remote PE. Runs at most once.
pub type PeJob = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("PE index {pe} out of range ({count} PEs)")]
    InvalidPe { pe: u32, count: u32 },
    #[error("PE {pe} cannot dispatch work to itself")]
    SelfDispatch { pe: u32 },
    #[error("PE {pe} stopped accepting work")]
    Unavailable { pe: u32 },
}

/// Seam between the engine and the machine.
pub trait Platform: Send + Sync {
    fn kind(&self) -> PlatformKind;

    fn pe_count(&self) -> u32;

    /// Index of the PE the engine itself runs on.
    fn current_pe(&self) -> u32;

    /// One-shot dispatch of `job` to `pe`. Returns once the request is
    /// queued; completion is observed through the status board, never
    /// through this call.
    fn execute_on_pe(&self, pe: u32, job: PeJob) -> Result<(), PlatformError>;

    /// Shared per-PE status board, one slot per PE.
    fn board(&self) -> &StatusBoard;

    /// Fixed settling delay before collecting results.
    fn settle(&self, delay: Duration) {
        std::thread::sleep(delay);
    }

    /// Issue a PFDI firmware call on `pe`.
    fn pfdi_call(&self, pe: u32, request: PfdiRequest) -> PfdiReturn;

    /// Discovered machine description.
    fn description(&self) -> &PlatformProfile;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_its_own_bit() {
        assert!(PlatformMask::BAREMETAL.contains(PlatformKind::Baremetal));
        assert!(!PlatformMask::BAREMETAL.contains(PlatformKind::Linux));
        assert!(PlatformMask::LINUX.contains(PlatformKind::Linux));
    }

    #[test]
    fn mask_union() {
        let mask = PlatformMask::BAREMETAL.or(PlatformMask::UEFI);
        assert!(mask.contains(PlatformKind::Baremetal));
        assert!(mask.contains(PlatformKind::Uefi));
        assert!(!mask.contains(PlatformKind::Linux));
    }

    #[test]
    fn empty_mask_contains_nothing() {
        assert!(PlatformMask::NONE.is_empty());
        assert!(!PlatformMask::NONE.contains(PlatformKind::Uefi));
        assert!(!PlatformMask::ALL.is_empty());
    }

    #[test]
    fn kind_serde_is_lowercase() {
        let json = serde_json::to_string(&PlatformKind::Baremetal).unwrap();
        assert_eq!(json, "\"baremetal\"");
        let kind: PlatformKind = serde_json::from_str("\"linux\"").unwrap();
        assert_eq!(kind, PlatformKind::Linux);
    }
}
