//! Machine description a simulated platform is built from.
//!
//! The JSON form of [`PlatformProfile`] is the input artifact of a suite
//! run, standing in for the ACPI/device-tree discovery a real platform
//! layer would perform. Optional blocks model hardware that may simply
//! not exist on a given machine.

use serde::{Deserialize, Serialize};

use super::PlatformKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub name: String,
    pub kind: PlatformKind,
    pub pes: Vec<PeProfile>,
    #[serde(default)]
    pub gic: GicBlock,
    #[serde(default)]
    pub timer: TimerBlock,
    #[serde(default)]
    pub watchdog: WatchdogBlock,
    #[serde(default)]
    pub memory: Vec<MemoryRegion>,
    #[serde(default)]
    pub peripherals: PeripheralBlock,
    #[serde(default)]
    pub pcie: Option<PcieBlock>,
    #[serde(default)]
    pub smmu: Option<SmmuBlock>,
    #[serde(default)]
    pub pmu: PmuBlock,
    #[serde(default)]
    pub ras: Option<RasBlock>,
    #[serde(default)]
    pub mpam: Option<MpamBlock>,
    #[serde(default)]
    pub pfdi: PfdiBlock,
}

impl PlatformProfile {
    pub fn pe_count(&self) -> u32 {
        self.pes.len() as u32
    }

    /// Panics if `pe` is out of range; callers validate indices at the
    /// dispatch boundary.
    pub fn pe(&self, pe: u32) -> &PeProfile {
        &self.pes[pe as usize]
    }

    pub fn quirk(&self, pe: u32) -> PeQuirk {
        self.pe(pe).quirk
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeProfile {
    pub id: u64,
    #[serde(default)]
    pub revision: u32,
    #[serde(default = "default_true")]
    pub aa64: bool,
    #[serde(default = "default_cache_line")]
    pub cache_line_bytes: u32,
    #[serde(default)]
    pub crypto: bool,
    #[serde(default)]
    pub ras_ext: bool,
    #[serde(default)]
    pub mpam_regs: bool,
    #[serde(default)]
    pub brbe: bool,
    #[serde(default)]
    pub spe: bool,
    #[serde(default)]
    pub mte: bool,
    #[serde(default)]
    pub ras_records: u32,
    #[serde(default)]
    pub quirk: PeQuirk,
}

/// Simulated misbehavior of a single PE. `Mute` never reports back,
/// `Slow` reports after a long delay, `Faulty` fails its firmware
/// self-test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeQuirk {
    #[default]
    Normal,
    Mute,
    Slow,
    Faulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GicBlock {
    pub version: u32,
    #[serde(default)]
    pub its_count: u32,
    #[serde(default = "default_el1_timer_ppi")]
    pub el1_timer_ppi: u32,
    #[serde(default)]
    pub watchdog_ws0_ppi: u32,
}

impl Default for GicBlock {
    fn default() -> Self {
        Self {
            version: 3,
            its_count: 1,
            el1_timer_ppi: default_el1_timer_ppi(),
            watchdog_ws0_ppi: 28,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerBlock {
    pub counter_freq_hz: u64,
    #[serde(default = "default_true")]
    pub wakeup_capable: bool,
    #[serde(default)]
    pub scaling: bool,
}

impl Default for TimerBlock {
    fn default() -> Self {
        Self {
            counter_freq_hz: 100_000_000,
            wakeup_capable: true,
            scaling: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogBlock {
    pub count: u32,
    #[serde(default = "default_true")]
    pub dual_signal: bool,
}

impl Default for WatchdogBlock {
    fn default() -> Self {
        Self {
            count: 1,
            dual_signal: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub base: u64,
    pub size: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeripheralBlock {
    pub usb_count: u32,
    pub uart_count: u32,
    pub sata_count: u32,
}

impl Default for PeripheralBlock {
    fn default() -> Self {
        Self {
            usb_count: 1,
            uart_count: 1,
            sata_count: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcieBlock {
    pub ecam_present: bool,
    #[serde(default = "default_one")]
    pub segments: u32,
    #[serde(default)]
    pub exerciser_present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmmuBlock {
    pub version_major: u32,
    #[serde(default)]
    pub stage2: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmuBlock {
    pub counters: u32,
    #[serde(default)]
    pub extended: bool,
}

impl Default for PmuBlock {
    fn default() -> Self {
        Self {
            counters: 4,
            extended: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasBlock {
    pub node_count: u32,
    #[serde(default)]
    pub fault_injection: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpamBlock {
    pub msc_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PfdiBlock {
    pub version_major: u16,
    pub version_minor: u16,
    /// Function identifiers the firmware implements.
    #[serde(default = "default_pfdi_functions")]
    pub functions: Vec<u32>,
    #[serde(default = "default_test_id")]
    pub test_id: u32,
    #[serde(default = "default_one")]
    pub part_count: u32,
    /// Must read back as zero through every version query.
    #[serde(default)]
    pub reserved: u64,
}

impl Default for PfdiBlock {
    fn default() -> Self {
        Self {
            version_major: 1,
            version_minor: 0,
            functions: default_pfdi_functions(),
            test_id: default_test_id(),
            part_count: default_one(),
            reserved: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

fn default_cache_line() -> u32 {
    64
}

fn default_el1_timer_ppi() -> u32 {
    30
}

fn default_test_id() -> u32 {
    0x1001
}

fn default_pfdi_functions() -> Vec<u32> {
    super::pfdi::function::MANDATORY.to_vec()
}
