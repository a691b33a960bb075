//! The test payloads, one module per hardware area. Each module
//! registers its entries; [`register_entries`] wires up the full
//! suite.

pub mod gic;
pub mod memory;
pub mod mpam;
pub mod pcie;
pub mod pe;
pub mod peripheral;
pub mod pfdi;
pub mod pmu;
pub mod ras;
pub mod smmu;
pub mod timer;
pub mod watchdog;

use crate::exec::registry::EntryRegistry;

/// Register every payload the suite ships.
pub fn register_entries(registry: &mut EntryRegistry) {
    pe::register(registry);
    gic::register(registry);
    timer::register(registry);
    watchdog::register(registry);
    memory::register(registry);
    peripheral::register(registry);
    pcie::register(registry);
    smmu::register(registry);
    pmu::register(registry);
    ras::register(registry);
    mpam::register(registry);
    pfdi::register(registry);
}
