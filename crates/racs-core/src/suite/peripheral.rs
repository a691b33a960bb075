//! Peripheral checks.
//!
//! USB and SATA are recommendations, so their absence warns. A UART is
//! the one hard requirement since every compliance flow needs a
//! console.

use crate::catalog::ids::TestEntryId;
use crate::exec::registry::{EntryRegistry, TestContext};
use crate::exec::status::TestStatus;

pub(crate) fn register(registry: &mut EntryRegistry) {
    registry.register(TestEntryId::Per001, per001);
    registry.register(TestEntryId::Per002, per002);
    registry.register(TestEntryId::Per003, per003);
}

fn per001(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().peripherals.usb_count >= 1 {
        TestStatus::Pass
    } else {
        TestStatus::Warn
    }
}

fn per002(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().peripherals.uart_count >= 1 {
        TestStatus::Pass
    } else {
        TestStatus::Fail
    }
}

fn per003(ctx: &TestContext<'_>) -> TestStatus {
    if ctx.description().peripherals.sata_count >= 1 {
        TestStatus::Pass
    } else {
        TestStatus::Warn
    }
}
