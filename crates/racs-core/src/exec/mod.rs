//! The execution engine: status algebra, run-wide context, the test
//! entry registry, and the rule runner itself.

pub mod context;
pub mod registry;
pub mod runner;
pub mod status;
