pub mod catalog;
pub mod exec;
pub mod pe;
pub mod platform;
pub mod report;
pub mod select;
pub mod suite;

pub const TOOL_NAME: &str = "racs";

/// JSON schema version of run reports.
/// This must be bumped only when the report contract changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

pub const RULE_CATALOG_VERSION: &str = "0.1.0";
