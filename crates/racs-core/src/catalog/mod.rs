//! The rule catalog: identifiers, the per-rule capability table, alias
//! expansions, and the architecture presets a run list starts from.

pub mod alias;
pub mod ids;
pub mod presets;
pub mod table;
