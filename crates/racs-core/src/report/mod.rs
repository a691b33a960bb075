//! Report assembly and rendering: the JSON contract plus the classic
//! START/END console form.

pub mod model;
pub mod render;
