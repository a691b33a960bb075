//! Multi-PE coordination: the shared status board, per-PE result
//! buffers, and the rendezvous that drives a worker across all PEs.

pub mod board;
pub mod rendezvous;
pub mod results;
