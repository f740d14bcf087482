//! Region decomposition: grow maximal squares over the interior of a
//! classified solidity grid.
//!
//! # Invariants
//! - Region sides are powers of two between one block and the configured maximum.
//! - Footprints never overlap: growth only covers blocks not yet `done`.
//! - Every `done` block belongs to exactly one emitted region.

mod decomposer;
mod pipeline;
mod region;

pub use decomposer::{Decomposer, decompose};
pub use pipeline::{Decomposition, decompose_buffer};
pub use region::Region;

pub fn crate_info() -> &'static str {
    "alphagrid-decompose v0.1.0"
}
