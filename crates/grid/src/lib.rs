//! Solidity grid: downsample an alpha buffer into solid blocks, then
//! classify edge and texture-boundary blocks.
//!
//! # Invariants
//! - Grid dimensions are the floor of pixel size over block size.
//! - Classification flags are written once per pass and never cleared.
//! - `done` marks only ever go from false to true.

mod alpha;
mod classify;
mod grid;

pub use alpha::{AlphaBuffer, GridError};
pub use classify::{ClassifyStats, classify};
pub use grid::{Block, SolidityGrid};

pub fn crate_info() -> &'static str {
    "alphagrid-grid v0.1.0"
}
