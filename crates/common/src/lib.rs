//! Shared types for the alphagrid workspace: handles, block coordinates,
//! region levels and the decomposition configuration.

pub mod config;
pub mod types;

pub use config::{ConfigError, DecomposeConfig};
pub use types::{BlockCoord, ObjectHandle, RegionLevel};
