use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::RegionLevel;

/// Errors from configuration validation and loading. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("edge neighbor threshold {0} outside 6..=8")]
    EdgeNeighborThreshold(u8),
    #[error("min block size must be at least 1 pixel")]
    MinBlockSize,
    #[error("max region size {max} is not a multiple of min block size {min}")]
    MaxRegionSize { max: u32, min: u32 },
    #[error("region size {0} is not a power of two")]
    NotPowerOfTwo(u32),
    #[error("region level {0} exceeds the largest representable level")]
    LevelOutOfRange(u8),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameters for one decomposition pass.
///
/// `transparent_threshold` is a `u8`, so the 0..=255 range holds by
/// construction. Sizes are in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// A block is solid when its mean alpha is strictly above this.
    pub transparent_threshold: u8,
    /// A solid block with at most this many solid neighbours (itself included) is an edge.
    pub edge_neighbor_threshold: u8,
    /// Side of one grid block, in pixels.
    pub min_block_size: u32,
    /// Largest region side, in pixels.
    pub max_region_size: u32,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            transparent_threshold: 128,
            edge_neighbor_threshold: 8,
            min_block_size: 4,
            max_region_size: 32,
        }
    }
}

impl DecomposeConfig {
    /// Check every range constraint. Call before any decomposition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(6..=8).contains(&self.edge_neighbor_threshold) {
            return Err(ConfigError::EdgeNeighborThreshold(
                self.edge_neighbor_threshold,
            ));
        }
        if self.min_block_size == 0 {
            return Err(ConfigError::MinBlockSize);
        }
        if self.max_region_size == 0 || self.max_region_size % self.min_block_size != 0 {
            return Err(ConfigError::MaxRegionSize {
                max: self.max_region_size,
                min: self.min_block_size,
            });
        }
        RegionLevel::from_units(self.max_region_size / self.min_block_size)?;
        Ok(())
    }

    /// Largest region level permitted by `max_region_size`.
    pub fn max_level(&self) -> Result<RegionLevel, ConfigError> {
        self.validate()?;
        RegionLevel::from_units(self.max_region_size / self.min_block_size)
    }

    /// Load and validate a config file. `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&data)?,
            _ => serde_yaml::from_str(&data)?,
        };
        config.validate()?;
        Ok(config)
    }
}
