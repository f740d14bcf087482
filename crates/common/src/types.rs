use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ConfigError;

/// Opaque handle for a physical object created by the spawn collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(pub Uuid);

impl ObjectHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of a block in the solidity grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCoord {
    pub x: u32,
    pub y: u32,
}

impl BlockCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Grid-space position of this block's top-left corner.
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Size of a square region expressed as a power of two of the minimum unit.
///
/// Level 0 is a single block; level `n` spans `2^n` blocks per side. Any
/// value of this type is a valid power-of-two size that fits a `u32` side,
/// so code that only holds a `RegionLevel` never needs to re-check it.
/// Deserialisation goes through the same check as [`RegionLevel::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RegionLevel(u8);

impl RegionLevel {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(31);

    /// Level from its exponent; fails above [`RegionLevel::MAX`].
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if level > Self::MAX.0 {
            return Err(ConfigError::LevelOutOfRange(level));
        }
        Ok(Self(level))
    }

    /// Convert a side length in minimum units to a level.
    pub fn from_units(units: u32) -> Result<Self, ConfigError> {
        if units == 0 || !units.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(units));
        }
        Ok(Self(units.trailing_zeros() as u8))
    }

    /// The exponent.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Side length in minimum units.
    pub fn units(self) -> u32 {
        1 << self.0
    }

    pub fn is_min(self) -> bool {
        self.0 == 0
    }

    /// The level one step down, or `None` at the minimum.
    pub fn halved(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl TryFrom<u8> for RegionLevel {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<RegionLevel> for u8 {
    fn from(level: RegionLevel) -> Self {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_handle_uniqueness() {
        let a = ObjectHandle::new();
        let b = ObjectHandle::new();
        assert_ne!(a, b);
    }

    #[test]
    fn level_from_power_of_two_units() {
        assert_eq!(RegionLevel::from_units(1).unwrap(), RegionLevel::MIN);
        assert_eq!(RegionLevel::from_units(8).unwrap().get(), 3);
        assert_eq!(RegionLevel::new(3).unwrap().units(), 8);
        assert_eq!(RegionLevel::from_units(1 << 31).unwrap(), RegionLevel::MAX);
    }

    #[test]
    fn level_rejects_other_magnitudes() {
        assert!(matches!(
            RegionLevel::from_units(6),
            Err(ConfigError::NotPowerOfTwo(6))
        ));
        assert!(RegionLevel::from_units(0).is_err());
    }

    #[test]
    fn halving_stops_at_minimum() {
        let two = RegionLevel::new(2).unwrap();
        assert_eq!(two.halved(), RegionLevel::new(1).ok());
        assert_eq!(RegionLevel::MIN.halved(), None);
        assert!(RegionLevel::MIN.is_min());
    }

    #[test]
    fn level_above_max_is_rejected() {
        assert!(matches!(
            RegionLevel::new(32),
            Err(ConfigError::LevelOutOfRange(32))
        ));
        assert_eq!(RegionLevel::MAX.units(), 1 << 31);
    }

    #[test]
    fn level_deserialises_through_range_check() {
        let level: RegionLevel = serde_json::from_str("5").unwrap();
        assert_eq!(level.units(), 32);
        assert!(serde_json::from_str::<RegionLevel>("40").is_err());
        assert_eq!(serde_json::to_string(&level).unwrap(), "5");
    }
}
