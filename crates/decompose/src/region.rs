use alphagrid_common::{BlockCoord, RegionLevel};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned square collider footprint in grid space.
///
/// `origin` is the top-left block. Everything else derives from `origin`
/// and `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub origin: BlockCoord,
    pub level: RegionLevel,
}

impl Region {
    pub fn new(origin: BlockCoord, level: RegionLevel) -> Self {
        Self { origin, level }
    }

    /// Center in block units: a level-0 region at (3, 4) is centred on (3.5, 4.5).
    pub fn center(&self) -> Vec2 {
        self.origin.as_vec2() + Vec2::splat(self.side() as f32 / 2.0)
    }

    /// Side length in blocks.
    pub fn side(&self) -> u32 {
        self.level.units()
    }

    /// Area in blocks.
    pub fn area(&self) -> u64 {
        u64::from(self.side()) * u64::from(self.side())
    }

    /// Whether a block lies inside this region's footprint.
    pub fn covers(&self, coord: BlockCoord) -> bool {
        let side = self.side();
        coord.x >= self.origin.x
            && coord.y >= self.origin.y
            && coord.x - self.origin.x < side
            && coord.y - self.origin.y < side
    }

    /// Every block of the footprint in row-major order.
    pub fn footprint(&self) -> impl Iterator<Item = BlockCoord> {
        let Self { origin, .. } = *self;
        let side = self.side();
        (0..side).flat_map(move |dy| (0..side).map(move |dx| BlockCoord::new(origin.x + dx, origin.y + dy)))
    }

    /// The four half-size children tiling this footprint, or `None` at the
    /// minimum level.
    ///
    /// Children are ordered top-left, top-right, bottom-left, bottom-right;
    /// each center sits a quarter side away from the parent center on both axes.
    pub fn quadrants(&self) -> Option<[Region; 4]> {
        let level = self.level.halved()?;
        let half = level.units();
        let BlockCoord { x, y } = self.origin;
        Some([
            Region::new(BlockCoord::new(x, y), level),
            Region::new(BlockCoord::new(x + half, y), level),
            Region::new(BlockCoord::new(x, y + half), level),
            Region::new(BlockCoord::new(x + half, y + half), level),
        ])
    }
}
