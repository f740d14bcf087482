use alphagrid_common::{BlockCoord, RegionLevel};
use alphagrid_grid::SolidityGrid;

use crate::region::Region;

/// Lazy greedy decomposition of a classified grid into square regions.
///
/// Blocks are visited in row-major order. Each solid block that is neither
/// on the texture boundary nor already consumed seeds a square that grows
/// by doubling until its footprint hits an `edge`, `done` or boundary
/// block, leaves the classified range, or reaches the maximum level.
///
/// Growth starts from a half-unit probe. On failure the side shrinks to a
/// quarter of the failed candidate, so a square that failed at level `n`
/// is emitted at level `n - 2`, and nothing is emitted when that falls
/// below the minimum. Success at the maximum level clamps there.
///
/// The iterator consumes grid state (`done` marks) and cannot be restarted.
pub struct Decomposer<'g> {
    grid: &'g mut SolidityGrid,
    max_level: RegionLevel,
    cursor: u32,
    emitted: usize,
}

impl<'g> Decomposer<'g> {
    pub fn new(grid: &'g mut SolidityGrid, max_level: RegionLevel) -> Self {
        Self {
            grid,
            max_level,
            cursor: 0,
            emitted: 0,
        }
    }

    /// Number of regions produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn is_seed(&self, coord: BlockCoord) -> bool {
        self.grid
            .get(coord)
            .is_some_and(|b| b.is_solid() && !b.is_edge_of_texture() && !b.is_done())
    }

    /// Final level for a seed, or `None` if the square collapsed below one block.
    fn grow(&self, seed: BlockCoord) -> Option<RegionLevel> {
        let max = i32::from(self.max_level.get());
        // -1 is the half-unit probe
        let mut exp: i32 = -1;
        loop {
            if self.blocked(seed, exp) {
                let shrunk = exp - 2;
                return u8::try_from(shrunk).ok().and_then(|l| RegionLevel::new(l).ok());
            }
            if exp >= max {
                return Some(self.max_level);
            }
            exp += 1;
        }
    }

    fn blocked(&self, seed: BlockCoord, exp: i32) -> bool {
        // The half-unit probe covers no whole block; only bounds apply.
        let side = if exp < 0 { 0 } else { 1u64 << exp };
        let range_w = u64::from(self.grid.width().saturating_sub(1));
        let range_h = u64::from(self.grid.height().saturating_sub(1));
        if u64::from(seed.x) + side > range_w || u64::from(seed.y) + side > range_h {
            return true;
        }
        // side fits in the grid here, so the narrowing is lossless
        let side = side as u32;
        for y in seed.y..seed.y + side {
            for x in seed.x..seed.x + side {
                if !self.grid.get(BlockCoord::new(x, y)).is_some_and(|b| b.is_free()) {
                    return true;
                }
            }
        }
        false
    }
}

impl Iterator for Decomposer<'_> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        let width = self.grid.width();
        let total = width.saturating_mul(self.grid.height());
        while self.cursor < total {
            let seed = BlockCoord::new(self.cursor % width, self.cursor / width);
            self.cursor += 1;
            if !self.is_seed(seed) {
                continue;
            }
            let Some(level) = self.grow(seed) else {
                tracing::trace!(?seed, "seed collapsed below minimum size");
                continue;
            };
            let region = Region::new(seed, level);
            for coord in region.footprint() {
                self.grid.mark_done(coord);
            }
            self.emitted += 1;
            tracing::debug!(?seed, level = level.get(), "region grown");
            return Some(region);
        }
        None
    }
}

/// Decompose a classified grid, one region per grown square.
pub fn decompose(grid: &mut SolidityGrid, max_level: RegionLevel) -> Decomposer<'_> {
    Decomposer::new(grid, max_level)
}
