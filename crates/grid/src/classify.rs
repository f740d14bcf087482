use alphagrid_common::BlockCoord;
use serde::Serialize;

use crate::grid::SolidityGrid;

/// Aggregate results of one classification pass, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassifyStats {
    /// Solid blocks inside the classified range.
    pub classified: usize,
    /// Blocks marked `edge`.
    pub edge_count: usize,
    /// Blocks marked `edge_of_texture`.
    pub texture_boundary_count: usize,
    /// Smallest neighbour count seen, `None` when nothing was classified.
    pub min_neighbors: Option<u8>,
    /// Largest neighbour count seen, `None` when nothing was classified.
    pub max_neighbors: Option<u8>,
}

/// Mark edge and texture-boundary blocks.
///
/// The classified range excludes the grid's last row and column. Within it,
/// a solid block is `edge_of_texture` on the first row/column or on the last
/// one of the range, where the far-side test compares `x` against the height
/// and `y` against the width. That axis swap is kept for compatibility with
/// existing collider layouts; on square grids it makes no difference.
///
/// The 3x3 neighbour count includes the block itself and is clipped to the
/// classified range. A count at or below `neighbor_threshold` makes the
/// block an `edge`.
pub fn classify(grid: &mut SolidityGrid, neighbor_threshold: u8) -> ClassifyStats {
    let _span = tracing::info_span!("edge_classify").entered();
    let range_w = grid.width().saturating_sub(1);
    let range_h = grid.height().saturating_sub(1);
    let (width, height) = (grid.width(), grid.height());
    let mut stats = ClassifyStats::default();

    for y in 0..range_h {
        for x in 0..range_w {
            let coord = BlockCoord::new(x, y);
            if !grid.get(coord).is_some_and(|b| b.is_solid()) {
                continue;
            }

            let boundary = x == 0 || y == 0 || x + 2 >= height || y + 2 >= width;
            let neighbors = solid_neighbors(grid, coord, range_w, range_h);
            let edge = neighbors <= neighbor_threshold;

            if let Some(block) = grid.get_mut(coord) {
                block.edge_of_texture = boundary;
                block.edge = edge;
            }

            stats.classified += 1;
            stats.edge_count += usize::from(edge);
            stats.texture_boundary_count += usize::from(boundary);
            stats.min_neighbors = Some(stats.min_neighbors.map_or(neighbors, |m| m.min(neighbors)));
            stats.max_neighbors = Some(stats.max_neighbors.map_or(neighbors, |m| m.max(neighbors)));
            tracing::trace!(x, y, neighbors, edge, boundary, "classified block");
        }
    }

    tracing::info!(
        classified = stats.classified,
        edges = stats.edge_count,
        min = ?stats.min_neighbors,
        max = ?stats.max_neighbors,
        "edge classification complete"
    );
    stats
}

fn solid_neighbors(grid: &SolidityGrid, center: BlockCoord, range_w: u32, range_h: u32) -> u8 {
    let mut count = 0;
    for j in center.y.saturating_sub(1)..=(center.y + 1).min(range_h - 1) {
        for i in center.x.saturating_sub(1)..=(center.x + 1).min(range_w - 1) {
            if grid.get(BlockCoord::new(i, j)).is_some_and(|b| b.is_solid()) {
                count += 1;
            }
        }
    }
    count
}
