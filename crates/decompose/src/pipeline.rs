use alphagrid_common::{ConfigError, DecomposeConfig};
use alphagrid_grid::{AlphaBuffer, ClassifyStats, SolidityGrid, classify};
use serde::Serialize;

use crate::decomposer::decompose;
use crate::region::Region;

/// Result of a full build, classify and decompose pass over one image.
#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    /// Grid width in blocks.
    pub grid_width: u32,
    /// Grid height in blocks.
    pub grid_height: u32,
    pub solid_blocks: usize,
    pub stats: ClassifyStats,
    pub regions: Vec<Region>,
}

impl Decomposition {
    /// Total region area in blocks.
    pub fn covered_blocks(&self) -> u64 {
        self.regions.iter().map(Region::area).sum()
    }
}

/// Run the one-shot decomposition pass over an alpha buffer.
///
/// The config is validated before anything else. Degenerate input (an
/// image smaller than one block, or no solid block at all) is not an
/// error: it is logged and yields an empty region set.
pub fn decompose_buffer(
    buffer: &AlphaBuffer,
    config: &DecomposeConfig,
) -> Result<Decomposition, ConfigError> {
    let max_level = config
        .max_level()
        .inspect_err(|err| tracing::error!(%err, "invalid decomposition config"))?;
    let _span = tracing::info_span!("decompose", w = buffer.width(), h = buffer.height()).entered();

    let mut grid = SolidityGrid::build(buffer, config.min_block_size, config.transparent_threshold);
    let solid_blocks = grid.solid_count();
    if solid_blocks == 0 {
        tracing::info!("no solid blocks, nothing to decompose");
        return Ok(Decomposition {
            grid_width: grid.width(),
            grid_height: grid.height(),
            solid_blocks,
            stats: ClassifyStats::default(),
            regions: Vec::new(),
        });
    }

    let stats = classify(&mut grid, config.edge_neighbor_threshold);
    let regions: Vec<Region> = decompose(&mut grid, max_level).collect();
    tracing::info!(regions = regions.len(), solid = solid_blocks, "decomposition complete");

    Ok(Decomposition {
        grid_width: grid.width(),
        grid_height: grid.height(),
        solid_blocks,
        stats,
        regions,
    })
}
