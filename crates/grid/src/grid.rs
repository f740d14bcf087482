use alphagrid_common::BlockCoord;

use crate::alpha::AlphaBuffer;

/// One cell of the solidity grid.
///
/// `solid` is set at construction, `edge`/`edge_of_texture` by
/// classification and `done` by decomposition. None of them is ever cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Block {
    pub(crate) solid: bool,
    pub(crate) edge: bool,
    pub(crate) edge_of_texture: bool,
    pub(crate) done: bool,
}

impl Block {
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn is_edge(&self) -> bool {
        self.edge
    }

    pub fn is_edge_of_texture(&self) -> bool {
        self.edge_of_texture
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether this block may belong to a grown region footprint.
    pub fn is_free(&self) -> bool {
        !(self.edge || self.done || self.edge_of_texture)
    }
}

/// Downsampled boolean grid of solid blocks.
///
/// Dimensions are `floor(pixel_width / block) x floor(pixel_height / block)`;
/// pixels past the last whole block are never sampled.
#[derive(Debug, Clone)]
pub struct SolidityGrid {
    width: u32,
    height: u32,
    blocks: Vec<Block>,
}

impl SolidityGrid {
    /// Build the grid from an alpha buffer.
    ///
    /// A block is solid when the mean alpha of its pixels is strictly above
    /// `transparent_threshold`. An image smaller than one block produces an
    /// empty grid.
    pub fn build(buffer: &AlphaBuffer, min_block_size: u32, transparent_threshold: u8) -> Self {
        let _span = tracing::info_span!("solidity_grid_build").entered();
        let block = min_block_size.max(1);
        let width = buffer.width() / block;
        let height = buffer.height() / block;
        let mut grid = Self::empty(width, height);

        if width == 0 || height == 0 {
            tracing::info!(
                pixel_width = buffer.width(),
                pixel_height = buffer.height(),
                block,
                "image smaller than one block, grid is empty"
            );
            return grid;
        }

        let pixels_per_block = u64::from(block) * u64::from(block);
        let limit = u64::from(transparent_threshold) * pixels_per_block;
        let mut solid_count = 0usize;
        for by in 0..height {
            for bx in 0..width {
                let mut sum = 0u64;
                for py in by * block..(by + 1) * block {
                    for px in bx * block..(bx + 1) * block {
                        sum += u64::from(buffer.get(px, py).unwrap_or(0));
                    }
                }
                // mean > threshold, kept in integers
                if sum > limit {
                    grid.blocks[(by * width + bx) as usize].solid = true;
                    solid_count += 1;
                }
            }
        }

        tracing::debug!(width, height, solid = solid_count, "solidity grid built");
        grid
    }

    /// Grid of the given size with solidity taken from a predicate.
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut grid = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.blocks[(y * width + x) as usize].solid = solid(x, y);
            }
        }
        grid
    }

    fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blocks: vec![Block::default(); width as usize * height as usize],
        }
    }

    /// Width in blocks.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in blocks.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, coord: BlockCoord) -> Option<&Block> {
        self.index(coord).map(|i| &self.blocks[i])
    }

    pub(crate) fn get_mut(&mut self, coord: BlockCoord) -> Option<&mut Block> {
        self.index(coord).map(|i| &mut self.blocks[i])
    }

    /// Whether `x`/`y` addresses a block in the grid.
    pub fn contains(&self, coord: BlockCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Mark a block as consumed by a region. Returns false if out of range.
    pub fn mark_done(&mut self, coord: BlockCoord) -> bool {
        match self.get_mut(coord) {
            Some(block) => {
                block.done = true;
                true
            }
            None => false,
        }
    }

    /// Iterate blocks in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (BlockCoord, &Block)> {
        let width = self.width;
        self.blocks.iter().enumerate().map(move |(i, b)| {
            let i = i as u32;
            (BlockCoord::new(i % width, i / width), b)
        })
    }

    /// Number of solid blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.solid).count()
    }

    /// Number of blocks consumed by regions.
    pub fn done_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.done).count()
    }

    fn index(&self, coord: BlockCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }
}
