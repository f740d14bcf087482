//! Image sources for decomposition: PNG alpha loading, world placement and
//! circular mask carving.
//!
//! Carving edits the pixel buffer only. Colliders built from an earlier
//! decomposition are not updated by it.

use alphagrid_grid::{AlphaBuffer, GridError};
use glam::{IVec2, Vec2};
use std::path::Path;

/// Errors from image loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("grid input error: {0}")]
    Grid(#[from] GridError),
    #[error("world size must be positive, got {0}")]
    WorldSize(Vec2),
}

/// Anything that can hand the decomposer an alpha buffer and place it in the world.
pub trait ImageSource {
    /// Copy of the current alpha channel.
    fn alpha_buffer(&self) -> AlphaBuffer;
    fn pixel_width(&self) -> u32;
    fn pixel_height(&self) -> u32;
    /// World extent covered by the whole image.
    fn world_size(&self) -> Vec2;
    /// World position of the image centre.
    fn world_origin(&self) -> Vec2;
}

/// An image's alpha channel placed in the world.
///
/// Pixel row 0 is the top of the image; world y grows upwards.
#[derive(Debug, Clone)]
pub struct AlphaImage {
    alpha: AlphaBuffer,
    world_size: Vec2,
    world_origin: Vec2,
    dirty: bool,
}

impl AlphaImage {
    pub fn new(alpha: AlphaBuffer, world_size: Vec2, world_origin: Vec2) -> Result<Self, ImageError> {
        if !(world_size.x > 0.0 && world_size.y > 0.0) {
            return Err(ImageError::WorldSize(world_size));
        }
        Ok(Self {
            alpha,
            world_size,
            world_origin,
            dirty: false,
        })
    }

    /// Load a PNG and keep its alpha channel.
    pub fn open(
        path: impl AsRef<Path>,
        world_size: Vec2,
        world_origin: Vec2,
    ) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::info!(?path, width, height, "loaded image");
        let alpha = AlphaBuffer::from_rgba8(width, height, rgba.as_raw())?;
        Self::new(alpha, world_size, world_origin)
    }

    /// Load a PNG whose world size follows from a pixels-per-unit ratio.
    pub fn open_with_ppu(
        path: impl AsRef<Path>,
        pixels_per_unit: f32,
        world_origin: Vec2,
    ) -> Result<Self, ImageError> {
        let mut image = Self::open(path, Vec2::ONE, world_origin)?;
        let pixels = Vec2::new(image.alpha.width() as f32, image.alpha.height() as f32);
        let world_size = pixels / pixels_per_unit;
        if !(world_size.x > 0.0 && world_size.y > 0.0) {
            return Err(ImageError::WorldSize(world_size));
        }
        image.world_size = world_size;
        Ok(image)
    }

    /// Decode an in-memory PNG.
    pub fn from_png_bytes(bytes: &[u8], world_size: Vec2, world_origin: Vec2) -> Result<Self, ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let alpha = AlphaBuffer::from_rgba8(width, height, rgba.as_raw())?;
        Self::new(alpha, world_size, world_origin)
    }

    /// Write the alpha channel as a greyscale-plus-alpha PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let pixels: Vec<u8> = self.alpha.as_slice().iter().flat_map(|&a| [255, a]).collect();
        image::save_buffer(
            path.as_ref(),
            &pixels,
            self.alpha.width(),
            self.alpha.height(),
            image::ExtendedColorType::La8,
        )?;
        Ok(())
    }

    pub fn alpha(&self) -> &AlphaBuffer {
        &self.alpha
    }

    /// Pixel coordinate nearest to a world position. May lie outside the image.
    pub fn world_to_pixel(&self, world: Vec2) -> IVec2 {
        let w = self.alpha.width() as f32;
        let h = self.alpha.height() as f32;
        let d = world - self.world_origin;
        IVec2::new(
            (0.5 * w + d.x * w / self.world_size.x).round() as i32,
            (0.5 * h - d.y * h / self.world_size.y).round() as i32,
        )
    }

    /// Make a circular area fully transparent.
    ///
    /// The radius is converted with the horizontal pixels-per-unit ratio.
    /// A pixel at column offset `dx` from the centre is cleared when
    /// `dx <= r` and its row offset is at most `round(sqrt(r² - dx²))`.
    /// Only columns and rows inside the image are visited, so the cost is
    /// bounded by the image size whatever the radius. Returns the number of
    /// pixels whose alpha changed.
    pub fn carve_circle(&mut self, center_world: Vec2, radius_world: f32) -> usize {
        let c = self.world_to_pixel(center_world).as_i64vec2();
        let (w, h) = (i64::from(self.alpha.width()), i64::from(self.alpha.height()));
        let scaled = f64::from(radius_world.max(0.0)) * w as f64 / f64::from(self.world_size.x);
        // Any radius past the farthest image corner clears the same pixels.
        let reach = (c.x.abs() + w).max(c.y.abs() + h) * 2;
        let r = if scaled.is_finite() { (scaled.round() as i64).min(reach) } else { reach };

        let mut cleared = 0;
        for px in (c.x - r).max(0)..(c.x + r + 1).min(w) {
            let dx = (px - c.x) as f64;
            let rf = r as f64;
            let d = (rf * rf - dx * dx).max(0.0).sqrt().round() as i64;
            for py in (c.y - d).max(0)..(c.y + d + 1).min(h) {
                cleared += usize::from(self.clear_pixel(px, py));
            }
        }
        if cleared > 0 {
            self.dirty = true;
        }
        tracing::debug!(cx = c.x, cy = c.y, r, cleared, "carved circle");
        cleared
    }

    /// Whether the image changed since the last call; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `x`/`y` must lie inside the image.
    fn clear_pixel(&mut self, x: i64, y: i64) -> bool {
        let index = y as usize * self.alpha.width() as usize + x as usize;
        let slot = &mut self.alpha.as_mut_slice()[index];
        let changed = *slot != 0;
        *slot = 0;
        changed
    }
}

impl ImageSource for AlphaImage {
    fn alpha_buffer(&self) -> AlphaBuffer {
        self.alpha.clone()
    }

    fn pixel_width(&self) -> u32 {
        self.alpha.width()
    }

    fn pixel_height(&self) -> u32 {
        self.alpha.height()
    }

    fn world_size(&self) -> Vec2 {
        self.world_size
    }

    fn world_origin(&self) -> Vec2 {
        self.world_origin
    }
}

pub fn crate_info() -> &'static str {
    "alphagrid-assets v0.1.0"
}
