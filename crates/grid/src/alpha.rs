/// Errors from building grid inputs.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("alpha buffer holds {actual} values, expected {expected} ({width}x{height})")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Row-major per-pixel transparency values, `width * height` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, GridError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(GridError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer where every pixel has the same alpha.
    pub fn filled(width: u32, height: u32, alpha: u8) -> Self {
        Self {
            width,
            height,
            data: vec![alpha; width as usize * height as usize],
        }
    }

    /// Extract the alpha channel from tightly packed RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, GridError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(GridError::BufferSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        let data = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at a pixel, or `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
