/// Decoded image buffers and the decoder seam
use std::path::Path;

use crate::error::{Result, ViewerError};

/// Packed RGBA8 pixels, row-major from the top-left texel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl DecodedImage {
    /// Wrap a pixel buffer, checking it matches the dimensions
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || byte_len(width, height) != Some(pixels.len()) {
            return Err(ViewerError::InvalidImage {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self { pixels, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// RGBA of the texel at `(x, y)`, which must be in bounds
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        rgba
    }

    /// Two-tone checkerboard used when no image file is given
    pub fn checkerboard(width: u32, height: u32, cell: u32, light: [u8; 4], dark: [u8; 4]) -> Result<Self> {
        let cell = cell.max(1);
        let len = byte_len(width, height).ok_or(ViewerError::InvalidImage { width, height, len: 0 })?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                let texel = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
                pixels.extend_from_slice(&texel);
            }
        }
        Self::from_rgba(width, height, pixels)
    }
}

/// RGBA8 buffer size, or `None` when it does not fit in memory
fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|texels| texels.checked_mul(4))
}

/// Turns a file into pixels. Implementations must not touch viewer state.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}

/// Decodes png, jpeg, bmp and gif files with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let decoded = image::open(path).map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {} ({}x{})", path.display(), width, height);
        DecodedImage::from_rgba(width, height, rgba.into_raw())
    }
}
