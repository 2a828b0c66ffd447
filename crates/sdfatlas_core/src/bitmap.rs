//! Binary grayscale bitmap that glyphs are rasterized into

use crate::{AtlasError, Result};

/// Samples strictly above this value are "inside" a glyph
pub const INSIDE_THRESHOLD: u8 = 0x7f;

/// Value written for covered pixels
pub const INSIDE: u8 = 0xff;

/// Value written for uncovered pixels
pub const OUTSIDE: u8 = 0x00;

/// Single-channel 8-bit bitmap, row-major with no row padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayscaleBitmap {
    /// Create an all-outside bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![OUTSIDE; width as usize * height as usize],
        }
    }

    /// Wrap existing samples
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(AtlasError::InvalidBitmap(format!(
                "{}x{} bitmap needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a bitmap from a predicate over pixel coordinates
    pub fn from_fn(width: u32, height: u32, mut inside: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bitmap = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if inside(x, y) {
                    bitmap.set(x, y, INSIDE);
                }
            }
        }
        bitmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        let width = self.width as usize;
        self.data[y as usize * width + x as usize] = value;
    }

    #[inline]
    pub fn is_inside(&self, x: u32, y: u32) -> bool {
        self.get(x, y) > INSIDE_THRESHOLD
    }

    /// Snap every sample to [`INSIDE`] or [`OUTSIDE`]
    pub fn threshold(&mut self) {
        for sample in &mut self.data {
            *sample = if *sample > INSIDE_THRESHOLD {
                INSIDE
            } else {
                OUTSIDE
            };
        }
    }

    /// Draw a coverage mask with its top-left corner at `(left, top)`.
    ///
    /// Coverage is thresholded while drawing and merged with what is already
    /// there, so overlapping glyphs never erase each other. Pixels falling
    /// outside the bitmap are dropped.
    pub fn draw_mask(&mut self, left: i32, top: i32, width: u32, height: u32, coverage: &[u8]) {
        debug_assert_eq!(coverage.len(), width as usize * height as usize);

        for row in 0..height {
            let y = top + row as i32;
            if y < 0 || y >= self.height as i32 {
                continue;
            }
            for col in 0..width {
                let x = left + col as i32;
                if x < 0 || x >= self.width as i32 {
                    continue;
                }
                if coverage[(row * width + col) as usize] > INSIDE_THRESHOLD {
                    self.set(x as u32, y as u32, INSIDE);
                }
            }
        }
    }

    /// Number of inside samples
    pub fn inside_count(&self) -> usize {
        self.data.iter().filter(|&&s| s > INSIDE_THRESHOLD).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = GrayscaleBitmap::from_raw(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidBitmap(_)));
    }

    #[test]
    fn test_threshold_is_binary() {
        let mut bitmap = GrayscaleBitmap::from_raw(4, 1, vec![0, 127, 128, 255]).unwrap();
        bitmap.threshold();
        assert_eq!(bitmap.as_bytes(), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_draw_mask_clips_and_merges() {
        let mut bitmap = GrayscaleBitmap::new(4, 4);
        bitmap.set(0, 0, INSIDE);

        // 2x2 mask hanging off the bottom-right corner
        bitmap.draw_mask(3, 3, 2, 2, &[200, 200, 200, 200]);
        // Uncovered mask pixel must not clear existing ink
        bitmap.draw_mask(0, 0, 1, 1, &[10]);

        assert!(bitmap.is_inside(0, 0));
        assert!(bitmap.is_inside(3, 3));
        assert_eq!(bitmap.inside_count(), 2);
    }
}
