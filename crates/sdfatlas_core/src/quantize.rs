//! 8-bit quantization of distance fields
//!
//! Distances are clamped to `[-spread, spread]` and mapped linearly onto
//! `[0, 255]`. Information beyond the spread is dropped; renderers only need
//! accurate distances near glyph edges.

use crate::distance::DistanceField;
use crate::{AtlasError, Result};

/// Map a signed distance to an 8-bit sample
#[inline]
pub fn quantize_sample(distance: f32, spread: f32) -> u8 {
    let clamped = distance.clamp(-spread, spread);
    let scaled = clamped / spread;
    (((scaled + 1.0) / 2.0) * u8::MAX as f32).round() as u8
}

/// Recover a signed distance from an 8-bit sample (the shader-side inverse)
#[inline]
pub fn dequantize(sample: u8, spread: f32) -> f32 {
    (sample as f32 / u8::MAX as f32 * 2.0 - 1.0) * spread
}

fn align_up(size: usize, align: usize) -> usize {
    size.div_ceil(align) * align
}

/// Single-channel 8-bit texture data with a possibly padded row stride
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedField {
    width: u32,
    height: u32,
    bytes_per_row: usize,
    data: Vec<u8>,
}

impl QuantizedField {
    /// Wrap tightly packed samples (stride == width)
    pub fn from_tight(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(AtlasError::InvalidBitmap(format!(
                "{}x{} texture needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bytes_per_row: width as usize,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes, at least `width`
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Raw upload buffer including row padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.bytes_per_row + x as usize]
    }

    /// Samples of row `y` without padding
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.bytes_per_row;
        &self.data[start..start + self.width as usize]
    }

    /// Row-major samples with the padding stripped
    pub fn to_tight(&self) -> Vec<u8> {
        if self.bytes_per_row == self.width as usize {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

/// Quantizes float fields using a fixed spread and row alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    spread: f32,
    row_alignment: usize,
}

impl Quantizer {
    /// `spread` is the normalization distance in the field's units;
    /// `row_alignment` is the byte alignment each texture row must start on.
    pub fn new(spread: f32, row_alignment: usize) -> Result<Self> {
        if !spread.is_finite() || spread <= 0.0 {
            return Err(AtlasError::InvalidConfig(format!(
                "spread must be a positive finite distance, got {}",
                spread
            )));
        }
        if row_alignment == 0 {
            return Err(AtlasError::InvalidConfig(
                "row alignment must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            spread,
            row_alignment,
        })
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn quantize(&self, field: &DistanceField) -> QuantizedField {
        let width = field.width() as usize;
        let height = field.height() as usize;
        let bytes_per_row = align_up(width, self.row_alignment);

        let mut data = vec![0u8; bytes_per_row * height];
        for (src, dst) in field
            .as_slice()
            .chunks_exact(width.max(1))
            .zip(data.chunks_exact_mut(bytes_per_row.max(1)))
        {
            for (d, out) in src.iter().zip(dst.iter_mut()) {
                *out = quantize_sample(*d, self.spread);
            }
        }

        QuantizedField {
            width: field.width(),
            height: field.height(),
            bytes_per_row,
            data,
        }
    }
}
