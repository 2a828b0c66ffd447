//! Signed distance field font atlas
//!
//! Runs the whole construction pipeline (pack, distance transform,
//! downsample, quantize) and owns the result. A finished atlas is immutable
//! and can be shared freely between renderers.

use crate::distance::{DistanceField, MIN_DIMENSION};
use crate::packer::{GlyphDescriptor, GlyphPacker};
use crate::quantize::{QuantizedField, Quantizer};
use crate::rasterizer::{GlyphId, GlyphRasterizer};
use crate::resample::Resampler;
use crate::{AtlasError, Result};
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Default working bitmap edge length
pub const DEFAULT_TEXTURE_SIZE: u32 = 2048;

/// Default downsample factor from working bitmap to texture
pub const DEFAULT_DOWNSAMPLE_FACTOR: u32 = 2;

/// Atlas construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Edge length of the square working bitmap glyphs are packed into
    pub texture_size: u32,
    /// Integer factor the distance field is shrunk by; must divide `texture_size`
    pub downsample_factor: u32,
    /// Byte alignment of texture rows in the upload buffer
    pub row_alignment: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            texture_size: DEFAULT_TEXTURE_SIZE,
            downsample_factor: DEFAULT_DOWNSAMPLE_FACTOR,
            row_alignment: 1,
        }
    }
}

impl AtlasConfig {
    pub fn new(texture_size: u32, downsample_factor: u32) -> Self {
        Self {
            texture_size,
            downsample_factor,
            ..Default::default()
        }
    }

    pub fn with_row_alignment(mut self, row_alignment: usize) -> Self {
        self.row_alignment = row_alignment;
        self
    }

    /// Edge length of the final texture
    pub fn output_size(&self) -> u32 {
        self.texture_size / self.downsample_factor.max(1)
    }

    /// Reject configurations the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.texture_size < MIN_DIMENSION {
            return Err(AtlasError::InvalidConfig(format!(
                "texture size must be at least {}, got {}",
                MIN_DIMENSION, self.texture_size
            )));
        }
        if self.row_alignment == 0 {
            return Err(AtlasError::InvalidConfig(
                "row alignment must be non-zero".to_string(),
            ));
        }
        Resampler::new(self.downsample_factor).validate(self.texture_size, self.texture_size)?;

        if !self.texture_size.is_power_of_two() {
            tracing::warn!(
                "texture size {} is not a power of two; some GPUs sample it poorly",
                self.texture_size
            );
        }
        Ok(())
    }
}

/// A font's glyphs encoded as one quantized signed distance field
#[derive(Debug, Clone)]
pub struct FontAtlas {
    font_name: String,
    point_size: f32,
    spread: f32,
    texture: QuantizedField,
    glyphs: Vec<GlyphDescriptor>,
    /// glyph id -> position in `glyphs`
    index: FxHashMap<GlyphId, usize>,
}

impl FontAtlas {
    /// Build an atlas for every glyph `rasterizer` exposes.
    ///
    /// Construction is all-or-nothing: any error aborts the build and no
    /// partial atlas is returned.
    pub fn build<R: GlyphRasterizer + ?Sized>(rasterizer: &mut R, config: &AtlasConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let packer = GlyphPacker::square(config.texture_size);
        let packed = packer.pack(rasterizer)?;

        let field = DistanceField::from_bitmap(&packed.bitmap)?;
        drop(packed.bitmap);

        let resampled = Resampler::new(config.downsample_factor).resample(&field)?;
        drop(field);

        // Box averaging keeps distances in working-bitmap pixels, so the
        // spread needs no rescaling.
        let texture = Quantizer::new(packed.spread, config.row_alignment)?.quantize(&resampled);

        tracing::info!(
            "built atlas for {} at {}pt: {} glyphs, {}x{} texture, spread {} in {:?}",
            rasterizer.font_name(),
            packed.point_size,
            packed.glyphs.len(),
            texture.width(),
            texture.height(),
            packed.spread,
            start.elapsed()
        );

        Ok(Self::from_parts(
            rasterizer.font_name().to_string(),
            packed.point_size,
            packed.spread,
            texture,
            packed.glyphs,
        ))
    }

    pub(crate) fn from_parts(
        font_name: String,
        point_size: f32,
        spread: f32,
        texture: QuantizedField,
        glyphs: Vec<GlyphDescriptor>,
    ) -> Self {
        let index = glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.glyph_index, i))
            .collect();
        Self {
            font_name,
            point_size,
            spread,
            texture,
            glyphs,
            index,
        }
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Point size the glyphs were rasterized at
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Quantization spread in working-bitmap pixels
    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn texture_width(&self) -> u32 {
        self.texture.width()
    }

    pub fn texture_height(&self) -> u32 {
        self.texture.height()
    }

    pub fn texture(&self) -> &QuantizedField {
        &self.texture
    }

    /// Glyph table in glyph id order
    pub fn glyphs(&self) -> &[GlyphDescriptor] {
        &self.glyphs
    }

    pub fn glyph(&self, id: GlyphId) -> Option<&GlyphDescriptor> {
        self.index.get(&id).map(|&i| &self.glyphs[i])
    }

    /// Recover the signed distance at a texel, as a renderer's shader would
    pub fn distance_at(&self, x: u32, y: u32) -> f32 {
        crate::quantize::dequantize(self.texture.get(x, y), self.spread)
    }
}
