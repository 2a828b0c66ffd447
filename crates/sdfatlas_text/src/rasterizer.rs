//! Glyph rasterization using swash
//!
//! Renders glyph outlines into alpha masks. The atlas thresholds the
//! coverage at 50%, so only fully-on or fully-off pixels reach the
//! distance transform.

use crate::font::FontFace;
use crate::FontError;
use sdfatlas_core::{FontMetrics, GlyphBounds, GlyphId, GlyphRasterizer, RasterizedGlyph};
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

/// Point size the atlas size search starts from
pub const DEFAULT_NOMINAL_SIZE: f32 = 32.0;

/// Outline rasterizer for one font face
pub struct OutlineRasterizer {
    face: FontFace,
    nominal_size: f32,
    /// Swash scale context (caches scaling state)
    scale_context: ScaleContext,
}

impl OutlineRasterizer {
    pub fn new(face: FontFace) -> Self {
        Self::with_nominal_size(face, DEFAULT_NOMINAL_SIZE)
    }

    pub fn with_nominal_size(face: FontFace, nominal_size: f32) -> Self {
        Self {
            face,
            nominal_size,
            scale_context: ScaleContext::new(),
        }
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }
}

impl GlyphRasterizer for OutlineRasterizer {
    type Error = FontError;

    fn font_name(&self) -> &str {
        self.face.family_name()
    }

    fn nominal_point_size(&self) -> f32 {
        self.nominal_size
    }

    fn glyph_count(&self) -> u16 {
        self.face.glyph_count()
    }

    fn metrics(&self, point_size: f32) -> FontMetrics {
        self.face.metrics(point_size)
    }

    fn glyph_bounds(&self, glyph: GlyphId, point_size: f32) -> Option<GlyphBounds> {
        self.face.glyph_bounds(glyph, point_size)
    }

    fn rasterize_glyph(
        &mut self,
        glyph: GlyphId,
        point_size: f32,
    ) -> std::result::Result<RasterizedGlyph, FontError> {
        let swash_font = swash::FontRef::from_index(self.face.data(), self.face.face_index() as usize)
            .ok_or(FontError::InvalidFontData)?;

        // Hinting would snap outlines away from the bounds the packer measured
        let mut scaler = self
            .scale_context
            .builder(swash_font)
            .size(point_size)
            .hint(false)
            .build();

        let mut render = Render::new(&[Source::Outline]);
        render.format(Format::Alpha);

        match render.render(&mut scaler, glyph) {
            Some(image) if image.placement.width > 0 && image.placement.height > 0 => {
                Ok(RasterizedGlyph {
                    coverage: image.data,
                    width: image.placement.width,
                    height: image.placement.height,
                    left: image.placement.left,
                    top: image.placement.top,
                })
            }
            _ => {
                if self.face.glyph_bounds(glyph, point_size).is_some() {
                    return Err(FontError::GlyphNotRendered(glyph));
                }
                // Empty glyph (like space)
                Ok(RasterizedGlyph::empty())
            }
        }
    }
}
