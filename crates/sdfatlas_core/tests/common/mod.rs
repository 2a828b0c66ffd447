//! Deterministic rasterizer for pipeline tests
//!
//! Glyph 0 has no outline (like a space). Every other glyph is a solid
//! rectangle sitting on the baseline whose width grows with the glyph id.
//! The reported metrics are generous so the area estimate stays
//! conservative for real packing.

#![allow(dead_code)]

use sdfatlas_core::{FontMetrics, GlyphBounds, GlyphId, GlyphRasterizer, RasterizedGlyph};
use std::fmt;

#[derive(Debug)]
pub struct MissingGlyph(pub GlyphId);

impl fmt::Display for MissingGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no outline for glyph {}", self.0)
    }
}

impl std::error::Error for MissingGlyph {}

pub struct BoxFont {
    pub glyph_count: u16,
    pub nominal_size: f32,
    /// Glyph that fails to rasterize
    pub broken_glyph: Option<GlyphId>,
    pub rasterized: Vec<GlyphId>,
}

impl BoxFont {
    pub fn new(glyph_count: u16) -> Self {
        Self {
            glyph_count,
            nominal_size: 12.0,
            broken_glyph: None,
            rasterized: Vec::new(),
        }
    }

    fn glyph_size(&self, glyph: GlyphId, point_size: f32) -> (f32, f32) {
        let width = (point_size * (0.3 + 0.05 * (glyph % 5) as f32)).ceil();
        let height = (point_size * 0.7).ceil();
        (width, height)
    }
}

impl GlyphRasterizer for BoxFont {
    type Error = MissingGlyph;

    fn font_name(&self) -> &str {
        "Box Sans"
    }

    fn nominal_point_size(&self) -> f32 {
        self.nominal_size
    }

    fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    fn metrics(&self, point_size: f32) -> FontMetrics {
        FontMetrics {
            ascent: (point_size * 0.8).ceil(),
            descent: (point_size * 0.2).ceil(),
            average_glyph_width: (point_size * 0.6).ceil(),
            max_glyph_height: (point_size * 1.4).ceil(),
            stroke_width: (point_size * 0.15).ceil(),
        }
    }

    fn glyph_bounds(&self, glyph: GlyphId, point_size: f32) -> Option<GlyphBounds> {
        if glyph == 0 {
            return None;
        }
        let (width, height) = self.glyph_size(glyph, point_size);
        Some(GlyphBounds::new(0.0, -height, width, 0.0))
    }

    fn rasterize_glyph(
        &mut self,
        glyph: GlyphId,
        point_size: f32,
    ) -> Result<RasterizedGlyph, Self::Error> {
        if self.broken_glyph == Some(glyph) {
            return Err(MissingGlyph(glyph));
        }
        self.rasterized.push(glyph);
        if glyph == 0 {
            return Ok(RasterizedGlyph::empty());
        }

        let (width, height) = self.glyph_size(glyph, point_size);
        let (width, height) = (width as u32, height as u32);
        Ok(RasterizedGlyph {
            coverage: vec![255; (width * height) as usize],
            width,
            height,
            left: 0,
            top: height as i32,
        })
    }
}

/// Rasterizer whose glyphs are solid boxes of fixed pixel sizes, whatever
/// the point size. Metrics describe a 12px line with a 1px stroke.
pub struct SizedFont {
    /// (width, height) per glyph id; a zero width means no ink
    pub sizes: Vec<(u32, u32)>,
}

impl SizedFont {
    pub fn new(sizes: Vec<(u32, u32)>) -> Self {
        Self { sizes }
    }
}

impl GlyphRasterizer for SizedFont {
    type Error = MissingGlyph;

    fn font_name(&self) -> &str {
        "Sized Mono"
    }

    fn nominal_point_size(&self) -> f32 {
        12.0
    }

    fn glyph_count(&self) -> u16 {
        self.sizes.len() as u16
    }

    fn metrics(&self, _point_size: f32) -> FontMetrics {
        FontMetrics {
            ascent: 10.0,
            descent: 3.0,
            average_glyph_width: 8.0,
            max_glyph_height: 13.0,
            stroke_width: 1.0,
        }
    }

    fn glyph_bounds(&self, glyph: GlyphId, _point_size: f32) -> Option<GlyphBounds> {
        let &(width, height) = self.sizes.get(glyph as usize)?;
        if width == 0 {
            return None;
        }
        Some(GlyphBounds::new(0.0, -(height as f32), width as f32, 0.0))
    }

    fn rasterize_glyph(
        &mut self,
        glyph: GlyphId,
        _point_size: f32,
    ) -> Result<RasterizedGlyph, Self::Error> {
        let &(width, height) = self.sizes.get(glyph as usize).ok_or(MissingGlyph(glyph))?;
        if width == 0 {
            return Ok(RasterizedGlyph::empty());
        }
        Ok(RasterizedGlyph {
            coverage: vec![255; (width * height) as usize],
            width,
            height,
            left: 0,
            top: height as i32,
        })
    }
}
