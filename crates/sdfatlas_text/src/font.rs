//! Font face parsing and metrics
//!
//! Wraps raw font bytes and answers the metric queries the atlas packer
//! needs. Everything is reported in pixels at a requested point size, with
//! y growing downward from the baseline.

use crate::{FontError, Result};
use sdfatlas_core::{FontMetrics, GlyphBounds, GlyphId};
use std::path::Path;
use std::sync::Arc;
use ttf_parser::Face;

/// Characters whose average advance stands in for a typical glyph width
const GLYPH_SIZE_SAMPLE: &str = "{ÇºOJMQYZa@jmqyw";

/// Thin glyph whose width sets glyph spacing
const STROKE_REFERENCE: char = '!';

/// A parsed font face backed by shared font bytes
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    face_index: u32,
    family_name: String,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    line_gap: i16,
    glyph_count: u16,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family_name", &self.family_name)
            .field("face_index", &self.face_index)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}

impl FontFace {
    /// Parse the first face in `data`
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Parse face `face_index` of a font collection
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let face = Face::parse(&data, face_index)
            .map_err(|e| FontError::FontParseError(e.to_string()))?;

        let family_name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|name| name.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(FontError::InvalidFontData);
        }
        let (ascender, descender, line_gap) = (face.ascender(), face.descender(), face.line_gap());
        let glyph_count = face.number_of_glyphs();

        Ok(Self {
            data: Arc::new(data),
            face_index,
            family_name,
            units_per_em,
            ascender,
            descender,
            line_gap,
            glyph_count,
        })
    }

    /// Read and parse a font file
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            FontError::FontLoadError(format!("Failed to read font file {:?}: {}", path, e))
        })?;
        Self::from_data(data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Run `f` against a freshly parsed face.
    ///
    /// The face borrows the font bytes, so it is re-parsed per query instead
    /// of being stored alongside them.
    fn with_face<T>(&self, f: impl FnOnce(&Face) -> T) -> Option<T> {
        Face::parse(&self.data, self.face_index).ok().map(|face| f(&face))
    }

    fn scale(&self, point_size: f32) -> f32 {
        point_size / self.units_per_em as f32
    }

    /// Glyph id for a character, if the font maps it
    pub fn glyph_id(&self, c: char) -> Option<GlyphId> {
        self.with_face(|face| face.glyph_index(c).map(|g| g.0))
            .flatten()
    }

    /// Horizontal advance of `c` in pixels
    pub fn advance(&self, c: char, point_size: f32) -> Option<f32> {
        let scale = self.scale(point_size);
        self.with_face(|face| {
            let glyph = face.glyph_index(c)?;
            face.glyph_hor_advance(glyph).map(|a| a as f32 * scale)
        })
        .flatten()
    }

    /// Font-wide metrics used by the atlas size search
    pub fn metrics(&self, point_size: f32) -> FontMetrics {
        let scale = self.scale(point_size);

        let advances: Vec<f32> = GLYPH_SIZE_SAMPLE
            .chars()
            .filter_map(|c| self.advance(c, point_size))
            .collect();
        let average_glyph_width = if advances.is_empty() {
            point_size * 0.5
        } else {
            advances.iter().sum::<f32>() / advances.len() as f32
        };

        let line_height =
            (self.ascender as f32 - self.descender as f32 + self.line_gap as f32) * scale;

        let stroke_width = self
            .advance(STROKE_REFERENCE, point_size)
            .unwrap_or(average_glyph_width * 0.25);

        FontMetrics {
            ascent: self.ascender as f32 * scale,
            descent: -(self.descender as f32) * scale,
            average_glyph_width: average_glyph_width.ceil(),
            max_glyph_height: line_height.ceil(),
            stroke_width: stroke_width.ceil(),
        }
    }

    /// Tight outline bounds in pixels, y down from the baseline
    pub fn glyph_bounds(&self, glyph: GlyphId, point_size: f32) -> Option<GlyphBounds> {
        let scale = self.scale(point_size);
        self.with_face(|face| face.glyph_bounding_box(ttf_parser::GlyphId(glyph)))
            .flatten()
            .map(|rect| {
                GlyphBounds::new(
                    rect.x_min as f32 * scale,
                    -(rect.y_max as f32) * scale,
                    rect.x_max as f32 * scale,
                    -(rect.y_min as f32) * scale,
                )
            })
    }
}
