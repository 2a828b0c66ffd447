//! Font capability interface consumed by the packer
//!
//! The pipeline never talks to a font library directly. A backend reports
//! metrics at a trial point size and rasterizes single glyphs into binary
//! coverage masks; everything else (sizing, placement, distance fields)
//! happens in this crate.

/// Font-specific glyph index
pub type GlyphId = u16;

/// Font-wide metrics at a given point size, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    /// Distance from baseline to the top of the em box
    pub ascent: f32,
    /// Distance from baseline to the bottom of the em box (positive)
    pub descent: f32,
    /// Average advance of a representative glyph sample, rounded up
    pub average_glyph_width: f32,
    /// Tallest line extent, rounded up
    pub max_glyph_height: f32,
    /// Rendered width of a thin reference glyph (`!`), rounded up
    pub stroke_width: f32,
}

/// Tight outline bounds of a glyph relative to its pen origin.
///
/// Uses the atlas coordinate system: x grows right, y grows down, the pen
/// origin sits on the baseline. Ink above the baseline has negative y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl GlyphBounds {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Ink extent above the baseline
    pub fn ascent(&self) -> f32 {
        -self.y_min
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Rasterized glyph coverage with its placement relative to the pen origin
#[derive(Debug, Clone, Default)]
pub struct RasterizedGlyph {
    /// Coverage samples, row-major; anything above 127 counts as ink
    pub coverage: Vec<u8>,
    /// Mask width in pixels
    pub width: u32,
    /// Mask height in pixels
    pub height: u32,
    /// Offset from the pen origin to the mask's left edge
    pub left: i32,
    /// Offset from the baseline up to the mask's top edge
    pub top: i32,
}

impl RasterizedGlyph {
    /// A glyph with no ink (e.g. space)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Narrow capability interface over a concrete font backend
pub trait GlyphRasterizer {
    /// Backend error, surfaced unchanged as the source of
    /// [`AtlasError::RasterizationFailure`](crate::AtlasError::RasterizationFailure)
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human readable font name recorded on the atlas
    fn font_name(&self) -> &str;

    /// Point size the size search starts from
    fn nominal_point_size(&self) -> f32;

    /// Number of glyphs in the font; glyph ids are `0..glyph_count`
    fn glyph_count(&self) -> u16;

    /// Font-wide metrics at `point_size`
    fn metrics(&self, point_size: f32) -> FontMetrics;

    /// Tight outline bounds, `None` for glyphs without an outline
    fn glyph_bounds(&self, glyph: GlyphId, point_size: f32) -> Option<GlyphBounds>;

    /// Rasterize one glyph into a coverage mask
    fn rasterize_glyph(
        &mut self,
        glyph: GlyphId,
        point_size: f32,
    ) -> std::result::Result<RasterizedGlyph, Self::Error>;
}
