//! Point size search and shelf packing
//!
//! The packer picks the largest point size whose estimated glyph area fits
//! the texture, then places every glyph of the font left-to-right on
//! shelves, rasterizing each into a shared binary bitmap.

use crate::bitmap::GrayscaleBitmap;
use crate::rasterizer::{FontMetrics, GlyphBounds, GlyphId, GlyphRasterizer};
use crate::{AtlasError, Result};
use std::time::Instant;

/// Smallest point size the size search will try
pub const MIN_POINT_SIZE: f32 = 1.0;

/// Glyph spacing never drops below this many pixels, which keeps two clear
/// pixels on every side of the ink for the distance transform.
pub const MIN_GLYPH_MARGIN: f32 = 4.0;

/// Horizontal spacing between glyphs at a given size
pub fn glyph_margin(metrics: &FontMetrics) -> f32 {
    metrics.stroke_width.ceil().max(MIN_GLYPH_MARGIN)
}

/// A glyph's normalized rectangle inside the atlas texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphDescriptor {
    pub glyph_index: GlyphId,
    /// (u, v) of the ink's top-left corner
    pub top_left: [f32; 2],
    /// (u, v) of the ink's bottom-right corner
    pub bottom_right: [f32; 2],
}

impl GlyphDescriptor {
    /// Glyphs without ink get a zero-area rectangle
    pub fn is_empty(&self) -> bool {
        self.top_left[0] >= self.bottom_right[0] || self.top_left[1] >= self.bottom_right[1]
    }

    /// UV coordinates in atlas (u_min, v_min, u_max, v_max)
    pub fn uv_bounds(&self) -> [f32; 4] {
        [
            self.top_left[0],
            self.top_left[1],
            self.bottom_right[0],
            self.bottom_right[1],
        ]
    }
}

/// Where the shelf cursor put a glyph box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfPlacement {
    /// Left edge of the glyph's slot
    pub x: f32,
    /// Baseline of the shelf
    pub baseline: f32,
    /// Shelf index, starting at 0
    pub row: usize,
}

/// Left-to-right, top-to-bottom shelf cursor
#[derive(Debug, Clone)]
pub struct ShelfCursor {
    width: f32,
    margin: f32,
    /// Tallest ink extent above the baseline over every glyph being packed
    line_ascent: f32,
    /// Deepest ink extent below the baseline over every glyph being packed
    line_descent: f32,
    x: f32,
    baseline: f32,
    /// Tallest ink extent above the baseline on the current shelf
    row_ascent: f32,
    row: usize,
}

impl ShelfCursor {
    /// The first baseline sits at `line_ascent`, and every shelf reserves
    /// the full line height so a tall glyph on a later shelf cannot reach
    /// into the one above it.
    pub fn new(width: f32, margin: f32, line_ascent: f32, line_descent: f32) -> Self {
        Self {
            width,
            margin,
            line_ascent,
            line_descent,
            x: 0.0,
            baseline: line_ascent,
            row_ascent: 0.0,
            row: 0,
        }
    }

    /// Reserve a slot for a glyph `glyph_width` wide reaching `glyph_ascent`
    /// above the baseline, wrapping to a new shelf when it would overrun.
    pub fn place(&mut self, glyph_width: f32, glyph_ascent: f32) -> ShelfPlacement {
        // A glyph too wide for an empty shelf stays put; the caller reports it
        if self.x > 0.0 && self.x + glyph_width + self.margin > self.width {
            self.x = 0.0;
            self.baseline +=
                self.row_ascent.max(self.line_ascent) + self.margin + self.line_descent;
            self.row_ascent = 0.0;
            self.row += 1;
        }

        let placement = ShelfPlacement {
            x: self.x,
            baseline: self.baseline,
            row: self.row,
        };

        self.row_ascent = self.row_ascent.max(glyph_ascent);
        self.x += glyph_width + self.margin;
        placement
    }

    /// Number of shelves used so far
    pub fn rows(&self) -> usize {
        self.row + 1
    }
}

/// Output of packing: the binary glyph bitmap plus the glyph table
#[derive(Debug, Clone)]
pub struct PackedGlyphs {
    pub point_size: f32,
    pub margin: f32,
    /// Normalization distance for quantization, half the margin
    pub spread: f32,
    pub bitmap: GrayscaleBitmap,
    /// One descriptor per glyph, indexed by glyph id
    pub glyphs: Vec<GlyphDescriptor>,
}

/// Sizes and places a font's glyphs inside a fixed-size bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPacker {
    width: u32,
    height: u32,
}

impl GlyphPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square texture with edge length `size`
    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Area estimate: average glyph box plus margin, times glyph count
    pub fn is_likely_to_fit(&self, metrics: &FontMetrics, glyph_count: u16) -> bool {
        let texture_area = self.width as f32 * self.height as f32;
        let margin = glyph_margin(metrics);
        let estimated = (metrics.average_glyph_width + margin)
            * (metrics.max_glyph_height + margin)
            * glyph_count as f32;
        estimated < texture_area
    }

    /// Largest point size, stepping by whole points from the font's nominal
    /// size, whose area estimate fits the texture.
    pub fn point_size_that_fits<R: GlyphRasterizer + ?Sized>(&self, rasterizer: &R) -> Result<f32> {
        let glyph_count = rasterizer.glyph_count();
        let max_size = self.width.max(self.height) as f32;
        let fits = |size: f32| self.is_likely_to_fit(&rasterizer.metrics(size), glyph_count);

        let mut size = rasterizer
            .nominal_point_size()
            .clamp(MIN_POINT_SIZE, max_size.max(MIN_POINT_SIZE));

        while size + 1.0 <= max_size && fits(size) {
            size += 1.0;
        }

        while !fits(size) {
            if size - 1.0 < MIN_POINT_SIZE {
                return Err(AtlasError::GlyphDoesNotFit {
                    glyph: None,
                    point_size: size,
                    width: self.width,
                    height: self.height,
                });
            }
            size -= 1.0;
        }

        tracing::debug!(
            "{}: fitted point size {} for {} glyphs in {}x{}",
            rasterizer.font_name(),
            size,
            glyph_count,
            self.width,
            self.height
        );
        Ok(size)
    }

    /// Search the point size, then pack every glyph at it
    pub fn pack<R: GlyphRasterizer + ?Sized>(&self, rasterizer: &mut R) -> Result<PackedGlyphs> {
        let point_size = self.point_size_that_fits(rasterizer)?;
        self.pack_at(rasterizer, point_size)
    }

    /// Place and rasterize every glyph at `point_size`
    pub fn pack_at<R: GlyphRasterizer + ?Sized>(
        &self,
        rasterizer: &mut R,
        point_size: f32,
    ) -> Result<PackedGlyphs> {
        let start = Instant::now();
        let metrics = rasterizer.metrics(point_size);
        let margin = glyph_margin(&metrics);
        let half_margin = margin * 0.5;
        let glyph_count = rasterizer.glyph_count();

        let bounds: Vec<Option<GlyphBounds>> = (0..glyph_count)
            .map(|glyph| {
                rasterizer
                    .glyph_bounds(glyph, point_size)
                    .filter(|b| !b.is_empty())
            })
            .collect();

        // Shelves must clear the tallest and deepest glyph, not just the em box
        let tallest = bounds
            .iter()
            .flatten()
            .map(GlyphBounds::ascent)
            .fold(0.0f32, f32::max);
        let deepest = bounds
            .iter()
            .flatten()
            .map(|b| b.y_max)
            .fold(0.0f32, f32::max);
        let line_ascent = metrics.ascent.max(tallest);
        let line_descent = metrics.descent.max(deepest);

        // Whole-pixel clearance kept around all ink
        let clearance = half_margin.floor();

        let width = self.width as f32;
        let height = self.height as f32;
        let mut cursor = ShelfCursor::new(width, margin, line_ascent, line_descent);
        let mut bitmap = GrayscaleBitmap::new(self.width, self.height);
        let mut glyphs = Vec::with_capacity(glyph_count as usize);

        for (glyph, glyph_bounds) in (0..glyph_count).zip(bounds) {
            let Some(glyph_bounds) = glyph_bounds else {
                let slot = cursor.place(0.0, 0.0);
                let corner = [
                    (slot.x / width).clamp(0.0, 1.0),
                    (slot.baseline / height).clamp(0.0, 1.0),
                ];
                glyphs.push(GlyphDescriptor {
                    glyph_index: glyph,
                    top_left: corner,
                    bottom_right: corner,
                });
                continue;
            };

            // Slots are whole pixels plus one for snapping the pen to the pixel grid
            let slot_width = glyph_bounds.width().ceil() + 1.0;
            let slot = cursor.place(slot_width, glyph_bounds.ascent());

            // Pen origin so the ink's left edge starts `clearance` into the slot
            let pen_x = (slot.x + clearance - glyph_bounds.x_min).ceil();
            let pen_y = (slot.baseline + clearance).ceil();

            let ink = GlyphBounds::new(
                pen_x + glyph_bounds.x_min,
                pen_y + glyph_bounds.y_min,
                pen_x + glyph_bounds.x_max,
                pen_y + glyph_bounds.y_max,
            );
            // The transform never reconciles the outer two pixel rings
            if ink.x_min < clearance
                || ink.y_min < clearance
                || ink.x_max.ceil() + clearance > width
                || ink.y_max.ceil() + clearance > height
            {
                return Err(AtlasError::GlyphDoesNotFit {
                    glyph: Some(glyph),
                    point_size,
                    width: self.width,
                    height: self.height,
                });
            }

            let raster = rasterizer
                .rasterize_glyph(glyph, point_size)
                .map_err(|e| AtlasError::RasterizationFailure {
                    glyph,
                    source: Box::new(e),
                })?;
            if !raster.is_empty() {
                bitmap.draw_mask(
                    pen_x as i32 + raster.left,
                    pen_y as i32 - raster.top,
                    raster.width,
                    raster.height,
                    &raster.coverage,
                );
            }

            tracing::trace!(
                "glyph {} on shelf {} at ({}, {}), {}x{} mask",
                glyph,
                slot.row,
                pen_x,
                pen_y,
                raster.width,
                raster.height
            );

            glyphs.push(GlyphDescriptor {
                glyph_index: glyph,
                top_left: [ink.x_min / width, ink.y_min / height],
                bottom_right: [ink.x_max / width, ink.y_max / height],
            });
        }

        tracing::debug!(
            "packed {} glyphs at {}pt on {} shelves (margin {}) in {:?}",
            glyphs.len(),
            point_size,
            cursor.rows(),
            margin,
            start.elapsed()
        );

        Ok(PackedGlyphs {
            point_size,
            margin,
            spread: margin * 0.5,
            bitmap,
            glyphs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_wraps_when_slot_overruns() {
        // Five 4px glyphs, 2px margin, 14px wide texture. A slot needs
        // width + margin = 6px, so two fit per shelf (the third would end at 18).
        let mut cursor = ShelfCursor::new(14.0, 2.0, 10.0, 3.0);
        let rows: Vec<usize> = (0..5).map(|_| cursor.place(4.0, 8.0).row).collect();
        assert_eq!(rows, vec![0, 0, 1, 1, 2]);
        assert_eq!(cursor.rows(), 3);
    }

    #[test]
    fn test_shelf_advances_by_ascent_margin_and_descent() {
        let mut cursor = ShelfCursor::new(14.0, 2.0, 8.0, 3.0);
        let first = cursor.place(4.0, 5.0);
        let second = cursor.place(4.0, 8.0);
        let third = cursor.place(4.0, 6.0);

        assert_eq!((first.x, first.baseline), (0.0, 8.0));
        assert_eq!((second.x, second.baseline), (6.0, 8.0));
        // 8 + ascent 8 + margin 2 + descent 3
        assert_eq!((third.x, third.baseline), (0.0, 21.0));
    }

    #[test]
    fn test_short_shelf_still_reserves_line_height() {
        // Only short glyphs on the first shelf; the next one may hold a glyph
        // as tall as the line ascent, so the baseline moves by all of it.
        let mut cursor = ShelfCursor::new(14.0, 2.0, 10.0, 3.0);
        cursor.place(4.0, 2.0);
        cursor.place(4.0, 2.0);
        let wrapped = cursor.place(4.0, 10.0);

        assert_eq!(wrapped.row, 1);
        assert_eq!(wrapped.baseline, 10.0 + 10.0 + 2.0 + 3.0);
        // Its ink top (baseline - 10) stays below the first shelf's descent
        assert!(wrapped.baseline - 10.0 >= 10.0 + 3.0 + 2.0);
    }

    #[test]
    fn test_oversized_glyph_does_not_open_empty_shelf() {
        let mut cursor = ShelfCursor::new(10.0, 2.0, 5.0, 1.0);
        let slot = cursor.place(20.0, 4.0);
        assert_eq!(slot.row, 0);
        assert_eq!(slot.x, 0.0);
    }

    #[test]
    fn test_area_estimate() {
        let packer = GlyphPacker::square(100);
        let metrics = FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            average_glyph_width: 6.0,
            max_glyph_height: 6.0,
            stroke_width: 1.0,
        };
        // margin is raised to 4: (6 + 4) * (6 + 4) = 100 per glyph
        assert!(packer.is_likely_to_fit(&metrics, 99));
        assert!(!packer.is_likely_to_fit(&metrics, 100));
    }

    #[test]
    fn test_descriptor_uv_bounds() {
        let descriptor = GlyphDescriptor {
            glyph_index: 3,
            top_left: [0.25, 0.5],
            bottom_right: [0.5, 0.75],
        };
        assert_eq!(descriptor.uv_bounds(), [0.25, 0.5, 0.5, 0.75]);
        assert!(!descriptor.is_empty());
    }
}
