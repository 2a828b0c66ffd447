//! Signed distance field glyph atlases
//!
//! This crate provides the CPU-side atlas construction pipeline:
//! - Point size search and shelf packing of glyphs into one bitmap
//! - Dead-reckoning signed distance transform
//! - Box-filter downsampling of the distance field
//! - 8-bit quantization into an uploadable texture
//! - The finished [`FontAtlas`] and its persisted record
//!
//! Fonts are reached through the [`GlyphRasterizer`] trait; any backend that
//! can report metrics and rasterize a binary glyph bitmap can drive the
//! pipeline.

pub mod atlas;
pub mod bitmap;
pub mod distance;
pub mod packer;
pub mod quantize;
pub mod rasterizer;
pub mod record;
pub mod resample;

pub use atlas::{AtlasConfig, FontAtlas};
pub use bitmap::GrayscaleBitmap;
pub use distance::{DistanceField, DistanceFieldBuilder};
pub use packer::{GlyphDescriptor, GlyphPacker, PackedGlyphs, ShelfPlacement};
pub use quantize::{dequantize, quantize_sample, QuantizedField, Quantizer};
pub use rasterizer::{FontMetrics, GlyphBounds, GlyphId, GlyphRasterizer, RasterizedGlyph};
pub use record::{AtlasRecord, GlyphRecord};
pub use resample::Resampler;

use thiserror::Error;

/// Atlas construction errors
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Glyphs do not fit in a {width}x{height} atlas at {point_size}pt")]
    GlyphDoesNotFit {
        /// Offending glyph, `None` when the size search itself gave up
        glyph: Option<GlyphId>,
        point_size: f32,
        width: u32,
        height: u32,
    },

    #[error("Downsample factor {factor} does not evenly divide {width}x{height}")]
    InvalidDownsampleFactor { factor: u32, width: u32, height: u32 },

    #[error("Failed to rasterize glyph {glyph}")]
    RasterizationFailure {
        glyph: GlyphId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    #[error("Invalid atlas configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid atlas record: {0}")]
    InvalidRecord(String),

    #[error("Atlas serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
