//! Font backend for sdfatlas
//!
//! This crate provides:
//! - Font loading and parsing (TTF/OTF via ttf-parser)
//! - System font discovery by family name (fontdb)
//! - Binary glyph rasterization (swash) behind the core
//!   [`GlyphRasterizer`](sdfatlas_core::GlyphRasterizer) trait

pub mod font;
pub mod rasterizer;
pub mod registry;

pub use font::FontFace;
pub use rasterizer::OutlineRasterizer;
pub use registry::FontRegistry;

use thiserror::Error;

/// Font backend errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Glyph {0} has an outline but produced no bitmap")]
    GlyphNotRendered(u16),

    #[error("Invalid font data")]
    InvalidFontData,
}

pub type Result<T> = std::result::Result<T, FontError>;
