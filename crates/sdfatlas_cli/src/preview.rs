//! PNG previews of quantized atlas textures

use anyhow::{Context, Result};
use image::GrayImage;
use sdfatlas_core::AtlasRecord;
use std::path::Path;

/// Turn a record's texture into a grayscale image
pub fn to_image(record: &AtlasRecord) -> Result<GrayImage> {
    GrayImage::from_raw(
        record.texture_width,
        record.texture_height,
        record.texture_data.clone(),
    )
    .context("Texture data does not match texture dimensions")
}

/// Write a record's texture as an 8-bit grayscale PNG
pub fn write_png(record: &AtlasRecord, path: &Path) -> Result<()> {
    to_image(record)?
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
