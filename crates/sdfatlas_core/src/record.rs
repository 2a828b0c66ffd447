//! Persisted atlas format
//!
//! Field names and order are the compatibility contract with existing atlas
//! files. Texture data is stored uncompressed, row-major, one byte per
//! sample, without row padding.

use crate::atlas::FontAtlas;
use crate::packer::GlyphDescriptor;
use crate::quantize::QuantizedField;
use crate::rasterizer::GlyphId;
use crate::{AtlasError, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One glyph's rectangle in the persisted format
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphRecord {
    pub glyph_index: GlyphId,
    pub left_tex_coord: f32,
    pub top_tex_coord: f32,
    pub right_tex_coord: f32,
    pub bottom_tex_coord: f32,
}

impl From<&GlyphDescriptor> for GlyphRecord {
    fn from(glyph: &GlyphDescriptor) -> Self {
        Self {
            glyph_index: glyph.glyph_index,
            left_tex_coord: glyph.top_left[0],
            top_tex_coord: glyph.top_left[1],
            right_tex_coord: glyph.bottom_right[0],
            bottom_tex_coord: glyph.bottom_right[1],
        }
    }
}

impl From<GlyphRecord> for GlyphDescriptor {
    fn from(record: GlyphRecord) -> Self {
        Self {
            glyph_index: record.glyph_index,
            top_left: [record.left_tex_coord, record.top_tex_coord],
            bottom_right: [record.right_tex_coord, record.bottom_tex_coord],
        }
    }
}

/// Serializable snapshot of a [`FontAtlas`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasRecord {
    pub font_name: String,
    pub font_size: f32,
    pub spread: f32,
    pub texture_width: u32,
    pub texture_height: u32,
    pub texture_data: Vec<u8>,
    pub glyph_descriptors: Vec<GlyphRecord>,
}

impl AtlasRecord {
    /// Check the record describes a usable atlas
    pub fn validate(&self) -> Result<()> {
        let expected = self.texture_width as usize * self.texture_height as usize;
        if self.texture_data.len() != expected {
            return Err(AtlasError::InvalidRecord(format!(
                "{}x{} texture needs {} bytes, record has {}",
                self.texture_width,
                self.texture_height,
                expected,
                self.texture_data.len()
            )));
        }
        if !self.spread.is_finite() || self.spread <= 0.0 {
            return Err(AtlasError::InvalidRecord(format!(
                "spread must be positive, got {}",
                self.spread
            )));
        }

        for glyph in &self.glyph_descriptors {
            let coords = [
                glyph.left_tex_coord,
                glyph.top_tex_coord,
                glyph.right_tex_coord,
                glyph.bottom_tex_coord,
            ];
            if coords.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(AtlasError::InvalidRecord(format!(
                    "glyph {} has texture coordinates outside [0, 1]",
                    glyph.glyph_index
                )));
            }
            if glyph.left_tex_coord > glyph.right_tex_coord
                || glyph.top_tex_coord > glyph.bottom_tex_coord
            {
                return Err(AtlasError::InvalidRecord(format!(
                    "glyph {} has an inverted rectangle",
                    glyph.glyph_index
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let record: Self = serde_json::from_reader(reader)?;
        record.validate()?;
        Ok(record)
    }
}

impl FontAtlas {
    /// Snapshot for persistence; row padding is stripped
    pub fn to_record(&self) -> AtlasRecord {
        AtlasRecord {
            font_name: self.font_name().to_string(),
            font_size: self.point_size(),
            spread: self.spread(),
            texture_width: self.texture_width(),
            texture_height: self.texture_height(),
            texture_data: self.texture().to_tight(),
            glyph_descriptors: self.glyphs().iter().map(GlyphRecord::from).collect(),
        }
    }

    /// Restore an atlas from a persisted record
    pub fn from_record(record: AtlasRecord) -> Result<Self> {
        record.validate()?;
        let texture = QuantizedField::from_tight(
            record.texture_width,
            record.texture_height,
            record.texture_data,
        )?;
        let glyphs = record
            .glyph_descriptors
            .into_iter()
            .map(GlyphDescriptor::from)
            .collect();
        Ok(Self::from_parts(
            record.font_name,
            record.font_size,
            record.spread,
            texture,
            glyphs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AtlasRecord {
        AtlasRecord {
            font_name: "Test Sans".to_string(),
            font_size: 24.0,
            spread: 2.0,
            texture_width: 2,
            texture_height: 2,
            texture_data: vec![0, 64, 128, 255],
            glyph_descriptors: vec![GlyphRecord {
                glyph_index: 7,
                left_tex_coord: 0.0,
                top_tex_coord: 0.0,
                right_tex_coord: 0.5,
                bottom_tex_coord: 1.0,
            }],
        }
    }

    #[test]
    fn test_json_field_names_and_order() {
        let json = sample_record().to_json().unwrap();
        let keys = [
            "\"fontName\"",
            "\"fontSize\"",
            "\"spread\"",
            "\"textureWidth\"",
            "\"textureHeight\"",
            "\"textureData\"",
            "\"glyphDescriptors\"",
            "\"glyphIndex\"",
            "\"leftTexCoord\"",
            "\"topTexCoord\"",
            "\"rightTexCoord\"",
            "\"bottomTexCoord\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| json.find(k).unwrap_or_else(|| panic!("missing {}", k)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn test_rejects_short_texture_data() {
        let mut record = sample_record();
        record.texture_data.pop();
        assert!(matches!(record.validate(), Err(AtlasError::InvalidRecord(_))));
    }

    #[test]
    fn test_rejects_inverted_rectangle() {
        let mut record = sample_record();
        record.glyph_descriptors[0].left_tex_coord = 0.75;
        assert!(matches!(record.validate(), Err(AtlasError::InvalidRecord(_))));
    }

    #[test]
    fn test_atlas_from_record_looks_up_glyphs() {
        let atlas = FontAtlas::from_record(sample_record()).unwrap();
        assert_eq!(atlas.font_name(), "Test Sans");
        assert_eq!(atlas.texture_width(), 2);
        assert_eq!(atlas.texture().get(1, 1), 255);
        assert_eq!(atlas.glyph(7).unwrap().bottom_right, [0.5, 1.0]);
        assert!(atlas.glyph(8).is_none());
        assert_eq!(atlas.distance_at(1, 1), 2.0);
        assert_eq!(atlas.to_record(), sample_record());
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        assert!(matches!(
            AtlasRecord::from_json("{\"fontName\": 3}"),
            Err(AtlasError::Serialization(_))
        ));
    }
}
