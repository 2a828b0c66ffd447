//! Font registry for system font discovery
//!
//! Uses fontdb to find fonts by family name, and falls back to treating the
//! reference as a path to a font file.

use crate::font::FontFace;
use crate::{FontError, Result};
use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use std::path::Path;

/// Font registry over the system font database
pub struct FontRegistry {
    /// fontdb database containing all system fonts
    db: Database,
}

impl FontRegistry {
    /// Create a registry and load system fonts
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("font registry loaded {} faces", db.len());
        Self { db }
    }

    /// Registry with no fonts; only file references resolve
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
        }
    }

    /// Number of faces known to the registry
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Resolve a font reference: an existing file path, else a family name
    pub fn resolve(&self, reference: &str) -> Result<FontFace> {
        let path = Path::new(reference);
        if path.is_file() {
            tracing::debug!("loading font file {}", path.display());
            return FontFace::from_file(path);
        }
        self.load_family(reference)
    }

    /// Load the regular face of a family (e.g. "Inter", "Fira Code")
    pub fn load_family(&self, name: &str) -> Result<FontFace> {
        self.query(&[Family::Name(name)])
            .ok_or_else(|| FontError::FontLoadError(format!("Font '{}' not found", name)))
    }

    /// Load the system's default sans-serif face
    pub fn load_sans_serif(&self) -> Result<FontFace> {
        self.query(&[Family::SansSerif])
            .ok_or_else(|| FontError::FontLoadError("No sans-serif font found".to_string()))
    }

    fn query(&self, families: &[Family<'_>]) -> Option<FontFace> {
        let query = Query {
            families,
            weight: Weight::NORMAL,
            style: Style::Normal,
            stretch: Stretch::Normal,
        };
        let id = self.db.query(&query)?;
        match self.load_face_by_id(id) {
            Ok(face) => Some(face),
            Err(e) => {
                tracing::warn!("Failed to load font face {:?}: {}", id, e);
                None
            }
        }
    }

    /// Load a font face by fontdb ID
    fn load_face_by_id(&self, id: fontdb::ID) -> Result<FontFace> {
        let (src, face_index) = self
            .db
            .face_source(id)
            .ok_or_else(|| FontError::FontLoadError("Font source not found".to_string()))?;

        let data = match src {
            Source::File(path) => std::fs::read(&path).map_err(|e| {
                FontError::FontLoadError(format!("Failed to read font file {:?}: {}", path, e))
            })?,
            Source::Binary(arc) => arc.as_ref().as_ref().to_vec(),
            Source::SharedFile(_path, data) => data.as_ref().as_ref().to_vec(),
        };

        FontFace::from_data_with_index(data, face_index)
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}
