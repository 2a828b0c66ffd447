//! sdfatlas configuration file handling

use anyhow::{Context, Result};
use sdfatlas_core::AtlasConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "sdfatlas.toml";

/// Top-level configuration (sdfatlas.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SdfAtlasConfig {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub atlas: AtlasSection,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which font to build from
#[derive(Debug, Deserialize, Serialize)]
pub struct FontConfig {
    /// Family name or path to a font file
    #[serde(default)]
    pub family: Option<String>,
    /// Point size the size search starts from
    #[serde(default = "default_nominal_size")]
    pub nominal_size: f32,
}

fn default_nominal_size() -> f32 {
    32.0
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: None,
            nominal_size: default_nominal_size(),
        }
    }
}

/// Atlas construction parameters
#[derive(Debug, Deserialize, Serialize)]
pub struct AtlasSection {
    /// Edge length of the working bitmap
    #[serde(default = "default_texture_size")]
    pub texture_size: u32,
    /// Shrink factor from working bitmap to texture
    #[serde(default = "default_downsample")]
    pub downsample_factor: u32,
    /// Texture row alignment in bytes
    #[serde(default = "default_row_alignment")]
    pub row_alignment: usize,
}

fn default_texture_size() -> u32 {
    sdfatlas_core::atlas::DEFAULT_TEXTURE_SIZE
}

fn default_downsample() -> u32 {
    sdfatlas_core::atlas::DEFAULT_DOWNSAMPLE_FACTOR
}

fn default_row_alignment() -> usize {
    1
}

impl Default for AtlasSection {
    fn default() -> Self {
        Self {
            texture_size: default_texture_size(),
            downsample_factor: default_downsample(),
            row_alignment: default_row_alignment(),
        }
    }
}

impl AtlasSection {
    pub fn to_atlas_config(&self) -> AtlasConfig {
        AtlasConfig::new(self.texture_size, self.downsample_factor)
            .with_row_alignment(self.row_alignment)
    }
}

/// Where results are written
#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Persisted atlas record (JSON)
    #[serde(default = "default_record_path")]
    pub record: PathBuf,
    /// Optional grayscale PNG of the quantized texture
    #[serde(default)]
    pub preview: Option<PathBuf>,
}

fn default_record_path() -> PathBuf {
    PathBuf::from("atlas.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            record: default_record_path(),
            preview: None,
        }
    }
}

impl SdfAtlasConfig {
    /// Load configuration from a file or a directory containing sdfatlas.toml
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No config found at {}. Run `sdfatlas init` to create one.",
                config_path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load `sdfatlas.toml` from the working directory if it exists
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid sdfatlas configuration")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SdfAtlasConfig::from_toml("").unwrap();
        assert_eq!(config.font.family, None);
        assert_eq!(config.font.nominal_size, 32.0);
        assert_eq!(config.atlas.texture_size, 2048);
        assert_eq!(config.atlas.downsample_factor, 2);
        assert_eq!(config.output.record, PathBuf::from("atlas.json"));
    }

    #[test]
    fn test_partial_config() {
        let config = SdfAtlasConfig::from_toml(
            r#"
            [font]
            family = "Inter"

            [atlas]
            texture_size = 1024
            row_alignment = 256

            [output]
            preview = "atlas.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.font.family.as_deref(), Some("Inter"));
        let atlas = config.atlas.to_atlas_config();
        assert_eq!(atlas.texture_size, 1024);
        assert_eq!(atlas.downsample_factor, 2);
        assert_eq!(atlas.row_alignment, 256);
        assert_eq!(config.output.preview, Some(PathBuf::from("atlas.png")));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SdfAtlasConfig::default();
        let parsed = SdfAtlasConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.atlas.texture_size, config.atlas.texture_size);
        assert_eq!(parsed.output.record, config.output.record);
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(SdfAtlasConfig::from_toml("[atlas]\ntexture_size = \"big\"").is_err());
    }
}
