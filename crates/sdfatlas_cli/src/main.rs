//! sdfatlas CLI
//!
//! Build, preview and inspect signed distance field font atlases.

mod config;
mod preview;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{SdfAtlasConfig, CONFIG_FILE};
use sdfatlas_core::{AtlasRecord, FontAtlas};
use sdfatlas_text::{FontRegistry, OutlineRasterizer};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sdfatlas")]
#[command(author, version, about = "Signed distance field font atlas builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an atlas from a font
    Build {
        /// Font family name or path to a font file
        #[arg(short, long)]
        font: Option<String>,

        /// Config file (defaults to ./sdfatlas.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Working bitmap edge length
        #[arg(long)]
        texture_size: Option<u32>,

        /// Downsample factor from working bitmap to texture
        #[arg(long)]
        downsample: Option<u32>,

        /// Byte alignment of texture rows
        #[arg(long)]
        row_alignment: Option<usize>,

        /// Point size the size search starts from
        #[arg(long)]
        nominal_size: Option<f32>,

        /// Output path for the atlas record (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the quantized texture as a PNG
        #[arg(long)]
        preview: Option<PathBuf>,
    },

    /// Print a summary of an atlas record
    Inspect {
        /// Atlas record to read
        path: PathBuf,

        /// Write the texture as a PNG
        #[arg(long)]
        preview: Option<PathBuf>,
    },

    /// Write a default sdfatlas.toml
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Font family to put in the config
        #[arg(short, long)]
        font: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Build {
            font,
            config,
            texture_size,
            downsample,
            row_alignment,
            nominal_size,
            output,
            preview,
        } => {
            let mut settings = SdfAtlasConfig::load_or_default(config.as_deref())?;
            if let Some(font) = font {
                settings.font.family = Some(font);
            }
            if let Some(size) = texture_size {
                settings.atlas.texture_size = size;
            }
            if let Some(factor) = downsample {
                settings.atlas.downsample_factor = factor;
            }
            if let Some(alignment) = row_alignment {
                settings.atlas.row_alignment = alignment;
            }
            if let Some(size) = nominal_size {
                settings.font.nominal_size = size;
            }
            if let Some(output) = output {
                settings.output.record = output;
            }
            if preview.is_some() {
                settings.output.preview = preview;
            }
            cmd_build(&settings)
        }
        Commands::Inspect { path, preview } => cmd_inspect(&path, preview.as_deref()),
        Commands::Init { path, font } => cmd_init(&path, font),
    }
}

fn cmd_build(settings: &SdfAtlasConfig) -> Result<()> {
    let registry = FontRegistry::new();
    let face = match settings.font.family.as_deref() {
        Some(reference) => registry
            .resolve(reference)
            .with_context(|| format!("Failed to load font '{}'", reference))?,
        None => registry
            .load_sans_serif()
            .context("No font given and no system sans-serif font available")?,
    };

    tracing::info!(
        "Building atlas for {} ({} glyphs)",
        face.family_name(),
        face.glyph_count()
    );

    let mut rasterizer = OutlineRasterizer::with_nominal_size(face, settings.font.nominal_size);
    let atlas_config = settings.atlas.to_atlas_config();
    let atlas = FontAtlas::build(&mut rasterizer, &atlas_config).context("Atlas construction failed")?;

    let record = atlas.to_record();
    let path = &settings.output.record;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    record
        .write_to(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());

    if let Some(preview_path) = &settings.output.preview {
        preview::write_png(&record, preview_path)?;
        tracing::info!("Wrote preview {}", preview_path.display());
    }

    Ok(())
}

fn cmd_inspect(path: &Path, preview_path: Option<&Path>) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let record = AtlasRecord::read_from(BufReader::new(file))
        .with_context(|| format!("Failed to read atlas {}", path.display()))?;

    let inked = record
        .glyph_descriptors
        .iter()
        .filter(|g| g.left_tex_coord < g.right_tex_coord && g.top_tex_coord < g.bottom_tex_coord)
        .count();

    println!("font:     {}", record.font_name);
    println!("size:     {}pt", record.font_size);
    println!("spread:   {}px", record.spread);
    println!("texture:  {}x{}", record.texture_width, record.texture_height);
    println!(
        "glyphs:   {} ({} with ink)",
        record.glyph_descriptors.len(),
        inked
    );

    if let Some(preview_path) = preview_path {
        preview::write_png(&record, preview_path)?;
        println!("preview:  {}", preview_path.display());
    }

    Ok(())
}

fn cmd_init(path: &Path, font: Option<String>) -> Result<()> {
    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    let mut config = SdfAtlasConfig::default();
    config.font.family = font;

    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
    fs::write(&config_path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    Ok(())
}
