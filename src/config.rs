//! Gallery configuration module.
//!
//! Handles loading and validating the gallery config file. The config is read
//! once at startup and handed to every component by reference; nothing in the
//! crate reads configuration from globals.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "source/photos"          # Source images + .yaml sidecars
//! output_dir = "public/assets/images"   # Rendition sets land in <output_dir>/<slug>/
//! url_prefix = "/assets/images"         # Public URL root for rendition sets
//!
//! [renditions]
//! thumbnail_width = 400     # Grid thumbnail width
//! medium_width = 1200       # Medium size cap (never upscaled)
//! original_width = 2400     # Optimized original cap (never upscaled)
//! jpeg_quality = 90         # JPEG quality (1-100)
//! webp_quality = 85         # WebP quality (1-100)
//! grid_style = "original"   # "original" (keep aspect) or "square" (400x400 crop)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from a TOML file.
///
/// All fields have defaults matching the stock gallery layout. Config files
/// need only specify the values they want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory holding source images and their `.yaml` sidecars.
    pub source_dir: PathBuf,
    /// Root directory for rendition sets.
    pub output_dir: PathBuf,
    /// Root-relative URL under which `output_dir` is published.
    pub url_prefix: String,
    /// Sizes, qualities and thumbnail layout.
    pub renditions: RenditionsConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("source/photos"),
            output_dir: PathBuf::from("public/assets/images"),
            url_prefix: "/assets/images".to_string(),
            renditions: RenditionsConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.renditions;
        for (name, quality) in [
            ("renditions.jpeg_quality", r.jpeg_quality),
            ("renditions.webp_quality", r.webp_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!("{name} must be 1-100")));
            }
        }
        for (name, width) in [
            ("renditions.thumbnail_width", r.thumbnail_width),
            ("renditions.medium_width", r.medium_width),
            ("renditions.original_width", r.original_width),
        ] {
            if width == 0 {
                return Err(ConfigError::Validation(format!("{name} must be non-zero")));
            }
        }
        if !self.url_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "url_prefix must start with '/'".into(),
            ));
        }
        Ok(())
    }
}

/// How grid thumbnails are laid out. One style is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// Scale to `thumbnail_width`, height follows the source aspect ratio.
    #[default]
    Original,
    /// Cover-crop to exactly `thumbnail_width` × `thumbnail_width`, centered.
    Square,
}

/// Rendition sizes and encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenditionsConfig {
    pub thumbnail_width: u32,
    /// Upper bound for the medium rendition width.
    pub medium_width: u32,
    /// Upper bound for the optimized original width.
    pub original_width: u32,
    pub jpeg_quality: u32,
    pub webp_quality: u32,
    pub grid_style: GridStyle,
}

impl Default for RenditionsConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: 400,
            medium_width: 1200,
            original_width: 2400,
            jpeg_quality: 90,
            webp_quality: 85,
            grid_style: GridStyle::Original,
        }
    }
}

/// Load config from a TOML file, falling back to defaults when it is absent.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    if !path.exists() {
        return Ok(GalleryConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate config from TOML text.
pub fn parse_config(content: &str) -> Result<GalleryConfig, ConfigError> {
    let config: GalleryConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// A documented config file with every option set to its default.
pub fn stock_config_toml() -> &'static str {
    r#"# contact-sheet configuration
# All options are optional; the values below are the defaults.

# Directory holding source images (.jpg, .jpeg, .png, .gif) and their
# <basename>.yaml metadata sidecars.
source_dir = "source/photos"

# Each photo's renditions are written to <output_dir>/<slug>/.
output_dir = "public/assets/images"

# Public URL under which output_dir is served. Catalog URLs are
# <url_prefix>/<slug>/<file>.
url_prefix = "/assets/images"

[renditions]
# Grid thumbnail width in pixels.
thumbnail_width = 400
# Medium rendition width cap. Narrower sources keep their width.
medium_width = 1200
# Optimized original width cap. Narrower sources keep their width.
original_width = 2400
# Encoding quality, 1-100.
jpeg_quality = 90
webp_quality = 85
# "original" keeps the source aspect ratio; "square" crops to a centered
# thumbnail_width x thumbnail_width square.
grid_style = "original"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_stock_layout() {
        let config = GalleryConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("source/photos"));
        assert_eq!(config.output_dir, PathBuf::from("public/assets/images"));
        assert_eq!(config.url_prefix, "/assets/images");
        assert_eq!(config.renditions.thumbnail_width, 400);
        assert_eq!(config.renditions.medium_width, 1200);
        assert_eq!(config.renditions.original_width, 2400);
        assert_eq!(config.renditions.jpeg_quality, 90);
        assert_eq!(config.renditions.webp_quality, 85);
        assert_eq!(config.renditions.grid_style, GridStyle::Original);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
            source_dir = "photos"

            [renditions]
            grid_style = "square"
            "#,
        )
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("photos"));
        assert_eq!(config.renditions.grid_style, GridStyle::Square);
        // Untouched values keep their defaults
        assert_eq!(config.renditions.medium_width, 1200);
        assert_eq!(config.output_dir, PathBuf::from("public/assets/images"));
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(matches!(
            parse_config("sourcedir = \"x\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        assert!(matches!(
            parse_config("[renditions]\nthumb_width = 300"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_grid_style_rejected() {
        assert!(parse_config("[renditions]\ngrid_style = \"circle\"").is_err());
    }

    #[test]
    fn validate_quality_too_high() {
        let result = parse_config("[renditions]\njpeg_quality = 101");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_quality_zero() {
        let result = parse_config("[renditions]\nwebp_quality = 0");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_width() {
        let result = parse_config("[renditions]\nmedium_width = 0");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_relative_url_prefix() {
        let result = parse_config("url_prefix = \"assets/images\"");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contact-sheet.toml");
        fs::write(&path, "[renditions]\nthumbnail_width = 300\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.renditions.thumbnail_width, 300);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contact-sheet.toml");
        fs::write(&path, "this is not [valid toml").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }
}
