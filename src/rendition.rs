//! Rendition generation for a single photo.
//!
//! Every slug gets a fixed set of five derived files:
//!
//! ```text
//! <output_dir>/<slug>/
//! ├── thumbnail.jpg    # 400 wide (or 400x400 cover-crop in square grid style)
//! ├── thumbnail.webp
//! ├── medium.jpg       # width capped at 1200, never enlarged
//! ├── medium.webp
//! └── original.jpg     # width capped at 2400, never enlarged
//! ```
//!
//! The same layout backs the public URLs built by the catalog
//! ([`rendition_url`]), so the two never drift apart.
//!
//! ## Skip-if-done
//!
//! A set is complete iff all five files exist. Generation is skipped for a
//! complete set unless forced. Content is never inspected: a changed source
//! with an unchanged slug is not reprocessed, and a partial set left by a
//! crashed run is regenerated in full rather than resumed.

use crate::config::{GalleryConfig, GridStyle};
use crate::imaging::{BackendError, Encoding, ImageBackend, Quality, create_cover, create_fitted};
use crate::naming::is_valid_slug;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenditionError {
    #[error("Invalid slug {0:?}: must be a single non-empty path component")]
    InvalidSlug(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

/// One file of a rendition set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenditionFile {
    ThumbnailJpg,
    ThumbnailWebp,
    MediumJpg,
    MediumWebp,
    OriginalJpg,
}

impl RenditionFile {
    /// Every file of a complete set, in generation order.
    pub const ALL: [RenditionFile; 5] = [
        RenditionFile::ThumbnailJpg,
        RenditionFile::ThumbnailWebp,
        RenditionFile::MediumJpg,
        RenditionFile::MediumWebp,
        RenditionFile::OriginalJpg,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            RenditionFile::ThumbnailJpg => "thumbnail.jpg",
            RenditionFile::ThumbnailWebp => "thumbnail.webp",
            RenditionFile::MediumJpg => "medium.jpg",
            RenditionFile::MediumWebp => "medium.webp",
            RenditionFile::OriginalJpg => "original.jpg",
        }
    }
}

impl fmt::Display for RenditionFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Sizes and encodings for a rendition set.
#[derive(Debug, Clone, PartialEq)]
pub struct RenditionConfig {
    pub thumbnail_width: u32,
    pub medium_width: u32,
    pub original_width: u32,
    pub jpeg_quality: Quality,
    pub webp_quality: Quality,
    pub grid_style: GridStyle,
}

impl RenditionConfig {
    /// Build a RenditionConfig from GalleryConfig values.
    pub fn from_gallery_config(config: &GalleryConfig) -> Self {
        let r = &config.renditions;
        Self {
            thumbnail_width: r.thumbnail_width,
            medium_width: r.medium_width,
            original_width: r.original_width,
            jpeg_quality: Quality::new(r.jpeg_quality),
            webp_quality: Quality::new(r.webp_quality),
            grid_style: r.grid_style,
        }
    }

    /// Codec and quality used for `file`.
    pub fn encoding(&self, file: RenditionFile) -> Encoding {
        match file {
            RenditionFile::ThumbnailWebp | RenditionFile::MediumWebp => {
                Encoding::WebP(self.webp_quality)
            }
            _ => Encoding::Jpeg(self.jpeg_quality),
        }
    }
}

impl Default for RenditionConfig {
    fn default() -> Self {
        Self::from_gallery_config(&GalleryConfig::default())
    }
}

/// Directory holding the rendition set for `slug`.
pub fn rendition_dir(output_root: &Path, slug: &str) -> PathBuf {
    output_root.join(slug)
}

/// Public URL of one rendition file: `<url_prefix>/<slug>/<file>`.
pub fn rendition_url(url_prefix: &str, slug: &str, file: RenditionFile) -> String {
    format!(
        "{}/{}/{}",
        url_prefix.trim_end_matches('/'),
        slug,
        file.file_name()
    )
}

/// Whether all five rendition files exist in `dir` (existence only).
pub fn is_complete(dir: &Path) -> bool {
    RenditionFile::ALL
        .iter()
        .all(|file| dir.join(file.file_name()).is_file())
}

/// A file written during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file: RenditionFile,
    pub width: u32,
    pub height: u32,
}

/// What [`RenditionGenerator::generate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenditionOutcome {
    /// The set was already complete; nothing was written.
    Skipped,
    /// All five files were (re)written.
    Generated(Vec<GeneratedFile>),
}

/// Writes rendition sets under one output root.
pub struct RenditionGenerator<'a, B: ImageBackend> {
    backend: &'a B,
    output_root: PathBuf,
    config: RenditionConfig,
}

impl<'a, B: ImageBackend> RenditionGenerator<'a, B> {
    pub fn new(backend: &'a B, output_root: &Path, config: RenditionConfig) -> Self {
        Self {
            backend,
            output_root: output_root.to_path_buf(),
            config,
        }
    }

    /// Produce the rendition set for `source` under `<output_root>/<slug>/`.
    ///
    /// Skips a complete set unless `force`. The source is decoded once and
    /// every file is derived from that decode. Files are written one at a
    /// time; an error part-way leaves the earlier files in place.
    pub fn generate(
        &self,
        source: &Path,
        slug: &str,
        force: bool,
    ) -> Result<RenditionOutcome, RenditionError> {
        if !is_valid_slug(slug) {
            return Err(RenditionError::InvalidSlug(slug.to_string()));
        }

        let dir = rendition_dir(&self.output_root, slug);
        if !force && is_complete(&dir) {
            tracing::debug!(slug, "rendition set complete, skipping");
            return Ok(RenditionOutcome::Skipped);
        }

        std::fs::create_dir_all(&dir)?;
        let image = self.backend.decode(source)?;

        let mut written = Vec::with_capacity(RenditionFile::ALL.len());
        for file in RenditionFile::ALL {
            let (width, height) = self.write_file(&image, &dir, file)?;
            written.push(GeneratedFile {
                file,
                width,
                height,
            });
        }

        tracing::debug!(slug, source = %source.display(), "rendition set generated");
        Ok(RenditionOutcome::Generated(written))
    }

    fn write_file(
        &self,
        image: &B::Image,
        dir: &Path,
        file: RenditionFile,
    ) -> Result<(u32, u32), BackendError> {
        let output = dir.join(file.file_name());
        let encoding = self.config.encoding(file);
        let c = &self.config;

        match file {
            RenditionFile::ThumbnailJpg | RenditionFile::ThumbnailWebp => match c.grid_style {
                GridStyle::Square => create_cover(
                    self.backend,
                    image,
                    &output,
                    (c.thumbnail_width, c.thumbnail_width),
                    encoding,
                ),
                GridStyle::Original => {
                    create_fitted(self.backend, image, &output, c.thumbnail_width, encoding)
                }
            },
            RenditionFile::MediumJpg | RenditionFile::MediumWebp => {
                create_fitted(self.backend, image, &output, c.medium_width, encoding)
            }
            RenditionFile::OriginalJpg => {
                create_fitted(self.backend, image, &output, c.original_width, encoding)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::fs;
    use tempfile::TempDir;

    fn generated(outcome: RenditionOutcome) -> Vec<GeneratedFile> {
        match outcome {
            RenditionOutcome::Generated(files) => files,
            RenditionOutcome::Skipped => panic!("expected generation, got skip"),
        }
    }

    fn size_of(files: &[GeneratedFile], file: RenditionFile) -> (u32, u32) {
        let f = files.iter().find(|f| f.file == file).unwrap();
        (f.width, f.height)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn file_names_match_layout() {
        let names: Vec<&str> = RenditionFile::ALL.iter().map(|f| f.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "thumbnail.jpg",
                "thumbnail.webp",
                "medium.jpg",
                "medium.webp",
                "original.jpg"
            ]
        );
    }

    #[test]
    fn rendition_url_joins_prefix_slug_file() {
        assert_eq!(
            rendition_url("/assets/images", "harbour", RenditionFile::MediumWebp),
            "/assets/images/harbour/medium.webp"
        );
        assert_eq!(
            rendition_url("/assets/images/", "harbour", RenditionFile::OriginalJpg),
            "/assets/images/harbour/original.jpg"
        );
    }

    #[test]
    fn encodings_follow_config() {
        let config = RenditionConfig::default();
        assert_eq!(
            config.encoding(RenditionFile::ThumbnailJpg),
            Encoding::Jpeg(Quality::new(90))
        );
        assert_eq!(
            config.encoding(RenditionFile::MediumWebp),
            Encoding::WebP(Quality::new(85))
        );
        assert_eq!(
            config.encoding(RenditionFile::OriginalJpg),
            Encoding::Jpeg(Quality::new(90))
        );
    }

    #[test]
    fn is_complete_requires_all_five() {
        let tmp = TempDir::new().unwrap();
        assert!(!is_complete(tmp.path()));

        for file in &RenditionFile::ALL[..4] {
            fs::write(tmp.path().join(file.file_name()), "").unwrap();
        }
        assert!(!is_complete(tmp.path()));

        fs::write(tmp.path().join("original.jpg"), "").unwrap();
        assert!(is_complete(tmp.path()));
    }

    #[test]
    fn is_complete_missing_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(!is_complete(&tmp.path().join("nope")));
    }

    // =========================================================================
    // Generation with mock backend
    // =========================================================================

    #[test]
    fn generate_writes_full_set_with_one_decode() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        let outcome = generator
            .generate(Path::new("/src/harbour.jpg"), "harbour", false)
            .unwrap();

        assert_eq!(generated(outcome).len(), 5);
        assert!(is_complete(&tmp.path().join("harbour")));

        let ops = backend.get_operations();
        let decodes = ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Decode(_)))
            .count();
        assert_eq!(decodes, 1);
        assert_eq!(backend.write_count(), 5);
    }

    #[test]
    fn generate_sizes_for_wide_source() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 3000,
            height: 2000,
        });
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        let files = generated(generator.generate(Path::new("/a.jpg"), "a", false).unwrap());

        assert_eq!(size_of(&files, RenditionFile::ThumbnailJpg), (400, 267));
        assert_eq!(size_of(&files, RenditionFile::MediumJpg), (1200, 800));
        assert_eq!(size_of(&files, RenditionFile::MediumWebp), (1200, 800));
        assert_eq!(size_of(&files, RenditionFile::OriginalJpg), (2400, 1600));
    }

    #[test]
    fn generate_never_enlarges_narrow_source() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 800,
            height: 600,
        });
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        let files = generated(generator.generate(Path::new("/a.jpg"), "a", false).unwrap());

        assert_eq!(size_of(&files, RenditionFile::MediumJpg), (800, 600));
        assert_eq!(size_of(&files, RenditionFile::OriginalJpg), (800, 600));
        assert_eq!(size_of(&files, RenditionFile::ThumbnailWebp), (400, 300));
    }

    #[test]
    fn original_style_thumbnail_not_enlarged() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 300,
            height: 200,
        });
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        let files = generated(generator.generate(Path::new("/a.jpg"), "a", false).unwrap());
        assert_eq!(size_of(&files, RenditionFile::ThumbnailJpg), (300, 200));
    }

    #[test]
    fn square_style_uses_cover_crop() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 300,
            height: 900,
        });
        let config = RenditionConfig {
            grid_style: GridStyle::Square,
            ..RenditionConfig::default()
        };
        let generator = RenditionGenerator::new(&backend, tmp.path(), config);

        let files = generated(generator.generate(Path::new("/a.jpg"), "a", false).unwrap());
        assert_eq!(size_of(&files, RenditionFile::ThumbnailJpg), (400, 400));
        assert_eq!(size_of(&files, RenditionFile::ThumbnailWebp), (400, 400));

        let thumbs: Vec<_> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Thumbnail { .. }))
            .collect();
        assert_eq!(thumbs.len(), 2);
    }

    #[test]
    fn generate_uses_configured_qualities() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());
        generator.generate(Path::new("/a.jpg"), "a", false).unwrap();

        for op in backend.get_operations() {
            if let RecordedOp::Resize {
                output, encoding, ..
            } = op
            {
                if output.ends_with(".webp") {
                    assert_eq!(encoding, Encoding::WebP(Quality::new(85)));
                } else {
                    assert_eq!(encoding, Encoding::Jpeg(Quality::new(90)));
                }
            }
        }
    }

    // =========================================================================
    // Skip-if-done
    // =========================================================================

    #[test]
    fn second_run_is_skipped_without_writes() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        generator.generate(Path::new("/a.jpg"), "a", false).unwrap();
        let ops_after_first = backend.get_operations().len();

        let outcome = generator.generate(Path::new("/a.jpg"), "a", false).unwrap();
        assert_eq!(outcome, RenditionOutcome::Skipped);
        // Not even a decode
        assert_eq!(backend.get_operations().len(), ops_after_first);
    }

    #[test]
    fn force_regenerates_complete_set() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        generator.generate(Path::new("/a.jpg"), "a", false).unwrap();
        let outcome = generator.generate(Path::new("/a.jpg"), "a", true).unwrap();

        assert!(matches!(outcome, RenditionOutcome::Generated(_)));
        assert_eq!(backend.write_count(), 10);
    }

    #[test]
    fn missing_file_regenerates_all_five() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        generator.generate(Path::new("/a.jpg"), "a", false).unwrap();
        fs::remove_file(tmp.path().join("a/medium.webp")).unwrap();

        let files = generated(generator.generate(Path::new("/a.jpg"), "a", false).unwrap());
        assert_eq!(files.len(), 5);
        assert_eq!(backend.write_count(), 10);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn decode_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new().failing_on("broken");
        let generator = RenditionGenerator::new(&backend, tmp.path(), RenditionConfig::default());

        let result = generator.generate(Path::new("/src/broken.jpg"), "broken", false);
        assert!(matches!(result, Err(RenditionError::Imaging(_))));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn invalid_slug_rejected_before_any_write() {
        let tmp = TempDir::new().unwrap();
        let output_root = tmp.path().join("out");
        let backend = MockBackend::new();
        let generator =
            RenditionGenerator::new(&backend, &output_root, RenditionConfig::default());

        let result = generator.generate(Path::new("/a.jpg"), "../escape", false);
        assert!(matches!(result, Err(RenditionError::InvalidSlug(_))));
        assert!(backend.get_operations().is_empty());
        assert!(!output_root.exists());
    }
}
