//! Slug resolution shared by the batch and catalog paths.
//!
//! A slug names a photo's output directory (`<output_dir>/<slug>/`) and its
//! catalog URLs (`<url_prefix>/<slug>/<file>`). Both paths resolve it through
//! [`SlugResolver`] so they always agree for the same source file:
//!
//! - sidecar `slug`, when the sidecar parses and sets one
//! - otherwise the filename basename (`harbour.jpg` → `harbour`)
//!
//! Resolution reads the sidecar on every call. Editing a sidecar's `slug`
//! after a batch run leaves the old rendition set orphaned and the new slug
//! without renditions until the next run.

use crate::metadata::{DefaultReason, LoadedMetadata, load_metadata};
use crate::naming::sidecar_path;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A source image with its slug and metadata resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub filename: String,
    /// Full path of the source image.
    pub path: PathBuf,
    pub slug: String,
    pub metadata: LoadedMetadata,
}

/// Resolves slugs and metadata for files in one source directory.
#[derive(Debug, Clone)]
pub struct SlugResolver {
    source_dir: PathBuf,
    today: NaiveDate,
}

impl SlugResolver {
    /// `today` is the date given to photos without a sidecar date.
    pub fn new(source_dir: &Path, today: NaiveDate) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            today,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Resolve a source image by filename (relative to the source directory).
    pub fn resolve(&self, filename: &str) -> ResolvedSource {
        let metadata = load_metadata(
            &sidecar_path(&self.source_dir, filename),
            filename,
            self.today,
        );

        match metadata.default_reason() {
            None | Some(DefaultReason::NoSidecar) => {}
            Some(reason) => tracing::warn!(file = filename, %reason, "using default metadata"),
        }

        ResolvedSource {
            filename: filename.to_string(),
            path: self.source_dir.join(filename),
            slug: metadata.metadata().slug.clone(),
            metadata,
        }
    }

    /// Just the slug for `filename`.
    pub fn resolve_slug(&self, filename: &str) -> String {
        self.resolve(filename).slug
    }
}
