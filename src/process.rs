//! Batch rendition processing.
//!
//! The offline step: walks the source directory, resolves each image's slug
//! and writes its rendition set.
//!
//! ```text
//! source/photos/                 public/assets/images/
//! ├── harbour.jpg        ──►     ├── harbour/
//! ├── harbour.yaml               │   ├── thumbnail.jpg
//! └── DSC_0042.png       ──►     │   ├── ...
//!                                └── DSC_0042/
//! ```
//!
//! ## Failure isolation
//!
//! One bad image never aborts the batch. Decode, encode and write failures
//! are recorded against the offending file and the run moves on; the
//! [`BatchSummary`] lists them. Only a missing or unreadable source directory
//! fails the whole run.
//!
//! ## Slug conflicts
//!
//! Files are processed in filename order. When a file resolves to a slug
//! already claimed earlier in the run, it is recorded as a
//! [`ImageError::SlugConflict`] failure and not rendered, so one photo's
//! rendition set is never overwritten by another's.
//!
//! ## Progress
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel; the
//! CLI formats them with [`crate::output`].

use crate::config::GalleryConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::metadata;
use crate::naming::list_source_images;
use crate::rendition::{RenditionConfig, RenditionError, RenditionGenerator, RenditionOutcome};
use crate::slug::SlugResolver;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single image failed.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("slug {slug:?} is already used by {claimed_by}")]
    SlugConflict { slug: String, claimed_by: String },
    #[error(transparent)]
    Rendition(#[from] RenditionError),
}

/// Progress events emitted while a batch runs.
#[derive(Debug)]
pub enum ProcessEvent {
    Started {
        source_dir: PathBuf,
        image_count: usize,
    },
    NoImages {
        source_dir: PathBuf,
    },
    ImageProcessed {
        /// 1-based position in the batch.
        index: usize,
        filename: String,
        slug: String,
        outcome: RenditionOutcome,
    },
    ImageFailed {
        index: usize,
        filename: String,
        error: String,
    },
}

/// A per-image failure recorded in the summary.
#[derive(Debug)]
pub struct BatchFailure {
    pub filename: String,
    pub slug: String,
    pub error: ImageError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub generated: usize,
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    /// Images that ended with a complete rendition set.
    pub fn successes(&self) -> usize {
        self.generated + self.skipped
    }

    pub fn total(&self) -> usize {
        self.successes() + self.failures.len()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generated, {} skipped, {} failed ({} total)",
            self.generated,
            self.skipped,
            self.failures.len(),
            self.total()
        )
    }
}

/// Process every source image with the pure Rust backend.
pub fn process(
    config: &GalleryConfig,
    force: bool,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    process_with_backend(&RustBackend::new(), config, force, events)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend<B: ImageBackend>(
    backend: &B,
    config: &GalleryConfig,
    force: bool,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event);
        }
    };

    let source_dir = &config.source_dir;
    if !source_dir.is_dir() {
        return Err(ProcessError::SourceNotFound(source_dir.clone()));
    }

    let files = list_source_images(source_dir)?;
    let mut summary = BatchSummary::default();
    if files.is_empty() {
        emit(ProcessEvent::NoImages {
            source_dir: source_dir.clone(),
        });
        return Ok(summary);
    }

    emit(ProcessEvent::Started {
        source_dir: source_dir.clone(),
        image_count: files.len(),
    });

    let resolver = SlugResolver::new(source_dir, metadata::today());
    let generator = RenditionGenerator::new(
        backend,
        &config.output_dir,
        RenditionConfig::from_gallery_config(config),
    );
    let mut claimed: HashMap<String, String> = HashMap::new();

    for (i, filename) in files.iter().enumerate() {
        let index = i + 1;
        let source = resolver.resolve(filename);

        let result = match claimed.get(&source.slug) {
            Some(first) => Err(ImageError::SlugConflict {
                slug: source.slug.clone(),
                claimed_by: first.clone(),
            }),
            None => {
                claimed.insert(source.slug.clone(), filename.clone());
                generator
                    .generate(&source.path, &source.slug, force)
                    .map_err(ImageError::from)
            }
        };

        match result {
            Ok(outcome) => {
                match outcome {
                    RenditionOutcome::Skipped => summary.skipped += 1,
                    RenditionOutcome::Generated(_) => summary.generated += 1,
                }
                emit(ProcessEvent::ImageProcessed {
                    index,
                    filename: filename.clone(),
                    slug: source.slug,
                    outcome,
                });
            }
            Err(error) => {
                emit(ProcessEvent::ImageFailed {
                    index,
                    filename: filename.clone(),
                    error: error.to_string(),
                });
                summary.failures.push(BatchFailure {
                    filename: filename.clone(),
                    slug: source.slug,
                    error,
                });
            }
        }
    }

    Ok(summary)
}
