//! Photo catalog: the read path consumed by page rendering.
//!
//! The catalog is rebuilt from the source directory on every call. There is
//! no cache to invalidate: a query always reflects the sidecars and images
//! on disk at that moment.
//!
//! Each [`Photo`] carries the public URLs of its rendition set, built from
//! the same slug and layout the batch run writes to. URLs are not checked
//! against the filesystem; a photo whose renditions were never generated
//! still gets URLs.
//!
//! ## Ordering
//!
//! Photos are sorted newest first by their parsed `date`. The sort is stable
//! over filename order, so equal dates keep filename order. Dates that don't
//! parse sort after every dated photo.
//!
//! ## Missing source directory
//!
//! Unlike the batch run, a missing source directory is not an error here: it
//! logs a warning and yields an empty catalog, so a page render never fails
//! on it.

use crate::config::GalleryConfig;
use crate::metadata::{self, PhotoMetadata};
use crate::naming::list_source_images;
use crate::rendition::{RenditionFile, rendition_url};
use crate::slug::SlugResolver;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::path::Path;

/// Number of photos returned by [`Catalog::recent_photos`] in the CLI.
pub const DEFAULT_RECENT_LIMIT: usize = 30;

/// One photo as the rendering layer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    pub slug: String,
    /// Source image filename.
    pub filename: String,
    pub metadata: PhotoMetadata,
    pub images: PhotoImages,
}

/// Public URLs of a photo's rendition set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoImages {
    pub thumbnail: ImagePair,
    pub medium: ImagePair,
    pub original: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePair {
    pub jpg: String,
    pub webp: String,
}

impl PhotoImages {
    pub fn for_slug(url_prefix: &str, slug: &str) -> Self {
        let url = |file| rendition_url(url_prefix, slug, file);
        Self {
            thumbnail: ImagePair {
                jpg: url(RenditionFile::ThumbnailJpg),
                webp: url(RenditionFile::ThumbnailWebp),
            },
            medium: ImagePair {
                jpg: url(RenditionFile::MediumJpg),
                webp: url(RenditionFile::MediumWebp),
            },
            original: url(RenditionFile::OriginalJpg),
        }
    }

    /// Every URL in the set, in rendition order.
    pub fn urls(&self) -> [&str; 5] {
        [
            &self.thumbnail.jpg,
            &self.thumbnail.webp,
            &self.medium.jpg,
            &self.medium.webp,
            &self.original,
        ]
    }
}

/// Source files that resolved to the same slug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugConflict {
    pub slug: String,
    /// Filenames sharing the slug, sorted. The first one owns the renditions.
    pub filenames: Vec<String>,
}

/// Query interface over the source directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    resolver: SlugResolver,
    url_prefix: String,
}

impl Catalog {
    /// Catalog for `config`, defaulting undated photos to today's UTC date.
    pub fn new(config: &GalleryConfig) -> Self {
        Self::with_today(config, metadata::today())
    }

    pub fn with_today(config: &GalleryConfig, today: NaiveDate) -> Self {
        Self {
            resolver: SlugResolver::new(&config.source_dir, today),
            url_prefix: config.url_prefix.clone(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        self.resolver.source_dir()
    }

    /// Every photo, newest first.
    pub fn all_photos(&self) -> Vec<Photo> {
        let source_dir = self.resolver.source_dir();
        if !source_dir.is_dir() {
            tracing::warn!(dir = %source_dir.display(), "photo source directory not found");
            return Vec::new();
        }
        let files = match list_source_images(source_dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(dir = %source_dir.display(), error = %e, "cannot list photos");
                return Vec::new();
            }
        };

        let mut photos: Vec<Photo> = files
            .iter()
            .map(|filename| {
                let source = self.resolver.resolve(filename);
                Photo {
                    images: PhotoImages::for_slug(&self.url_prefix, &source.slug),
                    slug: source.slug,
                    filename: source.filename,
                    metadata: source.metadata.into_metadata(),
                }
            })
            .collect();

        photos.sort_by_key(|p| Reverse(p.metadata.parsed_date()));
        photos
    }

    /// First photo in catalog order with this slug.
    pub fn photo_by_slug(&self, slug: &str) -> Option<Photo> {
        self.all_photos().into_iter().find(|p| p.slug == slug)
    }

    /// Tag → number of photos carrying it.
    pub fn all_tags(&self) -> BTreeMap<String, usize> {
        let mut tags = BTreeMap::new();
        for photo in self.all_photos() {
            for tag in photo.metadata.tags {
                *tags.entry(tag).or_insert(0) += 1;
            }
        }
        tags
    }

    /// Photos carrying `tag`, in catalog order.
    pub fn photos_by_tag(&self, tag: &str) -> Vec<Photo> {
        self.all_photos()
            .into_iter()
            .filter(|p| p.metadata.has_tag(tag))
            .collect()
    }

    /// The newest `limit` photos.
    pub fn recent_photos(&self, limit: usize) -> Vec<Photo> {
        let mut photos = self.all_photos();
        photos.truncate(limit);
        photos
    }

    /// Slugs claimed by more than one source file.
    ///
    /// The batch run renders only the first file (by name) for each of these;
    /// the catalog still lists all of them.
    pub fn slug_conflicts(&self) -> Vec<SlugConflict> {
        let mut by_slug: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for photo in self.all_photos() {
            by_slug.entry(photo.slug).or_default().push(photo.filename);
        }
        by_slug
            .into_iter()
            .filter(|(_, filenames)| filenames.len() > 1)
            .map(|(slug, mut filenames)| {
                filenames.sort();
                SlugConflict { slug, filenames }
            })
            .collect()
    }
}
