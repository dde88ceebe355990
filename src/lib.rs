//! # Contact Sheet
//!
//! The image side of a static photo site: derives web renditions from source
//! photographs and serves a sorted, taggable photo catalog to whatever renders
//! the pages.
//!
//! # Architecture: Two Paths, One Slug
//!
//! ```text
//! source/photos/*.jpg + *.yaml
//!     │
//!     ├── process  (offline)   →  public/assets/images/<slug>/{thumbnail,medium,original}.*
//!     │
//!     └── catalog  (on demand) →  Vec<Photo> with /assets/images/<slug>/... URLs
//! ```
//!
//! The batch path writes files; the catalog path builds URLs. Neither reads
//! the other's output. They agree because both resolve a file's slug through
//! the same [`slug::SlugResolver`] and both name files through
//! [`rendition::RenditionFile`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `contact-sheet.toml` loading and validation |
//! | [`naming`] | Supported extensions, sidecar naming, source listing, slug validity |
//! | [`metadata`] | YAML sidecar loading with defaults |
//! | [`slug`] | Slug resolution shared by both paths |
//! | [`imaging`] | Pure-Rust resize and encode behind the `ImageBackend` trait |
//! | [`rendition`] | The five-file rendition set for one photo, with skip-if-done |
//! | [`process`] | Batch run over the source directory with failure isolation |
//! | [`catalog`] | Photo queries: all, by slug, by tag, recent, tag counts |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## File Presence Is the Cache
//!
//! A rendition set is considered done when its five files exist. There is no
//! manifest, no hashing, no timestamps. Re-running the batch is cheap, and
//! `--force` is the escape hatch when a source image changes under the same
//! slug.
//!
//! ## Catalog Without a Cache
//!
//! Every catalog query re-reads the source directory. A static build calls it
//! a handful of times; correctness after a sidecar edit matters more than the
//! milliseconds saved.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling, JPEG
//! encoding) and `webp` for lossy WebP. No ImageMagick, no system libraries to
//! install.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod rendition;
pub mod slug;

#[cfg(test)]
pub(crate) mod test_helpers;
