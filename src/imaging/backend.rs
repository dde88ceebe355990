//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations every backend must
//! support: decode a source once, report its dimensions, and write encoded
//! renditions from the decoded image (plain resize or cover-crop thumbnail).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust decoding and
//! resampling via the `image` crate, lossy WebP via the `webp` crate.

use super::params::{ResizeParams, ThumbnailParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// A source is decoded once with [`decode`](ImageBackend::decode); every
/// rendition is then derived from the same decoded image, so a rendition set
/// costs one decode regardless of how many files it writes.
pub trait ImageBackend: Sync {
    /// Decoded source image.
    type Image;

    /// Read and decode a source image.
    fn decode(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Dimensions of a decoded image.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resize to the exact dimensions in `params`, encode and write.
    fn resize(&self, image: &Self::Image, params: &ResizeParams) -> Result<(), BackendError>;

    /// Resize to fill the crop box, crop around the center, encode and write.
    fn thumbnail(&self, image: &Self::Image, params: &ThumbnailParams)
    -> Result<(), BackendError>;
}
