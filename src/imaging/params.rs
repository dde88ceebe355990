//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They are the
//! interface between [`operations`](super::operations) (which decides the
//! target sizes) and the [`backend`](super::backend) (which does the pixel
//! work and encoding), so a mock backend can stand in for tests.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Encoding`]: Output codec plus its quality.
//! - [`ResizeParams`]: Aspect-preserving resize to exact, precomputed dimensions.
//! - [`ThumbnailParams`]: Cover-crop: fill the box, crop the excess around the center.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output codec for a rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Jpeg(Quality),
    WebP(Quality),
}

/// Parameters for a plain resize (dimensions already aspect-corrected).
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
}

/// Parameters for a cover-crop thumbnail (resize to fill + center crop).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub output: PathBuf,
    /// Final crop dimensions.
    pub crop_width: u32,
    pub crop_height: u32,
    pub encoding: Encoding,
}
