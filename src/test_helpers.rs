//! Shared test utilities for the contact-sheet test suite.
//!
//! Synthetic image writers and a sidecar writer, so tests can build a
//! source directory in a `TempDir` without checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("harbour.jpg"), 300, 200);
//! write_sidecar(tmp.path(), "harbour", "title: Harbour\ndate: 2024-06-15\n");
//! ```

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

// =========================================================================
// Image writers
// =========================================================================

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create an RGBA PNG with a transparent left half.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, alpha])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

// =========================================================================
// Sidecars
// =========================================================================

/// Write `<dir>/<basename>.yaml` with the given YAML content.
pub fn write_sidecar(dir: &Path, basename: &str, yaml: &str) {
    std::fs::write(dir.join(format!("{basename}.yaml")), yaml).unwrap();
}
