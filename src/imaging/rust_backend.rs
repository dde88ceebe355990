//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image` crate (pure Rust decoders, first frame for GIF) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Cover crop | fill-resize ([`calculate_fill_dimensions`]) + centered `crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → WebP | `webp::Encoder` (lossy, libwebp) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fill_dimensions;
use super::params::{Encoding, ResizeParams, ThumbnailParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use std::borrow::Cow;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and write an image with the requested codec.
fn save_image(img: &DynamicImage, path: &Path, encoding: Encoding) -> Result<(), BackendError> {
    match encoding {
        Encoding::Jpeg(quality) => save_jpeg(img, path, quality.value()),
        Encoding::WebP(quality) => save_webp(img, path, quality.value()),
    }
}

/// JPEG has no alpha channel, so the image is flattened to RGB8 first.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let rgb = img.to_rgb8();
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, quality as u8)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let rgba = img.to_rgba8();
    // libwebp rejects any side over 16383 px
    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
        .encode_simple(false, quality as f32)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {:?}", e)))?;
    std::fs::write(path, &*encoded).map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        Dimensions {
            width: image.width(),
            height: image.height(),
        }
    }

    fn resize(&self, image: &DynamicImage, params: &ResizeParams) -> Result<(), BackendError> {
        let resized = if (image.width(), image.height()) == (params.width, params.height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(image.resize_exact(params.width, params.height, FilterType::Lanczos3))
        };
        save_image(&resized, &params.output, params.encoding)
    }

    fn thumbnail(
        &self,
        image: &DynamicImage,
        params: &ThumbnailParams,
    ) -> Result<(), BackendError> {
        let (crop_w, crop_h) = (params.crop_width, params.crop_height);
        let (fill_w, fill_h) =
            calculate_fill_dimensions((image.width(), image.height()), (crop_w, crop_h));

        // Fill-resize then center-crop to exact dimensions
        let filled = image.resize_exact(fill_w, fill_h, FilterType::Lanczos3);
        let x = fill_w.saturating_sub(crop_w) / 2;
        let y = fill_h.saturating_sub(crop_h) / 2;
        let cropped = filled.crop_imm(x, y, crop_w, crop_h);

        save_image(&cropped, &params.output, params.encoding)
    }
}
