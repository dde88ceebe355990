//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take target sizes, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fit_width;
use super::params::{Encoding, ResizeParams, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Decoded image dimensions as `(width, height)`.
pub fn get_dimensions<B: ImageBackend>(backend: &B, image: &B::Image) -> (u32, u32) {
    let dims = backend.dimensions(image);
    (dims.width, dims.height)
}

/// Plan a width-capped resize without executing it.
///
/// The source is never enlarged; see [`calculate_fit_width`].
pub fn plan_fit(
    output: &Path,
    source_dims: (u32, u32),
    max_width: u32,
    encoding: Encoding,
) -> ResizeParams {
    let (width, height) = calculate_fit_width(source_dims, max_width);
    ResizeParams {
        output: output.to_path_buf(),
        width,
        height,
        encoding,
    }
}

/// Plan a cover-crop without executing it.
pub fn plan_cover(output: &Path, size: (u32, u32), encoding: Encoding) -> ThumbnailParams {
    ThumbnailParams {
        output: output.to_path_buf(),
        crop_width: size.0,
        crop_height: size.1,
        encoding,
    }
}

/// Write a width-capped, aspect-preserving rendition. Returns its dimensions.
pub fn create_fitted<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    output: &Path,
    max_width: u32,
    encoding: Encoding,
) -> Result<(u32, u32)> {
    let params = plan_fit(output, get_dimensions(backend, image), max_width, encoding);
    backend.resize(image, &params)?;
    Ok((params.width, params.height))
}

/// Write a cover-cropped rendition of exactly `size`. Returns its dimensions.
pub fn create_cover<B: ImageBackend>(
    backend: &B,
    image: &B::Image,
    output: &Path,
    size: (u32, u32),
    encoding: Encoding,
) -> Result<(u32, u32)> {
    let params = plan_cover(output, size, encoding);
    backend.thumbnail(image, &params)?;
    Ok(size)
}
