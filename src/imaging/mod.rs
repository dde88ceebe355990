//! Image processing: pure Rust decoding and resampling.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from content) |
//! | **Fit to width** | `resize_exact` (Lanczos3) to never-enlarged dimensions |
//! | **Cover crop** | fill-resize + centered crop |
//! | **Encode** | JPEG via `image`, lossy WebP via `webp` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_width;
pub use operations::{create_cover, create_fitted, get_dimensions};
pub use params::{Encoding, Quality, ResizeParams, ThumbnailParams};
pub use rust_backend::RustBackend;
