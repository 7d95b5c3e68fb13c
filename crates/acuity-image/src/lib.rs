#![deny(missing_docs)]
//! Batched image containers and layout conversion for the acuity filters.

/// Error types for the image module.
pub mod error;

/// Batched planar image representation.
pub mod image;

/// Host-boundary layout normalization.
pub mod layout;

/// Elementwise image operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{BatchSize, ImageBatch};
pub use crate::layout::{image_from_host, image_to_host};
