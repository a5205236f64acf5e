//!
//! # Avatar Normalization
//!
//! The image-processing step is a pure function behind the [`ImageNormalizer`]
//! trait: raw upload bytes in, 250x250 PNG bytes out, with non-image input
//! rejected. [`PngNormalizer`] implements it with the `image` crate using
//! cover semantics (fill the square, cropping the overflow).

use crate::error::AppError;
use image::{imageops::FilterType, ImageOutputFormat};
use std::io::Cursor;

/// Upload size ceiling, enforced before normalization runs.
pub const MAX_AVATAR_BYTES: usize = 1_000_000;

pub const AVATAR_DIMENSION: u32 = 250;

pub trait ImageNormalizer: Send + Sync {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, AppError>;
}

pub struct PngNormalizer;

impl ImageNormalizer for PngNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, AppError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|_| AppError::InvalidUpload("Please upload an image file".into()))?;

        let resized =
            decoded.resize_to_fill(AVATAR_DIMENSION, AVATAR_DIMENSION, FilterType::Triangle);

        let mut out = Cursor::new(Vec::new());
        resized
            .write_to(&mut out, ImageOutputFormat::Png)
            .map_err(|e| AppError::Internal(format!("Failed to encode avatar: {}", e)))?;
        Ok(out.into_inner())
    }
}
