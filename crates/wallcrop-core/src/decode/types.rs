//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for upload and decoding operations.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The MIME type is not on the allow-list.
    #[error("Unsupported file type: {0}")]
    UnsupportedMimeType(String),

    /// The upload exceeds the configured byte limit.
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Metadata describing an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    /// Where the stored original can be fetched. Set by the storage layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
    pub original_name: String,
    /// Upload size in bytes
    pub size: u64,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32, original_name: impl Into<String>, size: u64) -> Self {
        Self {
            url: None,
            width,
            height,
            original_name: original_name.into(),
            size,
        }
    }

    /// Attach the storage URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Dimensions as floating point, for geometry.
    pub fn bounds(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
