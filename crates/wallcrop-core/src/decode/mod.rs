//! Upload inspection and decoding.
//!
//! This module provides functionality for:
//! - Checking an upload against the MIME allow-list and size limit
//! - Reading image dimensions without a full decode
//! - Decoding JPEG, PNG and WebP images to RGB pixel data
//!
//! # Examples
//!
//! ```ignore
//! use wallcrop_core::config::UploadPolicy;
//! use wallcrop_core::decode::inspect_upload;
//!
//! let bytes = std::fs::read("wallpaper.png").unwrap();
//! let (image, info) = inspect_upload(&bytes, "image/png", "wallpaper.png", &UploadPolicy::default()).unwrap();
//! println!("Decoded {}x{} image", info.width, info.height);
//! ```

mod types;
mod upload;

pub use types::{DecodeError, DecodedImage, ImageInfo};
pub use upload::{check_upload, decode_image, inspect_upload, read_dimensions};
