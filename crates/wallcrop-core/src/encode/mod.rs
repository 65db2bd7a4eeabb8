//! Image encoding for exported crops.
//!
//! This module provides functionality for:
//! - Encoding RGB pixel data to PNG, JPEG or lossless WebP
//!
//! # Examples
//!
//! ```ignore
//! use wallcrop_core::encode::{encode, OutputFormat};
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let png_bytes = encode(&pixels, 100, 100, OutputFormat::Png).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod writer;

pub use writer::{encode, encode_image, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
