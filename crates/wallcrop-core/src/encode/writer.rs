//! Format-specific encoders backed by the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use thiserror::Error;

use crate::decode::DecodedImage;

/// JPEG quality used for exports.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during encoding.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Unknown output format name
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output file format for exported crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Encode RGB pixel data.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `format` - Target format; JPEG uses [`DEFAULT_JPEG_QUALITY`], WebP is lossless
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, DEFAULT_JPEG_QUALITY)
            .write_image(pixels, width, height, ExtendedColorType::Rgb8),
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
            pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a decoded image.
pub fn encode_image(image: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    encode(&image.pixels, image.width, image.height, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature() {
        let pixels = vec![128u8; 20 * 10 * 3];
        let bytes = encode(&pixels, 20, 10, OutputFormat::Png).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let pixels = vec![128u8; 16 * 16 * 3];
        let bytes = encode(&pixels, 16, 16, OutputFormat::Jpeg).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_webp_riff() {
        let pixels = vec![64u8; 8 * 8 * 3];
        let bytes = encode(&pixels, 8, 8, OutputFormat::Webp).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_encoded_png_decodes_back() {
        let image = DecodedImage::new(12, 7, vec![10u8; 12 * 7 * 3]);
        let bytes = encode_image(&image, OutputFormat::Png).unwrap();
        let decoded = crate::decode::decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (12, 7));
        assert_eq!(decoded.pixels, image.pixels);
    }

    #[test]
    fn test_encode_zero_dimensions() {
        assert_eq!(
            encode(&[], 0, 10, OutputFormat::Png),
            Err(EncodeError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_encode_wrong_buffer_size() {
        let result = encode(&[0u8; 10], 2, 2, OutputFormat::Jpeg);
        assert_eq!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 12,
                actual: 10
            })
        );
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("PNG".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("jpg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("jpeg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("webp".parse::<OutputFormat>(), Ok(OutputFormat::Webp));
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Webp.mime_type(), "image/webp");
    }
}
