//! Upload validation and format-guessing decode.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodeError, DecodedImage, ImageInfo};
use crate::config::UploadPolicy;

/// Reject uploads whose MIME type or size the policy does not allow.
pub fn check_upload(mime: &str, size: u64, policy: &UploadPolicy) -> Result<(), DecodeError> {
    if !policy.allows_mime(mime) {
        return Err(DecodeError::UnsupportedMimeType(mime.to_string()));
    }
    if size > policy.max_bytes {
        return Err(DecodeError::TooLarge {
            size,
            limit: policy.max_bytes,
        });
    }
    Ok(())
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Read width and height from the header without decoding pixels.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
pub fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = reader(bytes)?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    reader
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Decode any supported format to RGB8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized and
/// `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = reader(bytes)?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(DecodedImage::from_rgb_image(img.into_rgb8()))
}

/// Validate and decode an upload.
///
/// Returns the pixels plus the metadata the editor needs to create frames.
/// The returned `ImageInfo` has no URL; the storage layer attaches one.
pub fn inspect_upload(
    bytes: &[u8],
    mime: &str,
    original_name: &str,
    policy: &UploadPolicy,
) -> Result<(DecodedImage, ImageInfo), DecodeError> {
    let size = bytes.len() as u64;
    check_upload(mime, size, policy).inspect_err(|e| log::warn!("upload rejected: {}", e))?;

    let image = decode_image(bytes)?;
    if image.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let info = ImageInfo::new(image.width, image.height, original_name, size);
    log::info!(
        "accepted upload '{}': {}x{}, {} bytes",
        original_name,
        info.width,
        info.height,
        size
    );
    Ok((image, info))
}
