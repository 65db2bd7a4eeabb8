//! Region extraction and per-frame export.

use serde::Serialize;
use thiserror::Error;

use super::PixelRegion;
use crate::decode::DecodedImage;
use crate::encode::{encode_image, EncodeError, OutputFormat};
use crate::frame::CropFrame;
use crate::geometry::Rect;

/// Errors that can occur while exporting crops.
#[derive(Debug, Error, PartialEq)]
pub enum ExportError {
    /// The frame rounds to an empty or negative region.
    #[error("Invalid crop region: {0:?}")]
    InvalidRegion(Rect),

    /// The region extends past the source image.
    #[error("Crop region {region:?} is outside the {image_width}x{image_height} image")]
    OutOfBounds {
        region: PixelRegion,
        image_width: u32,
        image_height: u32,
    },

    /// Encoding the cropped pixels failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// One exported crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropOutput {
    pub name: String,
    /// Suggested download file name
    pub file_name: String,
    pub format: OutputFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Frame geometry the crop was cut from
    pub original_frame: Rect,
}

/// Copy `region` out of `image`.
///
/// # Errors
///
/// Returns `ExportError::OutOfBounds` if the region is not fully inside the image.
pub fn extract_region(image: &DecodedImage, region: PixelRegion) -> Result<DecodedImage, ExportError> {
    if !region.fits_within(image.width, image.height) {
        return Err(ExportError::OutOfBounds {
            region,
            image_width: image.width,
            image_height: image.height,
        });
    }

    let src_stride = image.width as usize * 3;
    let row_bytes = region.width as usize * 3;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in 0..region.height as usize {
        let row_start = (region.top as usize + y) * src_stride + region.left as usize * 3;
        output.extend_from_slice(&image.pixels[row_start..row_start + row_bytes]);
    }

    Ok(DecodedImage::new(region.width, region.height, output))
}

/// Download name for a frame: `cropped-<name>.<ext>`, whitespace runs become `-`.
pub fn export_file_name(name: &str, format: OutputFormat) -> String {
    let slug = name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("cropped-{}.{}", slug, format.extension())
}

/// Crop and encode a single frame.
pub fn crop_frame(
    image: &DecodedImage,
    frame: &CropFrame,
    format: OutputFormat,
) -> Result<CropOutput, ExportError> {
    let rect = frame.rect();
    let region = PixelRegion::from_rect(rect)?;
    let cropped = extract_region(image, region)?;
    let bytes = encode_image(&cropped, format)?;

    log::debug!(
        "exported frame '{}' as {}x{} {}",
        frame.id,
        region.width,
        region.height,
        format
    );

    Ok(CropOutput {
        name: frame.name.clone(),
        file_name: export_file_name(&frame.name, format),
        format,
        bytes,
        original_frame: rect,
    })
}

/// Crop every frame in order. Stops at the first failing frame.
pub fn crop_batch(
    image: &DecodedImage,
    frames: &[CropFrame],
    format: OutputFormat,
) -> Result<Vec<CropOutput>, ExportError> {
    let outputs = frames
        .iter()
        .map(|frame| crop_frame(image, frame, format))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("exported {} crop(s)", outputs.len());
    Ok(outputs)
}
