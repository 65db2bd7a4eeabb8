//! WASM bindings for upload inspection and crop export.

use js_sys::Array;
use wallcrop_core::config::UploadPolicy;
use wallcrop_core::decode::{self, DecodedImage, ImageInfo};
use wallcrop_core::encode::OutputFormat;
use wallcrop_core::export::{self, CropOutput};
use wallcrop_core::frame::CropFrame;
use wallcrop_core::geometry::{self, Rect};
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// A validated, decoded upload held in WASM memory.
///
/// Frames are cut from this image on export, so it should live as long as
/// the session that edits it.
#[wasm_bindgen]
pub struct JsUpload {
    image: DecodedImage,
    info: ImageInfo,
}

impl JsUpload {
    pub(crate) fn image(&self) -> &DecodedImage {
        &self.image
    }
}

#[wasm_bindgen]
impl JsUpload {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.info.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.info.height
    }

    #[wasm_bindgen(getter)]
    pub fn original_name(&self) -> String {
        self.info.original_name.clone()
    }

    /// Upload size in bytes.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.info.size as f64
    }

    /// `{width, height, originalName, size}` as a plain object.
    pub fn info(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.info).map_err(to_js_error)
    }
}

/// Check an upload against the default policy and decode it.
///
/// # Arguments
///
/// * `bytes` - Raw file contents
/// * `mime` - MIME type reported by the browser
/// * `original_name` - File name as uploaded
///
/// # Errors
///
/// Rejects MIME types other than JPEG/PNG/WebP, files over 10 MB, and
/// bytes that do not decode.
#[wasm_bindgen]
pub fn inspect_upload(bytes: &[u8], mime: &str, original_name: &str) -> Result<JsUpload, JsValue> {
    let (image, info) = decode::inspect_upload(bytes, mime, original_name, &UploadPolicy::default())
        .map_err(to_js_error)?;
    Ok(JsUpload { image, info })
}

/// One encoded crop, ready for download.
#[wasm_bindgen]
pub struct JsCrop {
    output: CropOutput,
}

#[wasm_bindgen]
impl JsCrop {
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.output.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.output.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.output.format.mime_type().to_string()
    }

    /// Encoded file bytes (copied to a `Uint8Array`).
    pub fn bytes(&self) -> Vec<u8> {
        self.output.bytes.clone()
    }

    /// Frame geometry the crop was cut from, as `[x, y, width, height]`.
    pub fn original_frame(&self) -> Vec<f64> {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.output.original_frame;
        vec![x, y, width, height]
    }
}

fn parse_format(format: &str) -> Result<OutputFormat, JsValue> {
    format.parse::<OutputFormat>().map_err(to_js_error)
}

pub(crate) fn crops_to_array(outputs: Vec<CropOutput>) -> Array {
    outputs
        .into_iter()
        .map(|output| JsValue::from(JsCrop { output }))
        .collect()
}

pub(crate) fn export_frames(
    upload: &JsUpload,
    frames: &[CropFrame],
    format: &str,
) -> Result<Array, JsValue> {
    let format = parse_format(format)?;
    let outputs = export::crop_batch(upload.image(), frames, format).map_err(to_js_error)?;
    Ok(crops_to_array(outputs))
}

/// Crop and encode a single frame object.
///
/// # Arguments
///
/// * `upload` - Source image from `inspect_upload`
/// * `frame` - Crop frame `{id, name, x, y, width, height, ...}`
/// * `format` - "png", "jpeg" or "webp"
#[wasm_bindgen]
pub fn export_frame(upload: &JsUpload, frame: JsValue, format: &str) -> Result<JsCrop, JsValue> {
    let frame: CropFrame = serde_wasm_bindgen::from_value(frame)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop frame: {}", e)))?;
    let format = parse_format(format)?;
    let output = export::crop_frame(upload.image(), &frame, format).map_err(to_js_error)?;
    Ok(JsCrop { output })
}

/// Download file name for a frame name.
#[wasm_bindgen]
pub fn export_file_name(name: &str, format: &str) -> Result<String, JsValue> {
    Ok(export::export_file_name(name, parse_format(format)?))
}

/// Human-readable byte size ("1.5 MB").
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    geometry::format_bytes(bytes.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_binding() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(-4.0), "0 B");
    }

    #[test]
    fn test_crop_getters() {
        let image = DecodedImage::new(100, 60, vec![90u8; 100 * 60 * 3]);
        let frame = CropFrame {
            id: "frame-1".to_string(),
            name: "Monitor 1".to_string(),
            x: 10.0,
            y: 5.0,
            width: 50.0,
            height: 28.0,
            aspect_ratio: Default::default(),
            monitor_inches: 27.0,
            color: "#2563EB".to_string(),
            is_base_frame: true,
            monitor_id: Some("1".to_string()),
        };
        let output = export::crop_frame(&image, &frame, OutputFormat::Webp).unwrap();
        let crop = JsCrop { output };

        assert_eq!(crop.name(), "Monitor 1");
        assert_eq!(crop.file_name(), "cropped-Monitor-1.webp");
        assert_eq!(crop.mime_type(), "image/webp");
        assert_eq!(crop.original_frame(), vec![10.0, 5.0, 50.0, 28.0]);
        assert_eq!(&crop.bytes()[0..4], b"RIFF");
    }
}
