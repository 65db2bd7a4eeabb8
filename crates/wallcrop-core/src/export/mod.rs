//! Crop export: turn committed frames into encoded image files.
//!
//! # Pipeline
//!
//! 1. Round the frame geometry to whole pixels ([`PixelRegion`])
//! 2. Copy the region out of the source image
//! 3. Encode it in the requested [`OutputFormat`](crate::encode::OutputFormat)
//!
//! Regions that fall outside the source image are an error here, not
//! clamped: the editor guarantees valid geometry, so an out-of-bounds
//! request means the frame and image disagree.

mod crop;
mod region;

pub use crop::{crop_batch, crop_frame, export_file_name, extract_region, CropOutput, ExportError};
pub use region::PixelRegion;
