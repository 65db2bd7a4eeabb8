//! Wallcrop Core - crop-frame engine for multi-monitor wallpapers
//!
//! This crate provides the editing model for cutting one image into several
//! monitor-sized crops: frame geometry, the drag/resize state machine,
//! size reconciliation by monitor diagonal, and the session that owns it all.
//! It also carries the local image collaborator used to inspect uploads and
//! export the finished crops.

pub mod collection;
pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod project;
pub mod reconcile;
pub mod session;
pub mod zoom;

pub use collection::{create_default_frames, next_monitor, FrameCollection};
pub use config::{ConfigError, EditorConfig};
pub use decode::{inspect_upload, DecodeError, DecodedImage, ImageInfo};
pub use encode::{EncodeError, OutputFormat};
pub use export::{crop_batch, crop_frame, CropOutput, ExportError};
pub use frame::{AspectRatio, CropFrame, FrameError, FrameUpdate, Monitor};
pub use geometry::{
    calculate_optimal_zoom, constrain_rect_to_image, fit_rect_to_image, format_bytes, point_in_rect,
    scale_rect, unscale_rect, Point, Rect,
};
pub use gesture::{FrameInteraction, GestureMode, Handle, InteractionError, PointerTarget};
pub use project::{CropProject, MemoryProjectStore, NewProject, ProjectError, ProjectStore};
pub use reconcile::{reconcile_frame_sizes, ReconcileOutcome};
pub use session::{CropSession, SessionError};
pub use zoom::ZoomState;
