//! WASM bindings for the editing session.
//!
//! `JsCropSession` owns a `CropSession`. Frames, monitors and projects
//! cross the boundary as plain objects (camelCase keys) through
//! `serde-wasm-bindgen`; pointer coordinates are screen pixels.

use js_sys::Array;
use wallcrop_core::config::EditorConfig;
use wallcrop_core::decode::ImageInfo;
use wallcrop_core::frame::{AspectRatio, FrameUpdate};
use wallcrop_core::geometry::Point;
use wallcrop_core::gesture::{GestureMode, Handle, PointerTarget};
use wallcrop_core::project::CropProject;
use wallcrop_core::session::CropSession;
use wasm_bindgen::prelude::*;

use crate::export::{export_frames, JsUpload};
use crate::to_js_error;

/// Editor state for one image.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new JsCropSession();
/// session.set_container_size(el.clientWidth, el.clientHeight);
/// session.load_image(1920, 1080, 'wall.png', '/uploads/wall.png');
///
/// // Resize from the south-east corner
/// session.pointer_down('frame-1', 'se', e.clientX, e.clientY);
/// window.onpointermove = (e) => session.pointer_move(e.clientX, e.clientY);
/// window.onpointerup = () => session.pointer_up();
/// ```
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

impl Default for JsCropSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsCropSession {
    /// Session with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCropSession {
        JsCropSession {
            inner: CropSession::default(),
        }
    }

    /// Session with a JSON `EditorConfig`; missing keys take defaults.
    pub fn with_config(json: &str) -> Result<JsCropSession, JsValue> {
        let config = EditorConfig::from_json(json).map_err(to_js_error)?;
        Ok(JsCropSession {
            inner: CropSession::new(config),
        })
    }

    /// Restore a saved project object.
    pub fn from_project(project: JsValue) -> Result<JsCropSession, JsValue> {
        let project: CropProject = serde_wasm_bindgen::from_value(project)
            .map_err(|e| JsValue::from_str(&format!("Invalid project: {}", e)))?;
        project.validate().map_err(to_js_error)?;
        Ok(JsCropSession {
            inner: CropSession::from_project(EditorConfig::default(), &project),
        })
    }

    // --- Image ----------------------------------------------------------

    /// Load an image and create one frame per monitor.
    pub fn load_image(&mut self, width: u32, height: u32, original_name: &str, url: Option<String>) {
        let mut info = ImageInfo::new(width, height, original_name, 0);
        info.url = url;
        self.inner.load_image(info);
    }

    pub fn clear_image(&mut self) {
        self.inner.clear_image();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.image().is_some()
    }

    // --- State ----------------------------------------------------------

    /// All frames in creation order.
    pub fn frames(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.frames()).map_err(to_js_error)
    }

    pub fn monitors(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.monitors()).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn frame_count(&self) -> usize {
        self.inner.frames().len()
    }

    /// "idle", "dragging", or "resizing-<handle>".
    pub fn interaction_state(&self) -> String {
        match self.inner.gesture_mode() {
            None => "idle".to_string(),
            Some(GestureMode::Dragging) => "dragging".to_string(),
            Some(GestureMode::Resizing(handle)) => format!("resizing-{}", handle),
        }
    }

    // --- Pointer --------------------------------------------------------

    /// Start a gesture. Pass a handle name ("n", "se", ...) to resize,
    /// nothing to drag.
    pub fn pointer_down(
        &mut self,
        frame_id: &str,
        handle: Option<String>,
        x: f64,
        y: f64,
    ) -> Result<(), JsValue> {
        let target = match handle {
            Some(name) => PointerTarget::Handle(name.parse::<Handle>().map_err(to_js_error)?),
            None => PointerTarget::Body,
        };
        self.inner
            .pointer_down(frame_id, target, Point::new(x, y))
            .map_err(to_js_error)
    }

    /// Returns `true` if a frame changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y))
    }

    /// Returns `true` if a gesture ended.
    pub fn pointer_up(&mut self) -> bool {
        self.inner.pointer_up().is_some()
    }

    /// CSS cursor for a handle name.
    pub fn handle_cursor(handle: &str) -> Result<String, JsValue> {
        let handle: Handle = handle.parse().map_err(to_js_error)?;
        Ok(handle.cursor().to_string())
    }

    // --- Frames ---------------------------------------------------------

    /// Merge a partial frame object. Returns `false` for unknown ids and
    /// throws on non-positive `monitorInches`.
    pub fn update_frame(&mut self, id: &str, update: JsValue) -> Result<bool, JsValue> {
        let update: FrameUpdate = serde_wasm_bindgen::from_value(update)
            .map_err(|e| JsValue::from_str(&format!("Invalid frame update: {}", e)))?;
        self.inner.update_frame(id, &update).map_err(to_js_error)
    }

    pub fn set_base_frame(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_base_frame(id).map_err(to_js_error)
    }

    /// Preset aspect ratios `{width, height, label}`.
    pub fn presets() -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&AspectRatio::presets()).map_err(to_js_error)
    }

    pub fn select_preset(&mut self, label: &str) -> bool {
        self.inner.select_preset(label)
    }

    pub fn set_custom_aspect_ratio(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .set_custom_aspect_ratio(width, height)
            .map_err(to_js_error)
    }

    pub fn is_preset_selected(&self, label: &str) -> bool {
        self.inner.is_preset_selected(label)
    }

    // --- Monitors -------------------------------------------------------

    /// Append a monitor and return it.
    pub fn add_monitor(&mut self) -> Result<JsValue, JsValue> {
        let monitor = self.inner.add_monitor();
        serde_wasm_bindgen::to_value(&monitor).map_err(to_js_error)
    }

    /// Returns the number of frames that picked up the change.
    pub fn update_monitor_inches(&mut self, monitor_id: &str, inches: f64) -> Result<usize, JsValue> {
        self.inner
            .update_monitor_inches(monitor_id, inches)
            .map_err(to_js_error)
    }

    pub fn rename_monitor(&mut self, monitor_id: &str, name: &str) -> Result<(), JsValue> {
        self.inner.rename_monitor(monitor_id, name).map_err(to_js_error)
    }

    // --- Zoom -----------------------------------------------------------

    #[wasm_bindgen(getter)]
    pub fn zoom_percent(&self) -> f64 {
        self.inner.zoom().percent()
    }

    #[wasm_bindgen(getter)]
    pub fn can_zoom_in(&self) -> bool {
        self.inner.zoom().can_zoom_in()
    }

    #[wasm_bindgen(getter)]
    pub fn can_zoom_out(&self) -> bool {
        self.inner.zoom().can_zoom_out()
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.inner.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.inner.zoom_out()
    }

    pub fn actual_size(&mut self) -> f64 {
        self.inner.actual_size()
    }

    pub fn set_zoom(&mut self, percent: f64) -> f64 {
        self.inner.set_zoom_percent(percent)
    }

    /// Record the canvas container size; refits a loaded image.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.inner.set_container_size(width, height);
    }

    pub fn fit_to_screen(&mut self) -> Result<f64, JsValue> {
        self.inner.fit_to_screen().map_err(to_js_error)
    }

    /// Natural pixel under a pointer offset from the image origin, as `[x, y]`.
    pub fn cursor_position(&self, offset_x: f64, offset_y: f64) -> Vec<f64> {
        let point = self.inner.screen_to_image(Point::new(offset_x, offset_y));
        vec![point.x, point.y]
    }

    // --- Output ---------------------------------------------------------

    /// Snapshot as a project body `{name, originalImageUrl, imageWidth, imageHeight, cropFrames}`.
    pub fn to_project(&self, name: &str) -> Result<JsValue, JsValue> {
        let project = self.inner.to_project(name).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&project).map_err(to_js_error)
    }

    /// Crop every frame out of `upload`, in frame order.
    ///
    /// Returns an array of `JsCrop`.
    pub fn export(&self, upload: &JsUpload, format: &str) -> Result<Array, JsValue> {
        export_frames(upload, self.inner.frames(), format)
    }
}
