//! The editing session: one loaded image, its monitors and frames.
//!
//! `CropSession` is the single owner of mutable editor state. Every
//! operation that commits frame changes goes through [`CropSession::commit`],
//! which re-runs size reconciliation when its inputs changed and then keeps
//! every frame inside the image.
//!
//! # Example
//!
//! ```ignore
//! use wallcrop_core::{CropSession, EditorConfig, ImageInfo, Point, PointerTarget};
//!
//! let mut session = CropSession::new(EditorConfig::default());
//! session.load_image(ImageInfo::new(1920, 1080, "wall.png", 0));
//!
//! session.pointer_down("frame-1", PointerTarget::Body, Point::new(100.0, 100.0))?;
//! session.pointer_move(Point::new(140.0, 120.0));
//! session.pointer_up();
//! ```

use thiserror::Error;

use crate::collection::{next_monitor, FrameCollection, ReconcileKey};
use crate::config::EditorConfig;
use crate::decode::ImageInfo;
use crate::frame::{validate_inches, AspectRatio, CropFrame, FrameError, FrameUpdate, Monitor};
use crate::geometry::Point;
use crate::gesture::{FrameInteraction, Gesture, GestureMode, Handle, InteractionError, PointerTarget, Viewport};
use crate::project::{CropProject, NewProject, ProjectError};
use crate::reconcile::ReconcileOutcome;
use crate::zoom::ZoomState;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No image loaded")]
    NoImage,

    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    #[error("Unknown monitor: {0}")]
    UnknownMonitor(String),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Editor state for one image.
#[derive(Debug, Clone)]
pub struct CropSession {
    config: EditorConfig,
    image: Option<ImageInfo>,
    monitors: Vec<Monitor>,
    frames: FrameCollection,
    aspect_ratio: AspectRatio,
    zoom: ZoomState,
    interaction: FrameInteraction,
    /// On-screen size of the canvas container, once known
    container: Option<(f64, f64)>,
    /// Reconciliation inputs at the last commit
    last_key: Option<ReconcileKey>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CropSession {
    /// Empty session seeded with the configured monitors and aspect ratio.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            monitors: config.default_monitors.clone(),
            aspect_ratio: config.default_aspect_ratio.clone(),
            zoom: ZoomState::new(config.zoom.clone()),
            config,
            image: None,
            frames: FrameCollection::new(),
            interaction: FrameInteraction::new(),
            container: None,
            last_key: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&ImageInfo> {
        self.image.as_ref()
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn frames(&self) -> &[CropFrame] {
        self.frames.frames()
    }

    pub fn frame(&self, id: &str) -> Option<&CropFrame> {
        self.frames.get(id)
    }

    pub fn aspect_ratio(&self) -> &AspectRatio {
        &self.aspect_ratio
    }

    /// Whether the preset with `label` is the selected ratio.
    pub fn is_preset_selected(&self, label: &str) -> bool {
        self.aspect_ratio.matches_label(label)
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    /// Mode of the active gesture, `None` when idle.
    pub fn gesture_mode(&self) -> Option<GestureMode> {
        self.interaction.mode()
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Load an image, replacing all frames with one default frame per monitor.
    ///
    /// Zoom is fitted to the container when its size is known.
    pub fn load_image(&mut self, info: ImageInfo) {
        log::info!(
            "loading image '{}' ({}x{}), {} monitor(s)",
            info.original_name,
            info.width,
            info.height,
            self.monitors.len()
        );

        self.interaction.cancel();
        self.frames = FrameCollection::with_default_frames(
            &self.monitors,
            &self.aspect_ratio,
            &self.config.layout,
        );
        self.image = Some(info);
        self.last_key = None;
        self.commit();
        self.auto_fit();
    }

    /// Drop the image and every frame.
    pub fn clear_image(&mut self) {
        self.interaction.cancel();
        self.frames.clear();
        self.image = None;
        self.last_key = None;
        self.zoom.actual_size();
    }

    fn image_bounds(&self) -> Option<(f64, f64)> {
        self.image.as_ref().map(ImageInfo::bounds)
    }

    fn viewport(&self) -> Option<Viewport> {
        let (image_width, image_height) = self.image_bounds()?;
        Some(Viewport {
            image_width,
            image_height,
            scale: self.zoom.scale(),
        })
    }

    // ------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------

    /// Begin a drag (body) or resize (handle) on a frame.
    pub fn pointer_down(
        &mut self,
        frame_id: &str,
        target: PointerTarget,
        pointer: Point,
    ) -> Result<(), SessionError> {
        if self.image.is_none() {
            return Err(SessionError::NoImage);
        }
        let frame = self
            .frames
            .get(frame_id)
            .ok_or_else(|| SessionError::UnknownFrame(frame_id.to_string()))?;
        self.interaction.pointer_down(frame, target, pointer)?;
        Ok(())
    }

    pub fn pointer_down_body(&mut self, frame_id: &str, pointer: Point) -> Result<(), SessionError> {
        self.pointer_down(frame_id, PointerTarget::Body, pointer)
    }

    pub fn pointer_down_handle(
        &mut self,
        frame_id: &str,
        handle: Handle,
        pointer: Point,
    ) -> Result<(), SessionError> {
        self.pointer_down(frame_id, PointerTarget::Handle(handle), pointer)
    }

    /// Apply one pointer-move to the frame under gesture.
    ///
    /// Returns `false` when idle. If the frame or image went away mid-gesture,
    /// the gesture is cancelled.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(gesture) = self.interaction.gesture() else {
            return false;
        };
        let (Some(viewport), Some(current)) =
            (self.viewport(), self.frames.get(&gesture.frame_id).map(CropFrame::rect))
        else {
            log::warn!("gesture target vanished, cancelling");
            self.interaction.cancel();
            return false;
        };

        let Some((frame_id, update)) = self.interaction.pointer_move(pointer, current, viewport) else {
            return false;
        };
        self.frames.update_frame(&frame_id, &update);
        self.commit();
        true
    }

    /// End the active gesture, if any.
    pub fn pointer_up(&mut self) -> Option<Gesture> {
        self.interaction.pointer_up()
    }

    // ------------------------------------------------------------------
    // Frame edits
    // ------------------------------------------------------------------

    /// Merge a partial update into a frame. Unknown ids are ignored and
    /// give `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive `monitor_inches` before anything is applied.
    pub fn update_frame(&mut self, id: &str, update: &FrameUpdate) -> Result<bool, SessionError> {
        if let Some(inches) = update.monitor_inches {
            validate_inches(inches)?;
        }
        let applied = self.frames.update_frame(id, update);
        if applied {
            self.commit();
        }
        Ok(applied)
    }

    /// Select `ratio` and apply it to every frame, keeping widths.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        log::debug!("aspect ratio -> {} ({})", ratio.label, ratio.ratio());
        self.frames.set_aspect_ratio_for_all(&ratio);
        self.aspect_ratio = ratio;
        self.commit();
    }

    /// Select a user-entered ratio.
    pub fn set_custom_aspect_ratio(&mut self, width: f64, height: f64) -> Result<(), SessionError> {
        let ratio = AspectRatio::custom(width, height)?;
        self.set_aspect_ratio(ratio);
        Ok(())
    }

    /// Select a preset by label. Returns `false` for unknown labels.
    pub fn select_preset(&mut self, label: &str) -> bool {
        match AspectRatio::presets().into_iter().find(|p| p.label == label) {
            Some(preset) => {
                self.set_aspect_ratio(preset);
                true
            }
            None => false,
        }
    }

    /// Make `id` the sole base frame and reconcile around it.
    pub fn set_base_frame(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.frames.set_base_frame(id) {
            return Err(SessionError::UnknownFrame(id.to_string()));
        }
        self.commit();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Monitors
    // ------------------------------------------------------------------

    /// Append a monitor. Existing frames are untouched; the next image load
    /// creates its frame.
    pub fn add_monitor(&mut self) -> Monitor {
        let monitor = next_monitor(&self.monitors, self.config.new_monitor_inches);
        log::debug!("added monitor {} '{}'", monitor.id, monitor.name);
        self.monitors.push(monitor.clone());
        monitor
    }

    /// Change a monitor's diagonal and push it into the linked frame.
    ///
    /// Returns how many frames picked up the new value.
    pub fn update_monitor_inches(&mut self, monitor_id: &str, inches: f64) -> Result<usize, SessionError> {
        let inches = validate_inches(inches)?;
        let monitor = self
            .monitors
            .iter_mut()
            .find(|m| m.id == monitor_id)
            .ok_or_else(|| SessionError::UnknownMonitor(monitor_id.to_string()))?;
        monitor.inches = inches;
        let monitor = monitor.clone();

        let changed = self.frames.set_monitor_inches(&monitor, inches);
        self.commit();
        Ok(changed)
    }

    /// Rename a monitor and the frame created for it.
    pub fn rename_monitor(&mut self, monitor_id: &str, name: &str) -> Result<(), SessionError> {
        let monitor = self
            .monitors
            .iter_mut()
            .find(|m| m.id == monitor_id)
            .ok_or_else(|| SessionError::UnknownMonitor(monitor_id.to_string()))?;
        monitor.name = name.to_string();
        let monitor = monitor.clone();

        self.frames.rename_monitor_frames(&monitor, name);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out()
    }

    pub fn actual_size(&mut self) -> f64 {
        self.zoom.actual_size()
    }

    pub fn set_zoom_percent(&mut self, percent: f64) -> f64 {
        self.zoom.set_percent(percent)
    }

    /// Record the canvas container size and fit the loaded image into it.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container = Some((width, height));
        self.auto_fit();
    }

    /// Fit the loaded image into the known container.
    pub fn fit_to_screen(&mut self) -> Result<f64, SessionError> {
        let (image_width, image_height) = self.image_bounds().ok_or(SessionError::NoImage)?;
        let Some((container_width, container_height)) = self.container else {
            return Ok(self.zoom.percent());
        };
        Ok(self
            .zoom
            .fit_to_screen(image_width, image_height, container_width, container_height))
    }

    fn auto_fit(&mut self) {
        if self.image.is_some() && self.container.is_some() {
            // Only fails without an image, checked above.
            let _ = self.fit_to_screen();
        }
    }

    /// Natural pixel under a pointer offset from the image's on-screen origin.
    pub fn screen_to_image(&self, offset: Point) -> Point {
        self.zoom.screen_to_image(offset)
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Reconcile if any frame's inches or the base frame changed since the
    /// last commit, then fit every frame into the image. Returns the
    /// reconciliation outcome when a pass ran.
    pub fn commit(&mut self) -> Option<ReconcileOutcome> {
        let key = self.frames.reconcile_key();
        let outcome = if self.last_key.as_ref() == Some(&key) {
            None
        } else {
            let outcome = self.frames.reconcile(self.image_bounds());
            self.last_key = Some(self.frames.reconcile_key());
            Some(outcome)
        };

        if let Some((width, height)) = self.image_bounds() {
            let moved = self.frames.fit_to_image(width, height);
            if moved > 0 {
                log::debug!("fitted {} frame(s) into {}x{}", moved, width, height);
            }
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Snapshot the session as a project body.
    pub fn to_project(&self, name: &str) -> Result<NewProject, SessionError> {
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        let project = NewProject {
            name: name.to_string(),
            original_image_url: image.url.clone().unwrap_or_default(),
            image_width: image.width,
            image_height: image.height,
            crop_frames: self.frames.frames().to_vec(),
        };
        project.validate()?;
        Ok(project)
    }

    /// Restore a saved project. Frames are taken as saved, without reconciling.
    ///
    /// Monitors are rebuilt from frames that carry a `monitor_id`, so inch
    /// edits keep reaching them. Projects without any keep the configured
    /// monitors.
    pub fn from_project(config: EditorConfig, project: &CropProject) -> Self {
        let mut session = Self::new(config);
        let monitors = monitors_from_frames(&project.crop_frames);
        if !monitors.is_empty() {
            session.monitors = monitors;
        }
        session.image = Some(
            ImageInfo::new(project.image_width, project.image_height, project.name.as_str(), 0)
                .with_url(project.original_image_url.as_str()),
        );
        session.frames = FrameCollection::from_frames(project.crop_frames.clone());
        if let Some(ratio) = project.crop_frames.first().map(|f| f.aspect_ratio.clone()) {
            session.aspect_ratio = ratio;
        }
        session.last_key = Some(session.frames.reconcile_key());
        session
    }
}

/// One monitor per frame that records which monitor it was created for.
fn monitors_from_frames(frames: &[CropFrame]) -> Vec<Monitor> {
    frames
        .iter()
        .filter_map(|frame| {
            let id = frame.monitor_id.as_deref()?;
            Some(Monitor::new(
                id,
                frame.name.as_str(),
                frame.monitor_inches,
                frame.color.as_str(),
            ))
        })
        .collect()
}
