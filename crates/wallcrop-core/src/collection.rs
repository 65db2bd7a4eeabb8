//! The ordered set of crop frames and the rules for changing it.
//!
//! Order is creation order. It drives the cascaded initial placement and the
//! render z-order; nothing else depends on it.

use crate::config::FrameLayout;
use crate::geometry::fit_rect_to_image;
use crate::frame::{AspectRatio, CropFrame, FrameUpdate, Monitor};
use crate::reconcile::{reconcile_frame_sizes, ReconcileOutcome};

/// Owner of all crop frames for the loaded image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameCollection {
    frames: Vec<CropFrame>,
}

impl FrameCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing frames (e.g. from a saved project) without modification.
    pub fn from_frames(frames: Vec<CropFrame>) -> Self {
        Self { frames }
    }

    /// One frame per monitor, cascaded from the layout origin.
    ///
    /// The first monitor's frame becomes the base frame.
    pub fn with_default_frames(monitors: &[Monitor], ratio: &AspectRatio, layout: &FrameLayout) -> Self {
        Self {
            frames: create_default_frames(monitors, ratio, layout),
        }
    }

    pub fn frames(&self) -> &[CropFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<CropFrame> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CropFrame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// The frame currently marked as base, if exactly one is.
    pub fn base_frame(&self) -> Option<&CropFrame> {
        let mut bases = self.frames.iter().filter(|f| f.is_base_frame);
        match (bases.next(), bases.next()) {
            (Some(base), None) => Some(base),
            _ => None,
        }
    }

    /// Remove every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Merge `update` into the frame with `id`.
    ///
    /// An unknown id is ignored and `false` is returned. Setting
    /// `is_base_frame: true` clears the flag on every other frame;
    /// `is_base_frame: false` is ignored so the collection always keeps
    /// its base.
    pub fn update_frame(&mut self, id: &str, update: &FrameUpdate) -> bool {
        let Some(frame) = self.frames.iter_mut().find(|f| f.id == id) else {
            log::debug!("update for unknown frame '{}' ignored", id);
            return false;
        };
        frame.apply(update);

        if update.is_base_frame == Some(true) {
            self.set_base_frame(id);
        }
        true
    }

    /// Give every frame `ratio`, keeping width and deriving height.
    pub fn set_aspect_ratio_for_all(&mut self, ratio: &AspectRatio) {
        for frame in &mut self.frames {
            frame.aspect_ratio = ratio.clone();
            frame.height = (frame.width / ratio.ratio()).round();
        }
    }

    /// Move every frame, base included, inside a `width x height` image.
    ///
    /// Frames are shifted first and scaled down (keeping their proportion)
    /// only when larger than the image. Returns how many frames changed.
    pub fn fit_to_image(&mut self, width: f64, height: f64) -> usize {
        let mut changed = 0;
        for frame in &mut self.frames {
            let rect = frame.rect();
            let fitted = fit_rect_to_image(rect, width, height);
            if fitted != rect {
                frame.set_rect(fitted);
                changed += 1;
            }
        }
        changed
    }

    /// Make `id` the only base frame. Unknown ids leave the collection unchanged.
    pub fn set_base_frame(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            log::warn!("cannot make unknown frame '{}' the base frame", id);
            return false;
        }
        for frame in &mut self.frames {
            frame.is_base_frame = frame.id == id;
        }
        true
    }

    /// Push a monitor's new diagonal into the frame created for it.
    ///
    /// Frames are matched by `monitor_id`; frames without one (older projects)
    /// fall back to matching the monitor's name. Returns how many frames changed.
    pub fn set_monitor_inches(&mut self, monitor: &Monitor, inches: f64) -> usize {
        let mut changed = 0;
        for frame in &mut self.frames {
            let linked = match &frame.monitor_id {
                Some(monitor_id) => *monitor_id == monitor.id,
                None => frame.name == monitor.name,
            };
            if linked {
                frame.monitor_inches = inches;
                changed += 1;
            }
        }
        changed
    }

    /// Rename the frame(s) linked to `monitor` by id.
    pub fn rename_monitor_frames(&mut self, monitor: &Monitor, name: &str) {
        for frame in &mut self.frames {
            if frame.monitor_id.as_deref() == Some(monitor.id.as_str()) {
                frame.name = name.to_string();
            }
        }
    }

    /// Run size reconciliation over the collection.
    pub fn reconcile(&mut self, image_bounds: Option<(f64, f64)>) -> ReconcileOutcome {
        reconcile_frame_sizes(&mut self.frames, image_bounds)
    }

    /// Value that changes whenever reconciliation needs to run again:
    /// every frame's inches plus the base frame's id.
    pub fn reconcile_key(&self) -> ReconcileKey {
        ReconcileKey {
            inches: self.frames.iter().map(|f| f.monitor_inches).collect(),
            base_id: self
                .frames
                .iter()
                .find(|f| f.is_base_frame)
                .map(|f| f.id.clone()),
        }
    }
}

/// Snapshot of the inputs that trigger reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileKey {
    inches: Vec<f64>,
    base_id: Option<String>,
}

/// Build one frame per monitor.
///
/// Frame `i` sits at `origin + i * step`, is `layout.default_frame_width`
/// wide with a height rounded from `ratio`, and only frame 0 is the base.
pub fn create_default_frames(
    monitors: &[Monitor],
    ratio: &AspectRatio,
    layout: &FrameLayout,
) -> Vec<CropFrame> {
    let width = layout.default_frame_width;
    let height = (width / ratio.ratio()).round();

    monitors
        .iter()
        .enumerate()
        .map(|(index, monitor)| {
            let offset = index as f64;
            CropFrame {
                id: format!("frame-{}", monitor.id),
                name: monitor.name.clone(),
                x: layout.cascade_origin.x + offset * layout.cascade_step.x,
                y: layout.cascade_origin.y + offset * layout.cascade_step.y,
                width,
                height,
                aspect_ratio: ratio.clone(),
                monitor_inches: monitor.inches,
                color: monitor.color.clone(),
                is_base_frame: index == 0,
                monitor_id: Some(monitor.id.clone()),
            }
        })
        .collect()
}

/// The monitor that `add` would append: id `len + 1`, hue rotated 60° per index.
pub fn next_monitor(monitors: &[Monitor], inches: f64) -> Monitor {
    let count = monitors.len();
    Monitor {
        id: (count + 1).to_string(),
        name: format!("Monitor {}", count + 1),
        inches,
        color: format!("hsl({}, 70%, 50%)", (count * 60) % 360),
    }
}
