//! Pointer gesture handling for a single crop frame.
//!
//! A gesture starts on pointer-down (frame body or one of eight handles),
//! turns every pointer-move into a clamped [`FrameUpdate`], and ends on
//! pointer-up wherever the pointer is.
//!
//! # States
//!
//! ```text
//! Idle --down(body)--> Dragging --up--> Idle
//! Idle --down(handle)--> Resizing(handle) --up--> Idle
//! ```
//!
//! Pointer positions are screen coordinates. Deltas are divided by the zoom
//! scale before being applied to the natural-pixel snapshot taken at
//! pointer-down, so repeated moves never accumulate rounding drift.

use crate::frame::{CropFrame, FrameUpdate};
use crate::geometry::{clamp_rect_to_bounds, Point, Rect, MIN_FRAME_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by the interaction state machine.
#[derive(Debug, Error, PartialEq)]
pub enum InteractionError {
    /// A pointer-down arrived while another gesture was still active.
    #[error("A gesture on frame '{0}' is already in progress")]
    GestureInProgress(String),

    /// Unrecognized handle name.
    #[error("Unknown resize handle: {0}")]
    UnknownHandle(String),
}

/// Resize handle on a frame's corner or edge midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::Nw,
        Handle::Ne,
        Handle::Sw,
        Handle::Se,
        Handle::N,
        Handle::E,
        Handle::S,
        Handle::W,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::Ne | Handle::Nw | Handle::Se | Handle::Sw)
    }

    /// CSS cursor shown while hovering the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            Handle::N => "n-resize",
            Handle::S => "s-resize",
            Handle::E => "e-resize",
            Handle::W => "w-resize",
            Handle::Ne => "ne-resize",
            Handle::Nw => "nw-resize",
            Handle::Se => "se-resize",
            Handle::Sw => "sw-resize",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::Ne => "ne",
            Handle::Nw => "nw",
            Handle::Se => "se",
            Handle::Sw => "sw",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(Handle::N),
            "s" => Ok(Handle::S),
            "e" => Ok(Handle::E),
            "w" => Ok(Handle::W),
            "ne" => Ok(Handle::Ne),
            "nw" => Ok(Handle::Nw),
            "se" => Ok(Handle::Se),
            "sw" => Ok(Handle::Sw),
            other => Err(InteractionError::UnknownHandle(other.to_string())),
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Body,
    Handle(Handle),
}

/// Kind of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Dragging,
    Resizing(Handle),
}

/// Transient state captured at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub frame_id: String,
    pub mode: GestureMode,
    /// Pointer position at pointer-down, in screen coordinates
    pub origin: Point,
    /// Frame geometry at pointer-down, in natural coordinates
    pub snapshot: Rect,
    /// Locked `width / height` for the duration of the gesture
    pub ratio: f64,
}

/// Image size and zoom scale a pointer-move is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub image_width: f64,
    pub image_height: f64,
    /// Zoom factor (1.0 = 100%)
    pub scale: f64,
}

/// Idle / Dragging / Resizing state machine for one pointer.
#[derive(Debug, Clone, Default)]
pub struct FrameInteraction {
    active: Option<Gesture>,
}

impl FrameInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active gesture, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Current mode, `None` when idle.
    pub fn mode(&self) -> Option<GestureMode> {
        self.active.as_ref().map(|g| g.mode)
    }

    /// Start a drag or resize on `frame`.
    ///
    /// Fails if a gesture is already active; the previous gesture stays in place.
    pub fn pointer_down(
        &mut self,
        frame: &CropFrame,
        target: PointerTarget,
        pointer: Point,
    ) -> Result<(), InteractionError> {
        if let Some(active) = &self.active {
            return Err(InteractionError::GestureInProgress(active.frame_id.clone()));
        }

        let mode = match target {
            PointerTarget::Body => GestureMode::Dragging,
            PointerTarget::Handle(handle) => GestureMode::Resizing(handle),
        };

        log::debug!("gesture start: frame={} mode={:?}", frame.id, mode);

        self.active = Some(Gesture {
            frame_id: frame.id.clone(),
            mode,
            origin: pointer,
            snapshot: frame.rect(),
            ratio: frame.aspect_ratio.ratio(),
        });
        Ok(())
    }

    /// Compute the update for a pointer-move. `None` when idle.
    ///
    /// `current` is the frame's committed geometry; dragging uses its size so
    /// an external resize during the gesture is respected.
    pub fn pointer_move(
        &self,
        pointer: Point,
        current: Rect,
        viewport: Viewport,
    ) -> Option<(String, FrameUpdate)> {
        let gesture = self.active.as_ref()?;

        let dx = (pointer.x - gesture.origin.x) / viewport.scale;
        let dy = (pointer.y - gesture.origin.y) / viewport.scale;

        let update = match gesture.mode {
            GestureMode::Dragging => {
                let (x, y) = drag_position(gesture.snapshot, current, dx, dy, viewport);
                FrameUpdate::position(x, y)
            }
            GestureMode::Resizing(handle) => {
                let rect = resize_rect(gesture.snapshot, handle, gesture.ratio, dx, dy);
                FrameUpdate::rect(clamp_rect_to_bounds(
                    rect,
                    viewport.image_width,
                    viewport.image_height,
                ))
            }
        };

        Some((gesture.frame_id.clone(), update))
    }

    /// End the active gesture, returning it. Safe to call when idle.
    pub fn pointer_up(&mut self) -> Option<Gesture> {
        let ended = self.active.take();
        if let Some(gesture) = &ended {
            log::debug!("gesture end: frame={} mode={:?}", gesture.frame_id, gesture.mode);
        }
        ended
    }

    /// Drop the gesture without emitting anything (frame removed, image cleared).
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

/// New position for a drag, clamped to `[0, image_dim - frame_dim]`.
fn drag_position(snapshot: Rect, current: Rect, dx: f64, dy: f64, viewport: Viewport) -> (f64, f64) {
    let x = (snapshot.x + dx)
        .min(viewport.image_width - current.width)
        .max(0.0);
    let y = (snapshot.y + dy)
        .min(viewport.image_height - current.height)
        .max(0.0);
    (x, y)
}

/// Candidate rect for a handle resize, before bounds clamping.
///
/// Corners and `e`/`w` drive width from the horizontal delta, `n`/`s` drive
/// height from the vertical delta. The opposite corner or edge stays put;
/// edge handles keep the frame centered on the perpendicular axis.
pub fn resize_rect(start: Rect, handle: Handle, ratio: f64, dx: f64, dy: f64) -> Rect {
    let grown_width = || (start.width + dx).max(MIN_FRAME_SIZE);
    let shrunk_width = || (start.width - dx).max(MIN_FRAME_SIZE);
    let min_height = MIN_FRAME_SIZE / ratio;

    let mut x = start.x;
    let mut y = start.y;
    let (width, height);

    match handle {
        Handle::Se => {
            width = grown_width();
            height = width / ratio;
        }
        Handle::Sw => {
            width = shrunk_width();
            height = width / ratio;
            x = start.x + (start.width - width);
        }
        Handle::Ne => {
            width = grown_width();
            height = width / ratio;
            y = start.y + (start.height - height);
        }
        Handle::Nw => {
            width = shrunk_width();
            height = width / ratio;
            x = start.x + (start.width - width);
            y = start.y + (start.height - height);
        }
        Handle::E => {
            width = grown_width();
            height = width / ratio;
            y = start.y + (start.height - height) / 2.0;
        }
        Handle::W => {
            width = shrunk_width();
            height = width / ratio;
            x = start.x + (start.width - width);
            y = start.y + (start.height - height) / 2.0;
        }
        Handle::S => {
            height = (start.height + dy).max(min_height);
            width = height * ratio;
            x = start.x + (start.width - width) / 2.0;
        }
        Handle::N => {
            height = (start.height - dy).max(min_height);
            width = height * ratio;
            x = start.x + (start.width - width) / 2.0;
            y = start.y + (start.height - height);
        }
    }

    Rect {
        x,
        y,
        width,
        height,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
