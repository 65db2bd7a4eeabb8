//! Proportional sizing of frames relative to the base frame.
//!
//! Each non-base frame gets `width = base.width * frame.inches / base.inches`,
//! floored at [`MIN_FRAME_SIZE`], and a height derived from its own aspect
//! ratio. The base frame is never touched. The pass is a pure function of the frame set, so running it twice
//! gives the same result.

use crate::frame::CropFrame;
use crate::geometry::{fit_rect_to_image, MIN_FRAME_SIZE};

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Sizes were recomputed for this many sibling frames.
    Applied { resized: usize },
    /// Nothing to do: the collection is empty.
    Empty,
    /// No frame is marked as base; frames left unchanged.
    NoBaseFrame,
    /// More than one frame is marked as base; frames left unchanged.
    MultipleBaseFrames(usize),
    /// The base frame has a non-positive size or inch value.
    InvalidBaseFrame,
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileOutcome::Applied { .. })
    }
}

/// Find the unique base frame index, or explain why there isn't one.
pub fn base_frame_index(frames: &[CropFrame]) -> Result<usize, ReconcileOutcome> {
    if frames.is_empty() {
        return Err(ReconcileOutcome::Empty);
    }

    let mut bases = frames
        .iter()
        .enumerate()
        .filter(|(_, frame)| frame.is_base_frame)
        .map(|(index, _)| index);

    match (bases.next(), bases.count()) {
        (None, _) => Err(ReconcileOutcome::NoBaseFrame),
        (Some(index), 0) => Ok(index),
        (Some(_), extra) => Err(ReconcileOutcome::MultipleBaseFrames(extra + 1)),
    }
}

/// Rescale every non-base frame from the base frame's width and inches.
///
/// When `image_bounds` is given, each resized frame is passed through
/// [`fit_rect_to_image`] so it cannot leave the canvas and keeps its ratio.
///
/// Runs only when exactly one base frame exists; otherwise the frames are
/// left as they are and the outcome says why.
pub fn reconcile_frame_sizes(
    frames: &mut [CropFrame],
    image_bounds: Option<(f64, f64)>,
) -> ReconcileOutcome {
    let base_index = match base_frame_index(frames) {
        Ok(index) => index,
        Err(outcome) => {
            if outcome != ReconcileOutcome::Empty {
                log::warn!("skipping frame reconciliation: {:?}", outcome);
            }
            return outcome;
        }
    };

    let base_width = frames[base_index].width;
    let base_inches = frames[base_index].monitor_inches;
    if !(base_width > 0.0 && base_inches > 0.0) {
        log::warn!(
            "skipping frame reconciliation: base frame '{}' has width {} and {} inches",
            frames[base_index].id,
            base_width,
            base_inches
        );
        return ReconcileOutcome::InvalidBaseFrame;
    }

    let mut resized = 0;
    for (index, frame) in frames.iter_mut().enumerate() {
        if index == base_index {
            continue;
        }

        let scale_ratio = frame.monitor_inches / base_inches;
        let width = (base_width * scale_ratio).max(MIN_FRAME_SIZE);
        let height = width / frame.aspect_ratio.ratio();

        let mut rect = frame.rect();
        rect.width = width;
        rect.height = height;
        if let Some((image_width, image_height)) = image_bounds {
            rect = fit_rect_to_image(rect, image_width, image_height);
        }

        frame.set_rect(rect);
        resized += 1;
    }

    log::debug!(
        "reconciled {} frame(s) against base '{}'",
        resized,
        frames[base_index].id
    );
    ReconcileOutcome::Applied { resized }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
