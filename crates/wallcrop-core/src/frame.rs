//! Crop frame records and the monitors that seed them.
//!
//! Field names serialize in camelCase so frames round-trip through the
//! browser UI and saved projects unchanged.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label carried by user-entered aspect ratios.
pub const CUSTOM_LABEL: &str = "custom";

/// Errors for invalid frame or monitor values.
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    /// Aspect ratio components must be finite and positive.
    #[error("Invalid aspect ratio {width}:{height}: both sides must be positive")]
    InvalidAspectRatio { width: f64, height: f64 },

    /// Monitor diagonal must be finite and positive.
    #[error("Invalid monitor size: {0} inches")]
    InvalidInches(f64),
}

/// A width:height proportion with a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl AspectRatio {
    /// Create an aspect ratio, rejecting non-positive sides.
    pub fn new(width: f64, height: f64, label: impl Into<String>) -> Result<Self, FrameError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FrameError::InvalidAspectRatio { width, height });
        }
        Ok(Self {
            width,
            height,
            label: label.into(),
        })
    }

    /// A user-entered ratio, labelled [`CUSTOM_LABEL`].
    pub fn custom(width: f64, height: f64) -> Result<Self, FrameError> {
        Self::new(width, height, CUSTOM_LABEL)
    }

    /// The built-in presets: 16:9, 21:9, 4:3 and 1:1.
    pub fn presets() -> Vec<AspectRatio> {
        [(16.0, 9.0, "16:9"), (21.0, 9.0, "21:9"), (4.0, 3.0, "4:3"), (1.0, 1.0, "1:1")]
            .into_iter()
            .map(|(width, height, label)| AspectRatio {
                width,
                height,
                label: label.to_string(),
            })
            .collect()
    }

    /// `width / height`.
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn is_custom(&self) -> bool {
        self.label == CUSTOM_LABEL
    }

    /// Whether this ratio highlights the given preset. Matching is by label only.
    pub fn matches_label(&self, label: &str) -> bool {
        self.label == label
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
            label: "16:9".to_string(),
        }
    }
}

/// A physical display declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: String,
    pub name: String,
    /// Diagonal size in inches
    pub inches: f64,
    /// CSS color used for the frame outline
    pub color: String,
}

impl Monitor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        inches: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            inches,
            color: color.into(),
        }
    }
}

/// One export region over the image, in natural pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropFrame {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: AspectRatio,
    pub monitor_inches: f64,
    pub color: String,
    #[serde(default)]
    pub is_base_frame: bool,
    /// Monitor this frame was created for. Absent in older projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<String>,
}

impl CropFrame {
    /// Geometry of the frame.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Replace position and size.
    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Merge the fields present in `update`.
    ///
    /// `is_base_frame` is not merged here: only the collection may move the
    /// base flag, so it stays unique.
    pub fn apply(&mut self, update: &FrameUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
        if let Some(ratio) = &update.aspect_ratio {
            self.aspect_ratio = ratio.clone();
        }
        if let Some(inches) = update.monitor_inches {
            self.monitor_inches = inches;
        }
        if let Some(color) = &update.color {
            self.color.clone_from(color);
        }
    }
}

/// A partial frame update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameUpdate {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub aspect_ratio: Option<AspectRatio>,
    pub monitor_inches: Option<f64>,
    pub color: Option<String>,
    /// `Some(true)` makes this frame the base. `Some(false)` is ignored;
    /// pick another base instead.
    pub is_base_frame: Option<bool>,
}

impl FrameUpdate {
    /// Position-only update.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Position and size update.
    pub fn rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Default::default()
        }
    }

    pub fn monitor_inches(inches: f64) -> Self {
        Self {
            monitor_inches: Some(inches),
            ..Default::default()
        }
    }

    /// True if the update carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validate a monitor diagonal.
pub fn validate_inches(inches: f64) -> Result<f64, FrameError> {
    if inches.is_finite() && inches > 0.0 {
        Ok(inches)
    } else {
        Err(FrameError::InvalidInches(inches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> CropFrame {
        CropFrame {
            id: "frame-1".to_string(),
            name: "Monitor 1".to_string(),
            x: 50.0,
            y: 50.0,
            width: 300.0,
            height: 169.0,
            aspect_ratio: AspectRatio::default(),
            monitor_inches: 27.0,
            color: "#2563EB".to_string(),
            is_base_frame: true,
            monitor_id: Some("1".to_string()),
        }
    }

    #[test]
    fn test_presets() {
        let presets = AspectRatio::presets();
        let labels: Vec<_> = presets.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["16:9", "21:9", "4:3", "1:1"]);
        assert_eq!(presets[0], AspectRatio::default());
    }

    #[test]
    fn test_custom_ratio() {
        let ratio = AspectRatio::custom(32.0, 9.0).unwrap();
        assert!(ratio.is_custom());
        assert!(!ratio.matches_label("16:9"));
        assert!((ratio.ratio() - 32.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        assert_eq!(
            AspectRatio::custom(0.0, 9.0),
            Err(FrameError::InvalidAspectRatio {
                width: 0.0,
                height: 9.0
            })
        );
        assert!(AspectRatio::custom(16.0, -1.0).is_err());
        assert!(AspectRatio::custom(f64::NAN, 9.0).is_err());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut frame = sample_frame();
        frame.apply(&FrameUpdate::position(10.0, 20.0));

        assert_eq!(frame.x, 10.0);
        assert_eq!(frame.y, 20.0);
        assert_eq!(frame.width, 300.0);
        assert_eq!(frame.height, 169.0);
        assert!(frame.is_base_frame);
    }

    #[test]
    fn test_apply_leaves_base_flag() {
        let mut frame = sample_frame();
        frame.apply(&FrameUpdate {
            is_base_frame: Some(false),
            ..Default::default()
        });
        assert!(frame.is_base_frame);
    }

    #[test]
    fn test_apply_rect_update() {
        let mut frame = sample_frame();
        frame.apply(&FrameUpdate::rect(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(frame.rect(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_empty_update() {
        assert!(FrameUpdate::default().is_empty());
        assert!(!FrameUpdate::monitor_inches(24.0).is_empty());
    }

    #[test]
    fn test_frame_json_is_camel_case() {
        let json = serde_json::to_string(&sample_frame()).unwrap();
        assert!(json.contains("\"aspectRatio\""));
        assert!(json.contains("\"monitorInches\":27.0"));
        assert!(json.contains("\"isBaseFrame\":true"));
        assert!(json.contains("\"monitorId\":\"1\""));
    }

    #[test]
    fn test_legacy_frame_without_monitor_id() {
        let json = r##"{
            "id": "frame-2", "name": "Monitor 2",
            "x": 250, "y": 150, "width": 300, "height": 169,
            "aspectRatio": {"width": 16, "height": 9, "label": "16:9"},
            "monitorInches": 24, "color": "#059669"
        }"##;
        let frame: CropFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.monitor_id, None);
        assert!(!frame.is_base_frame);
        assert_eq!(frame.width, 300.0);
    }

    #[test]
    fn test_partial_update_from_json() {
        let update: FrameUpdate = serde_json::from_str(r#"{"monitorInches": 32}"#).unwrap();
        assert_eq!(update, FrameUpdate::monitor_inches(32.0));
    }

    #[test]
    fn test_validate_inches() {
        assert_eq!(validate_inches(27.0), Ok(27.0));
        assert_eq!(validate_inches(0.0), Err(FrameError::InvalidInches(0.0)));
        assert!(validate_inches(-3.0).is_err());
    }
}
