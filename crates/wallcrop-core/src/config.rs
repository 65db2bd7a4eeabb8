//! Editor configuration.
//!
//! Every field has a default matching the stock editor, so a config file only
//! needs the keys it wants to change:
//!
//! ```json
//! { "defaultFrameWidth": 400, "zoom": { "max": 800 } }
//! ```

use crate::frame::{AspectRatio, Monitor};
use crate::geometry::{Point, DEFAULT_FIT_PADDING};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload size limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Initial placement of default frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameLayout {
    /// Width of every freshly created frame, in natural pixels
    pub default_frame_width: f64,
    /// Position of the first frame
    pub cascade_origin: Point,
    /// Offset added per frame index
    pub cascade_step: Point,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            default_frame_width: 300.0,
            cascade_origin: Point::new(50.0, 50.0),
            cascade_step: Point::new(200.0, 100.0),
        }
    }
}

/// Zoom limits, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Container padding subtracted when fitting to screen
    pub fit_padding: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 25.0,
            max: 500.0,
            step: 25.0,
            fit_padding: DEFAULT_FIT_PADDING,
        }
    }
}

/// Accepted uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl UploadPolicy {
    pub fn allows_mime(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime)
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    #[serde(flatten)]
    pub layout: FrameLayout,
    pub zoom: ZoomConfig,
    pub upload: UploadPolicy,
    pub default_aspect_ratio: AspectRatio,
    pub default_monitors: Vec<Monitor>,
    /// Diagonal given to monitors added after startup
    pub new_monitor_inches: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: FrameLayout::default(),
            zoom: ZoomConfig::default(),
            upload: UploadPolicy::default(),
            default_aspect_ratio: AspectRatio::default(),
            default_monitors: vec![
                Monitor::new("1", "Monitor 1", 27.0, "#2563EB"),
                Monitor::new("2", "Monitor 2", 24.0, "#059669"),
            ],
            new_monitor_inches: 24.0,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling in defaults, and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.into(),
            }
        }

        if !(self.layout.default_frame_width > 0.0) {
            return Err(invalid("defaultFrameWidth", "must be positive"));
        }
        if !(self.zoom.min > 0.0 && self.zoom.min <= self.zoom.max) {
            return Err(invalid("zoom", "min must be positive and not above max"));
        }
        if !(self.zoom.step > 0.0) {
            return Err(invalid("zoom.step", "must be positive"));
        }
        if self.upload.max_bytes == 0 {
            return Err(invalid("upload.maxBytes", "must be non-zero"));
        }
        let ratio = &self.default_aspect_ratio;
        if !(ratio.width > 0.0 && ratio.height > 0.0) {
            return Err(invalid("defaultAspectRatio", "sides must be positive"));
        }
        if let Some(monitor) = self.default_monitors.iter().find(|m| !(m.inches > 0.0)) {
            return Err(invalid(
                "defaultMonitors",
                format!("monitor '{}' has {} inches", monitor.id, monitor.inches),
            ));
        }
        if !(self.new_monitor_inches > 0.0) {
            return Err(invalid("newMonitorInches", "must be positive"));
        }
        Ok(())
    }
}
