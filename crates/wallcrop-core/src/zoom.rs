//! Canvas zoom level and screen/natural coordinate conversion.

use crate::config::ZoomConfig;
use crate::geometry::{calculate_optimal_zoom, Point};

/// Zoom level of the canvas, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    percent: f64,
    config: ZoomConfig,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl ZoomState {
    /// Start at 100%.
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            percent: 100.0,
            config,
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Zoom factor (1.0 at 100%).
    #[inline]
    pub fn scale(&self) -> f64 {
        self.percent / 100.0
    }

    pub fn can_zoom_in(&self) -> bool {
        self.percent < self.config.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.percent > self.config.min
    }

    /// One step in, capped at the maximum.
    pub fn zoom_in(&mut self) -> f64 {
        self.percent = (self.percent + self.config.step).min(self.config.max);
        self.percent
    }

    /// One step out, floored at the minimum.
    pub fn zoom_out(&mut self) -> f64 {
        self.percent = (self.percent - self.config.step).max(self.config.min);
        self.percent
    }

    /// Back to 100%.
    pub fn actual_size(&mut self) -> f64 {
        self.percent = 100.0;
        self.percent
    }

    /// Fit the image into the container, rounded to a whole percent.
    ///
    /// Never zooms past 100%. The result is at least 1% so the scale stays
    /// usable as a divisor even for tiny containers.
    pub fn fit_to_screen(
        &mut self,
        image_width: f64,
        image_height: f64,
        container_width: f64,
        container_height: f64,
    ) -> f64 {
        let optimal = calculate_optimal_zoom(
            image_width,
            image_height,
            container_width,
            container_height,
            self.config.fit_padding,
        );
        self.percent = optimal.round().max(1.0);
        log::debug!("zoom fit: {}%", self.percent);
        self.percent
    }

    /// Set an explicit percentage, clamped to the configured range.
    pub fn set_percent(&mut self, percent: f64) -> f64 {
        if percent.is_finite() {
            self.percent = percent.clamp(self.config.min, self.config.max);
        }
        self.percent
    }

    /// Convert a pointer offset from the image's on-screen origin into
    /// natural pixel coordinates, rounded to whole pixels.
    pub fn screen_to_image(&self, offset: Point) -> Point {
        let scale = self.scale();
        Point::new((offset.x / scale).round(), (offset.y / scale).round())
    }

    /// On-screen size of an image at the current zoom.
    pub fn displayed_size(&self, image_width: f64, image_height: f64) -> (f64, f64) {
        (image_width * self.scale(), image_height * self.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_actual_size() {
        let zoom = ZoomState::default();
        assert_eq!(zoom.percent(), 100.0);
        assert_eq!(zoom.scale(), 1.0);
    }

    #[test]
    fn test_zoom_in_caps_at_max() {
        let mut zoom = ZoomState::default();
        for _ in 0..100 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), 500.0);
        assert!(!zoom.can_zoom_in());
    }

    #[test]
    fn test_zoom_out_floors_at_min() {
        let mut zoom = ZoomState::default();
        assert_eq!(zoom.zoom_out(), 75.0);
        zoom.zoom_out();
        zoom.zoom_out();
        assert_eq!(zoom.zoom_out(), 25.0);
        assert!(!zoom.can_zoom_out());
    }

    #[test]
    fn test_fit_to_screen() {
        let mut zoom = ZoomState::default();
        assert_eq!(zoom.fit_to_screen(1920.0, 1080.0, 800.0, 600.0), 40.0);
        assert_eq!(zoom.actual_size(), 100.0);
    }

    #[test]
    fn test_fit_never_upscales() {
        let mut zoom = ZoomState::default();
        assert_eq!(zoom.fit_to_screen(100.0, 100.0, 2000.0, 2000.0), 100.0);
    }

    #[test]
    fn test_fit_tiny_container_floor() {
        let mut zoom = ZoomState::default();
        assert_eq!(zoom.fit_to_screen(1920.0, 1080.0, 10.0, 10.0), 1.0);
    }

    #[test]
    fn test_set_percent_clamps() {
        let mut zoom = ZoomState::default();
        assert_eq!(zoom.set_percent(1000.0), 500.0);
        assert_eq!(zoom.set_percent(f64::NAN), 500.0);
        assert_eq!(zoom.set_percent(10.0), 25.0);
    }

    #[test]
    fn test_screen_to_image() {
        let mut zoom = ZoomState::default();
        zoom.set_percent(50.0);
        assert_eq!(zoom.screen_to_image(Point::new(100.0, 33.3)), Point::new(200.0, 67.0));
        assert_eq!(zoom.displayed_size(1920.0, 1080.0), (960.0, 540.0));
    }
}
