//! Rectangle math for crop frames.
//!
//! All functions here are pure and never fail: out-of-range input is clamped
//! into a valid rectangle rather than rejected.
//!
//! # Coordinate System
//!
//! - Natural coordinates are pixels of the original, unscaled image
//! - Screen coordinates are natural coordinates multiplied by the zoom scale
//! - Origin is the top-left corner, y grows downward

use serde::{Deserialize, Serialize};

/// Smallest frame edge, in natural pixels.
pub const MIN_FRAME_SIZE: f64 = 50.0;

/// Default padding subtracted from the container when auto-fitting zoom.
pub const DEFAULT_FIT_PADDING: f64 = 40.0;

/// A point in either screen or natural coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Which dimension stays fixed when enforcing an aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectAnchor {
    /// Keep width, derive height.
    #[default]
    Width,
    /// Keep height, derive width.
    Height,
}

/// Clamp a rectangle into the image bounds.
///
/// The steps run in a fixed order:
/// 1. Floor width and height at [`MIN_FRAME_SIZE`]
/// 2. Clamp `x`/`y` into `[0, image_dim - rect_dim]`
/// 3. Shrink width/height if the rect still overflows the far edge
///
/// When the image is smaller than the minimum frame size in a dimension, the
/// final shrink wins: the result spans the whole image in that dimension and
/// is allowed to fall below the minimum.
pub fn constrain_rect_to_image(rect: Rect, image_width: f64, image_height: f64) -> Rect {
    let width = rect.width.max(MIN_FRAME_SIZE);
    let height = rect.height.max(MIN_FRAME_SIZE);

    let x = rect.x.min(image_width - width).max(0.0);
    let y = rect.y.min(image_height - height).max(0.0);

    Rect {
        x,
        y,
        width: width.min(image_width - x),
        height: height.min(image_height - y),
    }
}

/// Move a rect into the image, scaling it down uniformly only if it is
/// larger than the image.
///
/// Unlike [`constrain_rect_to_image`] the width/height proportion is kept,
/// so a frame keeps its aspect ratio. No minimum size is applied.
pub fn fit_rect_to_image(rect: Rect, image_width: f64, image_height: f64) -> Rect {
    let scale = [image_width / rect.width, image_height / rect.height]
        .into_iter()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .fold(1.0, f64::min);

    let width = (rect.width * scale).min(image_width);
    let height = (rect.height * scale).min(image_height);

    Rect {
        x: rect.x.min(image_width - width).max(0.0),
        y: rect.y.min(image_height - height).max(0.0),
        width,
        height,
    }
}

/// Clamp position first, then shrink size so the rect fits the image.
///
/// Same tail as [`constrain_rect_to_image`] without the minimum-size floor.
/// Used after handle resizes, which apply their own minimum beforehand.
pub fn clamp_rect_to_bounds(rect: Rect, image_width: f64, image_height: f64) -> Rect {
    let x = rect.x.min(image_width - rect.width).max(0.0);
    let y = rect.y.min(image_height - rect.height).max(0.0);

    Rect {
        x,
        y,
        width: rect.width.min(image_width - x),
        height: rect.height.min(image_height - y),
    }
}

/// Derive one dimension from the other using `ratio = width / height`.
pub fn maintain_aspect_ratio(rect: Rect, ratio: f64, anchor: AspectAnchor) -> Rect {
    match anchor {
        AspectAnchor::Width => Rect {
            height: rect.width / ratio,
            ..rect
        },
        AspectAnchor::Height => Rect {
            width: rect.height * ratio,
            ..rect
        },
    }
}

/// Multiply all four fields by `scale` (natural to screen).
pub fn scale_rect(rect: Rect, scale: f64) -> Rect {
    Rect {
        x: rect.x * scale,
        y: rect.y * scale,
        width: rect.width * scale,
        height: rect.height * scale,
    }
}

/// Divide all four fields by `scale` (screen to natural).
pub fn unscale_rect(rect: Rect, scale: f64) -> Rect {
    Rect {
        x: rect.x / scale,
        y: rect.y / scale,
        width: rect.width / scale,
        height: rect.height / scale,
    }
}

/// Inclusive containment test on all four edges.
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

/// Zoom percentage that fits the image inside the container.
///
/// Never exceeds 100%: auto-fit only scales down.
pub fn calculate_optimal_zoom(
    image_width: f64,
    image_height: f64,
    container_width: f64,
    container_height: f64,
    padding: f64,
) -> f64 {
    let scale_x = (container_width - padding) / image_width;
    let scale_y = (container_height - padding) / image_height;

    scale_x.min(scale_y).min(1.0) * 100.0
}

/// Human-readable byte count (`"0 B"`, `"1.5 KB"`, `"10 MB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut exponent = 0;
    while value >= 1024.0 && exponent < UNITS.len() - 1 {
        value /= 1024.0;
        exponent += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;

    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exponent])
    } else {
        format!("{:.1} {}", rounded, UNITS[exponent])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_constrain_inside_is_unchanged() {
        let rect = Rect::new(100.0, 100.0, 300.0, 169.0);
        assert_eq!(constrain_rect_to_image(rect, 1920.0, 1080.0), rect);
    }

    #[test]
    fn test_constrain_applies_minimum_size() {
        let rect = Rect::new(10.0, 10.0, 5.0, 20.0);
        let result = constrain_rect_to_image(rect, 1920.0, 1080.0);
        assert_eq!(result.width, MIN_FRAME_SIZE);
        assert_eq!(result.height, MIN_FRAME_SIZE);
    }

    #[test]
    fn test_constrain_clamps_negative_position() {
        let rect = Rect::new(-40.0, -10.0, 300.0, 200.0);
        let result = constrain_rect_to_image(rect, 1920.0, 1080.0);
        assert_eq!(result.x, 0.0);
        assert_eq!(result.y, 0.0);
        assert_eq!(result.width, 300.0);
    }

    #[test]
    fn test_constrain_pulls_back_from_far_edge() {
        let rect = Rect::new(1800.0, 1000.0, 300.0, 200.0);
        let result = constrain_rect_to_image(rect, 1920.0, 1080.0);
        assert_eq!(result.x, 1620.0);
        assert_eq!(result.y, 880.0);
        assert_eq!(result.width, 300.0);
        assert_eq!(result.height, 200.0);
    }

    #[test]
    fn test_constrain_shrinks_oversized_rect() {
        let rect = Rect::new(0.0, 0.0, 3000.0, 2000.0);
        let result = constrain_rect_to_image(rect, 1920.0, 1080.0);
        assert_eq!(result, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }

    #[test]
    fn test_constrain_tiny_image_keeps_minimum() {
        // The floor is applied first, then the shrink pulls it back to the image.
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let result = constrain_rect_to_image(rect, 30.0, 120.0);
        assert_eq!(result.x, 0.0);
        assert_eq!(result.width, 30.0);
        assert_eq!(result.height, MIN_FRAME_SIZE);
    }

    #[test]
    fn test_fit_moves_before_shrinking() {
        let rect = Rect::new(250.0, 150.0, 200.0, 100.0);
        assert_eq!(
            fit_rect_to_image(rect, 300.0, 200.0),
            Rect::new(100.0, 100.0, 200.0, 100.0)
        );
    }

    #[test]
    fn test_fit_shrinks_keeping_proportion() {
        let rect = Rect::new(50.0, 50.0, 320.0, 180.0);
        let result = fit_rect_to_image(rect, 160.0, 400.0);
        assert_eq!(result.width, 160.0);
        assert_eq!(result.height, 90.0);
        assert_eq!((result.x, result.y), (0.0, 50.0));
    }

    #[test]
    fn test_clamp_rect_to_bounds_has_no_floor() {
        let rect = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(clamp_rect_to_bounds(rect, 100.0, 100.0), rect);
    }

    #[test]
    fn test_maintain_aspect_ratio_width_anchor() {
        let rect = maintain_aspect_ratio(Rect::new(0.0, 0.0, 320.0, 1.0), 16.0 / 9.0, AspectAnchor::Width);
        assert!(approx_eq(rect.height, 180.0));
        assert_eq!(rect.width, 320.0);
    }

    #[test]
    fn test_maintain_aspect_ratio_height_anchor() {
        let rect = maintain_aspect_ratio(Rect::new(0.0, 0.0, 1.0, 90.0), 16.0 / 9.0, AspectAnchor::Height);
        assert!(approx_eq(rect.width, 160.0));
    }

    #[test]
    fn test_scale_and_unscale() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(scale_rect(rect, 2.0), Rect::new(20.0, 40.0, 60.0, 80.0));
        assert_eq!(unscale_rect(rect, 2.0), Rect::new(5.0, 10.0, 15.0, 20.0));
    }

    #[test]
    fn test_point_in_rect_is_inclusive() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(point_in_rect(Point::new(10.0, 10.0), rect));
        assert!(point_in_rect(Point::new(30.0, 30.0), rect));
        assert!(point_in_rect(Point::new(20.0, 15.0), rect));
        assert!(!point_in_rect(Point::new(30.1, 15.0), rect));
        assert!(!point_in_rect(Point::new(15.0, 9.9), rect));
    }

    #[test]
    fn test_optimal_zoom_downscales() {
        let zoom = calculate_optimal_zoom(1920.0, 1080.0, 800.0, 600.0, DEFAULT_FIT_PADDING);
        let expected = (760.0 / 1920.0) * 100.0;
        assert!(approx_eq(zoom, expected), "got {}", zoom);
        assert!((zoom - 39.58).abs() < 0.01);
    }

    #[test]
    fn test_optimal_zoom_never_upscales() {
        let zoom = calculate_optimal_zoom(200.0, 100.0, 1920.0, 1080.0, DEFAULT_FIT_PADDING);
        assert_eq!(zoom, 100.0);
    }

    #[test]
    fn test_rect_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(10 * 1024 * 1024), "10 MB");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for arbitrary rectangles, including off-image and undersized ones.
    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -500.0f64..3000.0,
            -500.0f64..3000.0,
            0.0f64..4000.0,
            0.0f64..4000.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    /// Strategy for image bounds at or above the minimum frame size.
    fn bounds_strategy() -> impl Strategy<Value = (f64, f64)> {
        (50.0f64..4000.0, 50.0f64..4000.0)
    }

    proptest! {
        /// Property: constrained rects lie inside the image and respect the minimum size.
        #[test]
        fn prop_constrained_rect_inside_image(
            rect in rect_strategy(),
            (w, h) in bounds_strategy(),
        ) {
            let result = constrain_rect_to_image(rect, w, h);

            prop_assert!(result.x >= 0.0);
            prop_assert!(result.y >= 0.0);
            prop_assert!(result.right() <= w + 1e-9, "right {} > {}", result.right(), w);
            prop_assert!(result.bottom() <= h + 1e-9, "bottom {} > {}", result.bottom(), h);
            prop_assert!(result.width >= MIN_FRAME_SIZE - 1e-9);
            prop_assert!(result.height >= MIN_FRAME_SIZE - 1e-9);
        }

        /// Property: scaling undoes unscaling.
        #[test]
        fn prop_scale_unscale_round_trip(
            rect in rect_strategy(),
            scale in prop_oneof![0.01f64..10.0, -10.0f64..-0.01],
        ) {
            let result = scale_rect(unscale_rect(rect, scale), scale);

            prop_assert!((result.x - rect.x).abs() < 1e-6);
            prop_assert!((result.y - rect.y).abs() < 1e-6);
            prop_assert!((result.width - rect.width).abs() < 1e-6);
            prop_assert!((result.height - rect.height).abs() < 1e-6);
        }

        /// Property: constraining is idempotent.
        #[test]
        fn prop_constrain_idempotent(
            rect in rect_strategy(),
            (w, h) in bounds_strategy(),
        ) {
            let once = constrain_rect_to_image(rect, w, h);
            let twice = constrain_rect_to_image(once, w, h);

            prop_assert!((once.x - twice.x).abs() < 1e-6);
            prop_assert!((once.y - twice.y).abs() < 1e-6);
            prop_assert!((once.width - twice.width).abs() < 1e-6);
            prop_assert!((once.height - twice.height).abs() < 1e-6);
        }

        /// Property: a fitted rect lies inside the image with its proportion intact.
        #[test]
        fn prop_fit_inside_image_keeps_proportion(
            rect in rect_strategy(),
            (w, h) in bounds_strategy(),
        ) {
            prop_assume!(rect.width > 1.0 && rect.height > 1.0);
            let result = fit_rect_to_image(rect, w, h);

            prop_assert!(result.x >= 0.0 && result.y >= 0.0);
            prop_assert!(result.right() <= w + 1e-6);
            prop_assert!(result.bottom() <= h + 1e-6);
            let before = rect.width / rect.height;
            prop_assert!((result.width / result.height - before).abs() < 1e-6 * before.max(1.0));
        }

        /// Property: optimal zoom is capped at 100%.
        #[test]
        fn prop_optimal_zoom_capped(
            (iw, ih) in (1.0f64..8000.0, 1.0f64..8000.0),
            (cw, ch) in (100.0f64..4000.0, 100.0f64..4000.0),
        ) {
            let zoom = calculate_optimal_zoom(iw, ih, cw, ch, DEFAULT_FIT_PADDING);
            prop_assert!(zoom <= 100.0);
            prop_assert!(zoom > 0.0);
        }
    }
}
