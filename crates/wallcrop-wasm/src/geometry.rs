//! WASM bindings for the geometry helpers.
//!
//! Rects cross the boundary as `[x, y, width, height]` arrays.

use wallcrop_core::geometry::{self, Point, Rect, DEFAULT_FIT_PADDING};
use wasm_bindgen::prelude::*;

/// Zoom percentage that fits an image into a container, never above 100.
///
/// # Example (TypeScript)
///
/// ```typescript
/// calculate_optimal_zoom(1920, 1080, 800, 600); // 39.58...
/// ```
#[wasm_bindgen]
pub fn calculate_optimal_zoom(
    image_width: f64,
    image_height: f64,
    container_width: f64,
    container_height: f64,
) -> f64 {
    geometry::calculate_optimal_zoom(
        image_width,
        image_height,
        container_width,
        container_height,
        DEFAULT_FIT_PADDING,
    )
}

/// Apply the minimum frame size and clamp a rect into the image.
///
/// # Returns
///
/// `[x, y, width, height]` of the constrained rect.
#[wasm_bindgen]
pub fn constrain_rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    image_width: f64,
    image_height: f64,
) -> Vec<f64> {
    let rect = geometry::constrain_rect_to_image(
        Rect::new(x, y, width, height),
        image_width,
        image_height,
    );
    vec![rect.x, rect.y, rect.width, rect.height]
}

/// Inclusive hit test of a point against a rect.
#[wasm_bindgen]
pub fn point_in_rect(px: f64, py: f64, x: f64, y: f64, width: f64, height: f64) -> bool {
    geometry::point_in_rect(Point::new(px, py), Rect::new(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_zoom_uses_default_padding() {
        let zoom = calculate_optimal_zoom(1920.0, 1080.0, 800.0, 600.0);
        assert!((zoom - 760.0 / 1920.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_constrain_rect_layout() {
        assert_eq!(
            constrain_rect(1800.0, -20.0, 300.0, 10.0, 1920.0, 1080.0),
            vec![1620.0, 0.0, 300.0, 50.0]
        );
    }

    #[test]
    fn test_point_in_rect_edges() {
        assert!(point_in_rect(10.0, 10.0, 10.0, 10.0, 5.0, 5.0));
        assert!(point_in_rect(15.0, 15.0, 10.0, 10.0, 5.0, 5.0));
        assert!(!point_in_rect(15.1, 15.0, 10.0, 10.0, 5.0, 5.0));
    }
}
