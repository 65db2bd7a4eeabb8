//! Integer pixel regions.

use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::geometry::Rect;

/// A crop region in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Round a natural-coordinate rect to whole pixels.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidRegion` if the rounded size is not
    /// positive or the position is negative or not finite.
    pub fn from_rect(rect: Rect) -> Result<Self, ExportError> {
        let left = rect.x.round();
        let top = rect.y.round();
        let width = rect.width.round();
        let height = rect.height.round();

        let valid = [left, top, width, height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0 && *v <= u32::MAX as f64)
            && width >= 1.0
            && height >= 1.0;
        if !valid {
            return Err(ExportError::InvalidRegion(rect));
        }

        Ok(Self {
            left: left as u32,
            top: top as u32,
            width: width as u32,
            height: height as u32,
        })
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.left as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.top as u64 + self.height as u64
    }

    /// Whether the region lies entirely inside a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_nearest_pixel() {
        let region = PixelRegion::from_rect(Rect::new(10.4, 10.6, 266.666, 150.0)).unwrap();
        assert_eq!(
            region,
            PixelRegion {
                left: 10,
                top: 11,
                width: 267,
                height: 150
            }
        );
    }

    #[test]
    fn test_rejects_empty_region() {
        assert!(matches!(
            PixelRegion::from_rect(Rect::new(0.0, 0.0, 0.4, 100.0)),
            Err(ExportError::InvalidRegion(_))
        ));
        assert!(PixelRegion::from_rect(Rect::new(0.0, 0.0, -5.0, 100.0)).is_err());
    }

    #[test]
    fn test_rejects_negative_or_nan_position() {
        assert!(PixelRegion::from_rect(Rect::new(-3.0, 0.0, 10.0, 10.0)).is_err());
        assert!(PixelRegion::from_rect(Rect::new(f64::NAN, 0.0, 10.0, 10.0)).is_err());
    }

    #[test]
    fn test_fits_within() {
        let region = PixelRegion::from_rect(Rect::new(1620.0, 911.0, 300.0, 169.0)).unwrap();
        assert!(region.fits_within(1920, 1080));
        assert!(!region.fits_within(1919, 1080));
    }
}
