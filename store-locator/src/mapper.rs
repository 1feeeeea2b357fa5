//! Sensor-space to display-space coordinate mapping
//!
//! The mapping is a plain linear scale: a sensor position at `(x, y)` inside a
//! field of `width × height` meters lands at `left = x / width * 100%` and
//! `top = y / height * 100%` of the floor-plan. Nothing is clamped or rounded.

use crate::types::{DisplayPoint, LocatorError, Position, Result};
use serde::{Deserialize, Serialize};

/// Physical extent covered by the positioning system
///
/// Both dimensions are guaranteed finite and strictly positive, so mapping
/// through a `SensorField` can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSensorField")]
pub struct SensorField {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawSensorField {
    width: f64,
    height: f64,
}

impl TryFrom<RawSensorField> for SensorField {
    type Error = LocatorError;

    fn try_from(raw: RawSensorField) -> Result<Self> {
        SensorField::new(raw.width, raw.height)
    }
}

impl SensorField {
    /// Create a sensor field, rejecting zero, negative or non-finite dimensions
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(LocatorError::InvalidSensorField { width, height });
        }
        Ok(Self { width, height })
    }

    /// Field width (meters)
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Field height (meters)
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Map a sensor position into this field's display space
    pub fn to_display(&self, position: &Position) -> DisplayPoint {
        to_display_coords(position, self)
    }
}

/// Convert a sensor-space position into a display-space point
///
/// # Example
/// ```
/// use store_locator::{to_display_coords, Position, SensorField};
///
/// let field = SensorField::new(10.0, 8.0).unwrap();
/// let point = to_display_coords(&Position::new(5.0, 2.0), &field);
/// assert_eq!(point.left_css(), "50%");
/// assert_eq!(point.top_css(), "25%");
/// ```
pub fn to_display_coords(position: &Position, field: &SensorField) -> DisplayPoint {
    DisplayPoint {
        left: position.x / field.width * 100.0,
        top: position.y / field.height * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        for (w, h) in [(1.0, 1.0), (10.0, 8.0), (0.25, 400.0)] {
            let field = SensorField::new(w, h).unwrap();
            let point = to_display_coords(&Position::new(0.0, 0.0), &field);
            assert_eq!(point.left_css(), "0%");
            assert_eq!(point.top_css(), "0%");
        }
    }

    #[test]
    fn test_far_corner_maps_to_hundred() {
        for (w, h) in [(1.0, 1.0), (10.0, 8.0), (12.5, 3.0)] {
            let field = SensorField::new(w, h).unwrap();
            let point = to_display_coords(&Position::new(w, h), &field);
            assert_eq!(point.left_css(), "100%");
            assert_eq!(point.top_css(), "100%");
        }
    }

    #[test]
    fn test_axes_scale_independently() {
        let field = SensorField::new(10.0, 8.0).unwrap();
        let base = to_display_coords(&Position::new(2.0, 3.0), &field);

        for k in [0.5, 2.0, 3.0] {
            let scaled_x = to_display_coords(&Position::new(2.0 * k, 3.0), &field);
            assert!((scaled_x.left - base.left * k).abs() < 1e-9);
            assert_eq!(scaled_x.top, base.top);

            let scaled_y = to_display_coords(&Position::new(2.0, 3.0 * k), &field);
            assert!((scaled_y.top - base.top * k).abs() < 1e-9);
            assert_eq!(scaled_y.left, base.left);
        }
    }

    #[test]
    fn test_out_of_field_passes_through() {
        let field = SensorField::new(10.0, 10.0).unwrap();
        let point = to_display_coords(&Position::new(-1.0, 15.0), &field);
        assert_eq!(point.left, -10.0);
        assert_eq!(point.top, 150.0);
    }

    #[test]
    fn test_invalid_fields_rejected() {
        assert!(SensorField::new(0.0, 5.0).is_err());
        assert!(SensorField::new(5.0, -1.0).is_err());
        assert!(SensorField::new(f64::NAN, 5.0).is_err());
        assert!(SensorField::new(5.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_field_deserialization_validates() {
        let field: SensorField = serde_json::from_str(r#"{"width": 10, "height": 8}"#).unwrap();
        assert_eq!(field.width(), 10.0);

        let invalid: std::result::Result<SensorField, _> =
            serde_json::from_str(r#"{"width": 0, "height": 8}"#);
        assert!(invalid.is_err());
    }
}
