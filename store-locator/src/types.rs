//! Core types for the store locator library
//!
//! This module defines the coordinate types shared by the mapper, the zone
//! registry and the live position tracker, together with the library's error
//! type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, LocatorError>;

/// A point in sensor space, as reported by the positioning service
///
/// Units are meters from the positioning system's reference anchor. Values are
/// never validated against the sensing field: a position outside the field maps
/// to a display point outside `[0%, 100%]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset (meters)
    pub x: f64,
    /// Vertical offset (meters)
    pub y: f64,
}

impl Position {
    /// Create a new sensor-space position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// A point in display space, as percentages of the floor-plan's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    /// Distance from the top edge (percent)
    pub top: f64,
    /// Distance from the left edge (percent)
    pub left: f64,
}

impl DisplayPoint {
    /// Create a new display point from percentage values
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// CSS-style percentage string for the `top` offset (e.g. `"12%"`)
    pub fn top_css(&self) -> String {
        format!("{}%", self.top)
    }

    /// CSS-style percentage string for the `left` offset (e.g. `"37.3%"`)
    pub fn left_css(&self) -> String {
        format!("{}%", self.left)
    }

    /// True if both offsets lie within `[0, 100]`
    pub fn is_within_bounds(&self) -> bool {
        (0.0..=100.0).contains(&self.top) && (0.0..=100.0).contains(&self.left)
    }

    /// Clamp both offsets into `[0, 100]`
    pub fn clamped(&self) -> Self {
        Self {
            top: self.top.clamp(0.0, 100.0),
            left: self.left.clamp(0.0, 100.0),
        }
    }
}

impl fmt::Display for DisplayPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "top: {}, left: {}", self.top_css(), self.left_css())
    }
}

/// Errors that can occur in the store locator
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("Invalid sensor field: width={width}, height={height} (both must be finite and positive)")]
    InvalidSensorField { width: f64, height: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate zone id: {0}")]
    DuplicateZone(String),

    #[error("Invalid percentage value: {0:?}")]
    InvalidPercentage(String),

    #[error("Position request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Position endpoint returned status {0}")]
    Status(u16),

    #[error("Malformed position payload: {0}")]
    MalformedPosition(String),

    #[error("No async runtime available: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_point_css() {
        let point = DisplayPoint::new(12.0, 37.3);
        assert_eq!(point.top_css(), "12%");
        assert_eq!(point.left_css(), "37.3%");
        assert_eq!(format!("{}", point), "top: 12%, left: 37.3%");
    }

    #[test]
    fn test_bounds_and_clamp() {
        assert!(DisplayPoint::new(0.0, 100.0).is_within_bounds());

        let outside = DisplayPoint::new(-5.0, 130.0);
        assert!(!outside.is_within_bounds());
        assert_eq!(outside.clamped(), DisplayPoint::new(0.0, 100.0));
    }

    #[test]
    fn test_position_deserialization() {
        let position: Position = serde_json::from_str(r#"{"x": 1.5, "y": 2}"#).unwrap();
        assert_eq!(position, Position::new(1.5, 2.0));
    }
}
