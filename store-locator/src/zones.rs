//! Named store zones and their fixed floor-plan positions
//!
//! A [`ZoneRegistry`] is built once (from the built-in store layout or from
//! configuration) and never mutated afterwards. Looking up an unknown zone is
//! not an error: it simply yields no marker.

use crate::types::{DisplayPoint, LocatorError, Result};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};

/// Built-in floor-plan layout: `(zone id, top %, left %)`
const STORE_LAYOUT: &[(&str, f64, f64)] = &[
    ("IN", 12.0, 37.3),
    ("A1", 12.0, 18.5),
    ("A2", 23.0, 10.0),
    ("A3", 39.0, 10.0),
    ("A4", 55.0, 10.0),
    ("A5", 70.0, 10.0),
    ("A6", 85.0, 10.0),
    ("A7", 88.0, 20.0),
    ("B1", 26.5, 25.5),
    ("B2", 26.5, 46.0),
    ("B3", 38.0, 25.5),
    ("B4", 38.0, 46.0),
    ("B5", 49.0, 25.5),
    ("B6", 49.0, 46.0),
    ("B7", 60.5, 25.5),
    ("B8", 65.0, 55.5),
    ("B9", 65.0, 41.6),
    ("B10", 73.0, 25.5),
    ("C1", 88.0, 36.5),
    ("C2", 84.5, 51.0),
    ("D1", 12.0, 52.5),
    ("D2", 12.0, 65.0),
    ("D3", 12.0, 76.7),
    ("D4", 12.0, 87.5),
    ("E1", 22.0, 70.0),
    ("E2", 28.5, 70.0),
    ("E3", 35.0, 70.0),
    ("E4", 41.5, 70.0),
    ("E5", 49.0, 70.0),
    ("E6", 55.5, 70.0),
    ("F1", 76.8, 65.8),
    ("F2", 70.0, 80.0),
    ("F3", 62.5, 90.0),
    ("F4", 49.0, 90.0),
    ("F5", 35.5, 90.0),
    ("F6", 23.0, 90.0),
];

/// Immutable mapping from zone id to display point
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    points: HashMap<String, DisplayPoint>,
    /// Zone ids in registration order, for listing
    order: Vec<String>,
}

impl ZoneRegistry {
    /// Build a registry from `(id, point)` entries
    ///
    /// Fails with [`LocatorError::DuplicateZone`] if an id appears twice.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, DisplayPoint)>,
        S: Into<String>,
    {
        let mut points = HashMap::new();
        let mut order = Vec::new();

        for (id, point) in entries {
            let id = id.into();
            if points.contains_key(&id) {
                return Err(LocatorError::DuplicateZone(id));
            }
            points.insert(id.clone(), point);
            order.push(id);
        }

        Ok(Self { points, order })
    }

    /// The store's built-in floor-plan layout
    pub fn store_layout() -> Self {
        let mut points = HashMap::with_capacity(STORE_LAYOUT.len());
        let mut order = Vec::with_capacity(STORE_LAYOUT.len());
        for &(id, top, left) in STORE_LAYOUT {
            points.insert(id.to_string(), DisplayPoint::new(top, left));
            order.push(id.to_string());
        }
        Self { points, order }
    }

    /// Look up a zone's display point
    pub fn get(&self, zone_id: &str) -> Option<DisplayPoint> {
        self.points.get(zone_id).copied()
    }

    /// Iterate over all zones in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, DisplayPoint)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.points.get(id).map(|point| (id.as_str(), *point)))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Look up a zone in a registry; unknown ids yield `None`
pub fn lookup_zone(zone_id: &str, registry: &ZoneRegistry) -> Option<DisplayPoint> {
    registry.get(zone_id)
}

/// A percentage value as written in configuration: `12.5` or `"12.5%"`
#[derive(Deserialize)]
#[serde(untagged)]
enum PercentValue {
    Number(f64),
    Text(String),
}

impl PercentValue {
    fn into_f64(self) -> Result<f64> {
        match self {
            PercentValue::Number(v) => Ok(v),
            PercentValue::Text(text) => parse_percentage(&text),
        }
    }
}

/// Parse a CSS-style percentage string such as `"37.3%"`
///
/// The trailing `%` is optional; surrounding whitespace is ignored.
pub fn parse_percentage(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LocatorError::InvalidPercentage(text.to_string()))
}

#[derive(Deserialize)]
struct ZoneEntry {
    top: PercentValue,
    left: PercentValue,
}

impl<'de> Deserialize<'de> for ZoneRegistry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, ZoneEntry>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (id, entry) in raw {
            let top = entry.top.into_f64().map_err(serde::de::Error::custom)?;
            let left = entry.left.into_f64().map_err(serde::de::Error::custom)?;
            entries.push((id, DisplayPoint::new(top, left)));
        }
        ZoneRegistry::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_layout_lookup() {
        let registry = ZoneRegistry::store_layout();
        assert_eq!(registry.len(), STORE_LAYOUT.len());

        let entrance = lookup_zone("IN", &registry).unwrap();
        assert_eq!(entrance.top_css(), "12%");
        assert_eq!(entrance.left_css(), "37.3%");

        let b10 = lookup_zone("B10", &registry).unwrap();
        assert_eq!(b10, DisplayPoint::new(73.0, 25.5));
    }

    #[test]
    fn test_unknown_zone_is_absent() {
        let registry = ZoneRegistry::store_layout();
        assert_eq!(lookup_zone("UNKNOWN", &registry), None);
        assert_eq!(lookup_zone("", &registry), None);
        assert_eq!(lookup_zone("UNKNOWN", &ZoneRegistry::default()), None);
    }

    #[test]
    fn test_duplicate_zone_rejected() {
        let result = ZoneRegistry::from_entries(vec![
            ("A1", DisplayPoint::new(1.0, 1.0)),
            ("A1", DisplayPoint::new(2.0, 2.0)),
        ]);
        assert!(matches!(result, Err(LocatorError::DuplicateZone(id)) if id == "A1"));
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let registry = ZoneRegistry::from_entries(vec![
            ("Z9", DisplayPoint::new(1.0, 1.0)),
            ("A1", DisplayPoint::new(2.0, 2.0)),
        ])
        .unwrap();
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["Z9", "A1"]);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("12%").unwrap(), 12.0);
        assert_eq!(parse_percentage(" 37.3 % ").unwrap(), 37.3);
        assert_eq!(parse_percentage("50").unwrap(), 50.0);
        assert!(parse_percentage("abc%").is_err());
        assert!(parse_percentage("").is_err());
    }

    #[test]
    fn test_registry_deserialization() {
        let json = r#"{
            "IN": { "top": "12%", "left": "37.3%" },
            "A1": { "top": 12, "left": 18.5 }
        }"#;
        let registry: ZoneRegistry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.get("IN"), Some(DisplayPoint::new(12.0, 37.3)));
        assert_eq!(registry.get("A1"), Some(DisplayPoint::new(12.0, 18.5)));

        let bad = r#"{ "X": { "top": "twelve", "left": "1%" } }"#;
        assert!(serde_json::from_str::<ZoneRegistry>(bad).is_err());
    }
}
