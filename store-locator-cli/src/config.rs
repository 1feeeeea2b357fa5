//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use store_locator::{Catalog, Product, SensorField, TrackerConfig, ZoneRegistry};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Physical extent of the positioning system; required for tracking
    pub sensor_field: Option<SensorField>,
    /// Custom floor-plan zones; the built-in layout is used when absent
    pub zones: Option<ZoneRegistry>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl AppConfig {
    /// Zone registry to use: configured zones, or the built-in layout
    pub fn zone_registry(&self) -> ZoneRegistry {
        self.zones.clone().unwrap_or_else(ZoneRegistry::store_layout)
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.products.clone())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse and validate configuration text
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;

    config.tracker.validate()?;

    let zones = config.zone_registry();
    for product in &config.products {
        if zones.get(&product.zone).is_none() {
            log::warn!(
                "Product {} ({}) is in unknown zone {}",
                product.id,
                product.name,
                product.zone
            );
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use store_locator::{DisplayPoint, OutOfRangePolicy};

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [tracker]
            position_url = "http://localhost:8000/position"
            out_of_range = "clamp"

            [sensor_field]
            width = 10.0
            height = 8

            [zones]
            IN = { top = "12%", left = "37.3%" }
            A1 = { top = 12, left = 18.5 }

            [[products]]
            id = "1"
            name = "Apple"
            section = "Fruit"
            zone = "A1"
            price = 3000
        "#;

        let config = parse_config(toml_content).unwrap();
        assert_eq!(config.tracker.poll_interval_ms, 1000);
        assert_eq!(config.tracker.out_of_range, OutOfRangePolicy::Clamp);
        assert_eq!(config.sensor_field.unwrap().height(), 8.0);

        let zones = config.zone_registry();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones.get("IN"), Some(DisplayPoint::new(12.0, 37.3)));

        assert_eq!(config.catalog().search("app").len(), 1);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.sensor_field.is_none());
        assert!(config.zone_registry().get("B10").is_some());
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_invalid_sensor_field_rejected() {
        let toml_content = r#"
            [sensor_field]
            width = 0.0
            height = 8.0
        "#;
        assert!(parse_config(toml_content).is_err());
    }

    #[test]
    fn test_invalid_tracker_rejected() {
        let toml_content = r#"
            [tracker]
            poll_interval_ms = 0
        "#;
        assert!(parse_config(toml_content).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sensor_field]\nwidth = 20.0\nheight = 15.0").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.sensor_field.unwrap().width(), 20.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("missing.toml"));
        assert!(result.is_err());
    }
}
