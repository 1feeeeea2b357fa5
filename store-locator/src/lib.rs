//! Store Locator Library
//!
//! The positioning core of a retail-navigation client: it turns indoor
//! positions reported by a sensing service into markers on a store floor-plan.
//!
//! # Architecture
//!
//! - [`mapper`]: pure sensor-space → display-space conversion
//! - [`zones`]: immutable registry of named store zones
//! - [`tracker`]: cancellable polling loop that keeps a live marker current
//! - [`source`]: where positions come from (HTTP endpoint or anything else)
//! - [`catalog`]: product search and product location lookup
//!
//! The library does NOT:
//! - Render anything
//! - Install a logger
//! - Read configuration files
//!
//! All of that lives in the application layer (store-locator-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use store_locator::{
//!     lookup_zone, start_tracking, HttpPositionSource, SensorField, TrackerConfig, ZoneRegistry,
//! };
//!
//! # async fn run() -> store_locator::Result<()> {
//! let zones = ZoneRegistry::store_layout();
//! if let Some(entrance) = lookup_zone("IN", &zones) {
//!     println!("Entrance at {}", entrance);
//! }
//!
//! let config = TrackerConfig::new().with_position_url("http://localhost:8000/position");
//! let field = SensorField::new(10.0, 8.0)?;
//! let source = HttpPositionSource::new(&config)?;
//!
//! let handle = start_tracking(source, field, &config, |point| {
//!     println!("You are here: {}", point);
//! })?;
//!
//! // later, when the map view is torn down
//! handle.stop();
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod catalog;
pub mod config;
pub mod mapper;
pub mod source;
pub mod tracker;
pub mod types;
pub mod zones;

// Re-export main types for convenience
pub use catalog::{Catalog, Product};
pub use config::{OutOfRangePolicy, TrackerConfig};
pub use mapper::{to_display_coords, SensorField};
pub use source::{HttpPositionSource, PositionSource};
pub use tracker::{start_tracking, stop_tracking, TrackerPhase, TrackerState, TrackingHandle};
pub use types::{DisplayPoint, LocatorError, Position, Result, Timestamp};
pub use zones::{lookup_zone, ZoneRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: the built-in layout maps the entrance
        let zones = ZoneRegistry::store_layout();
        assert!(lookup_zone("IN", &zones).is_some());
        assert!(!VERSION.is_empty());
    }
}
