//! Tracker configuration types
//!
//! This module defines the configuration needed by the live position tracker.
//! Loading it from disk is left to the application layer.

use crate::types::{DisplayPoint, LocatorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the live position tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// URL of the position endpoint (`GET`, JSON `{x, y}`)
    #[serde(default)]
    pub position_url: String,

    /// Poll period in milliseconds (default: 1000ms)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Per-request timeout in milliseconds (default: 3000ms)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// What to do with positions that map outside the floor-plan
    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    3000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            position_url: String::new(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_ms: default_request_timeout(),
            out_of_range: OutOfRangePolicy::default(),
        }
    }
}

/// Handling of display points outside `[0%, 100%]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Keep the point as mapped
    #[default]
    Pass,
    /// Clamp both offsets into `[0, 100]`
    Clamp,
    /// Ignore the sample entirely
    Drop,
}

impl OutOfRangePolicy {
    /// Apply the policy; `None` means the sample must be ignored
    pub fn apply(self, point: DisplayPoint) -> Option<DisplayPoint> {
        match self {
            OutOfRangePolicy::Pass => Some(point),
            OutOfRangePolicy::Clamp => Some(point.clamped()),
            OutOfRangePolicy::Drop if point.is_within_bounds() => Some(point),
            OutOfRangePolicy::Drop => None,
        }
    }
}

impl TrackerConfig {
    /// Create a new tracker configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the position endpoint URL
    pub fn with_position_url(mut self, url: impl Into<String>) -> Self {
        self.position_url = url.into();
        self
    }

    /// Builder method: set the poll period
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Builder method: set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Builder method: set the out-of-range policy
    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reject settings the tracker cannot run with
    ///
    /// The URL is only checked by [`crate::HttpPositionSource`], since other
    /// position sources do not need one.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(LocatorError::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(LocatorError::InvalidConfig(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
