//! Position sources
//!
//! The tracker only needs "give me the current position"; where it comes from
//! is behind the [`PositionSource`] trait. [`HttpPositionSource`] talks to the
//! positioning service's REST endpoint.

use crate::config::TrackerConfig;
use crate::types::{LocatorError, Position, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::sync::Arc;

/// Something that can report the shopper's current sensor-space position
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Fetch the current position
    async fn fetch(&self) -> Result<Position>;
}

#[async_trait]
impl<T: PositionSource + ?Sized> PositionSource for Arc<T> {
    async fn fetch(&self) -> Result<Position> {
        (**self).fetch().await
    }
}

/// Polls `GET <url>` for a JSON `{ "x": number, "y": number }` body
pub struct HttpPositionSource {
    client: Client,
    url: String,
}

impl HttpPositionSource {
    /// Build a source from the tracker configuration
    ///
    /// The configured request timeout is applied to every fetch.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        if config.position_url.trim().is_empty() {
            return Err(LocatorError::InvalidConfig(
                "position_url must not be empty".to_string(),
            ));
        }

        Url::parse(&config.position_url).map_err(|e| {
            LocatorError::InvalidConfig(format!(
                "position_url '{}' is not a valid URL: {}",
                config.position_url, e
            ))
        })?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(client_error)?;

        Ok(Self {
            client,
            url: config.position_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A client that cannot be built is a setup problem, not a failed fetch
fn client_error(e: reqwest::Error) -> LocatorError {
    LocatorError::InvalidConfig(format!("cannot build HTTP client: {}", e))
}

#[async_trait]
impl PositionSource for HttpPositionSource {
    async fn fetch(&self) -> Result<Position> {
        log::trace!("GET {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LocatorError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_position(&body)
    }
}

/// Decode a position payload
pub fn parse_position(body: &[u8]) -> Result<Position> {
    let position: Position = serde_json::from_slice(body)
        .map_err(|e| LocatorError::MalformedPosition(e.to_string()))?;

    if !position.x.is_finite() || !position.y.is_finite() {
        return Err(LocatorError::MalformedPosition(format!(
            "non-finite coordinates: {}",
            position
        )));
    }

    Ok(position)
}
