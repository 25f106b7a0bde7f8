//! Capture run configuration.

use crate::geo::GeoSpan;
use std::time::Duration;

/// Configuration for capture runs.
///
/// A capture run is a pure function of the bounding box plus this
/// configuration; no process-wide mutable state is involved.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Geographic span covered by one tile
    pub tile_span: GeoSpan,

    /// Expected tile width in pixels
    pub tile_width: u32,

    /// Expected tile height in pixels
    pub tile_height: u32,

    /// Per-request timeout for tile fetches
    pub request_timeout: Duration,

    /// Maximum fetch attempts per point (transient errors only)
    pub max_retries: u32,

    /// Maximum concurrent tile fetches
    pub max_concurrent_fetches: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tile_span: GeoSpan::new(0.01, 0.01).expect("default tile span is valid"),
            tile_width: 650,
            tile_height: 450,
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            max_concurrent_fetches: 16,
        }
    }
}

impl CaptureConfig {
    /// Set the geographic span covered by one tile.
    pub fn with_tile_span(mut self, span: GeoSpan) -> Self {
        self.tile_span = span;
        self
    }

    /// Set the expected tile pixel dimensions.
    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the maximum fetch attempts per point.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the maximum concurrent tile fetches.
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.tile_width, 650);
        assert_eq!(config.tile_height, 450);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_concurrent_fetches, 16);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_methods() {
        let config = CaptureConfig::default()
            .with_tile_span(GeoSpan::new(0.02, 0.03).unwrap())
            .with_tile_size(100, 100)
            .with_request_timeout(Duration::from_secs(1))
            .with_max_retries(5)
            .with_max_concurrent_fetches(4);

        assert_eq!(config.tile_span.lat_micro(), 20_000);
        assert_eq!(config.tile_span.lng_micro(), 30_000);
        assert_eq!(config.tile_width, 100);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_concurrent_fetches, 4);
    }
}
