//! Static-map tile fetcher.
//!
//! Reference `TileFetcher` implementation against a static-map HTTP
//! endpoint: one GET per sample point, requesting a fixed-size raster
//! centered on the point with the traffic layer enabled.

use super::error::FetchError;
use super::fetcher::TileFetcher;
use super::http::HttpClient;
use crate::geo::GeoPoint;

/// Configuration for the static-map endpoint.
#[derive(Debug, Clone)]
pub struct StaticMapConfig {
    /// Endpoint base URL
    pub base_url: String,
    /// Map zoom level
    pub zoom: u8,
    /// Requested tile width in pixels
    pub width: u32,
    /// Requested tile height in pixels
    pub height: u32,
    /// Rendered layers, comma separated (`map,trf` = base map + traffic)
    pub layers: String,
}

impl Default for StaticMapConfig {
    fn default() -> Self {
        Self {
            base_url: "https://static-maps.yandex.ru/1.x/".to_string(),
            zoom: 14,
            width: 650,
            height: 450,
            layers: "map,trf".to_string(),
        }
    }
}

impl StaticMapConfig {
    /// Set the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the zoom level.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the requested tile pixel dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the rendered layers.
    pub fn with_layers(mut self, layers: impl Into<String>) -> Self {
        self.layers = layers.into();
        self
    }
}

/// Fetches tiles from a static-map endpoint over HTTP.
///
/// Generic over [`HttpClient`] so tests can substitute a mock transport.
pub struct StaticMapFetcher<C: HttpClient> {
    client: C,
    config: StaticMapConfig,
}

impl<C: HttpClient> StaticMapFetcher<C> {
    /// Creates a fetcher with the given transport and endpoint settings.
    pub fn new(client: C, config: StaticMapConfig) -> Self {
        Self { client, config }
    }

    /// Builds the request URL for one sample point.
    ///
    /// The endpoint expects the center as `ll=<lng>,<lat>` with longitude
    /// first; coordinates are rendered at the fixed 6-decimal precision.
    pub fn tile_url(&self, point: GeoPoint) -> String {
        format!(
            "{}?ll={:.6},{:.6}&size={},{}&z={}&l={}",
            self.config.base_url,
            point.lng(),
            point.lat(),
            self.config.width,
            self.config.height,
            self.config.zoom,
            self.config.layers,
        )
    }
}

impl<C: HttpClient + 'static> TileFetcher for StaticMapFetcher<C> {
    async fn fetch(&self, point: GeoPoint) -> Result<Vec<u8>, FetchError> {
        let url = self.tile_url(point);
        let data = self.client.get(&url).await?;

        if data.is_empty() {
            // An empty body decodes to nothing downstream; surface it here
            return Err(FetchError::permanent(format!(
                "empty response for point {}",
                point
            )));
        }

        Ok(data)
    }

    fn name(&self) -> &str {
        "static-map"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::http::tests::MockHttpClient;

    fn fetcher(response: Result<Vec<u8>, FetchError>) -> StaticMapFetcher<MockHttpClient> {
        StaticMapFetcher::new(MockHttpClient { response }, StaticMapConfig::default())
    }

    #[test]
    fn test_tile_url_format() {
        let fetcher = fetcher(Ok(vec![]));
        let point = GeoPoint::new(55.02, 37.03).unwrap();

        assert_eq!(
            fetcher.tile_url(point),
            "https://static-maps.yandex.ru/1.x/?ll=37.030000,55.020000&size=650,450&z=14&l=map,trf"
        );
    }

    #[test]
    fn test_tile_url_respects_config() {
        let config = StaticMapConfig::default()
            .with_base_url("http://localhost:8080/map")
            .with_zoom(12)
            .with_size(100, 100)
            .with_layers("map");
        let fetcher = StaticMapFetcher::new(
            MockHttpClient {
                response: Ok(vec![]),
            },
            config,
        );
        let point = GeoPoint::new(-1.5, -63.25).unwrap();

        assert_eq!(
            fetcher.tile_url(point),
            "http://localhost:8080/map?ll=-63.250000,-1.500000&size=100,100&z=12&l=map"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let fetcher = fetcher(Ok(vec![0x89, 0x50, 0x4e, 0x47]));
        let point = GeoPoint::new(55.0, 37.0).unwrap();

        let data = fetcher.fetch(point).await.unwrap();
        assert_eq!(data, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_body() {
        let fetcher = fetcher(Ok(vec![]));
        let point = GeoPoint::new(55.0, 37.0).unwrap();

        let err = fetcher.fetch(point).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_propagates_classification() {
        let fetcher = fetcher(Err(FetchError::transient("HTTP 503")));
        let point = GeoPoint::new(55.0, 37.0).unwrap();

        let err = fetcher.fetch(point).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_name() {
        assert_eq!(fetcher(Ok(vec![])).name(), "static-map");
    }
}
