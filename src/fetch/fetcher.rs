//! Tile fetcher trait.

use super::error::FetchError;
use crate::geo::GeoPoint;
use std::future::Future;

/// Trait for retrieving one tile image per sample point.
///
/// Implementors perform a single independent request against the map-tile
/// provider; there is no ordering dependency between calls and no side
/// effect beyond the outbound request. The capture orchestrator owns the
/// retry/abort policy, so implementations only classify failures as
/// transient or permanent via [`FetchError`].
pub trait TileFetcher: Send + Sync + 'static {
    /// Retrieves the raw image bytes centered on a sample point.
    ///
    /// # Arguments
    ///
    /// * `point` - Geographic center of the requested tile
    ///
    /// # Returns
    ///
    /// Encoded image bytes (provider format, typically PNG) on success.
    fn fetch(&self, point: GeoPoint) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;

    /// Returns the fetcher name for logging.
    fn name(&self) -> &str;
}
