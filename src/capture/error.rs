//! Error types for capture runs.

use crate::compose::ComposeError;
use crate::fetch::FetchError;
use crate::geo::{GeoError, GeoPoint};
use thiserror::Error;

/// Errors that abort a capture run.
///
/// A run either yields a complete, geometrically consistent composite or
/// exactly one of these; partial composites are never emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    /// The area's bounding box has malformed coordinates
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(#[from] GeoError),

    /// A point's fetch failed permanently or exhausted its retries
    #[error("fetch failed for point {point} after {attempts} attempt(s): {source}")]
    Fetch {
        point: GeoPoint,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// Composite assembly or encoding failed
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// The persistence collaborator rejected the finished shot
    #[error("shot store failed: {0}")]
    Store(String),

    /// Internal error (e.g. a compose task panicked)
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = CaptureError::Fetch {
            point: GeoPoint::new(55.01, 37.02).unwrap(),
            attempts: 3,
            source: FetchError::transient("HTTP 503"),
        };
        let msg = err.to_string();
        assert!(msg.contains("(55.010000, 37.020000)"));
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("HTTP 503"));
    }

    #[test]
    fn test_geo_error_converts() {
        let err: CaptureError = GeoError::InvalidLatitude(91.0).into();
        assert!(matches!(err, CaptureError::InvalidBoundingBox(_)));
    }

    #[test]
    fn test_compose_error_is_transparent() {
        let err: CaptureError = ComposeError::IncompleteGrid {
            expected: 6,
            actual: 5,
        }
        .into();
        assert_eq!(err.to_string(), "incomplete grid: expected 6 tiles, got 5");
    }
}
