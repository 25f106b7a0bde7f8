//! Geographic type definitions

use std::fmt;
use thiserror::Error;

/// Valid latitude range in degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// Microdegrees per degree (6 fractional digits of precision).
pub const MICRO: i64 = 1_000_000;

/// Errors that can occur constructing geographic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is outside valid range (-90.0 to 90.0) or not finite
    #[error("invalid latitude: {0} (must be finite and between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    /// Longitude is outside valid range (-180.0 to 180.0) or not finite
    #[error("invalid longitude: {0} (must be finite and between {MIN_LNG} and {MAX_LNG})")]
    InvalidLongitude(f64),

    /// Tile span must be strictly positive in both axes
    #[error("invalid tile span: ({0}, {1}) (both axes must be > 0)")]
    InvalidSpan(f64, f64),
}

/// A geographic point with fixed 6-decimal precision.
///
/// Coordinates are stored internally as integer microdegrees so that grid
/// stepping is exact: repeated addition of a span never accumulates floating
/// point drift, and identical inputs always produce bit-identical points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoPoint {
    lat_micro: i64,
    lng_micro: i64,
}

impl GeoPoint {
    /// Creates a point from degrees, rounding to 6 decimal places.
    ///
    /// # Errors
    ///
    /// Returns `GeoError` if either coordinate is non-finite or outside
    /// the valid latitude/longitude range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(MIN_LNG..=MAX_LNG).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }

        Ok(Self {
            lat_micro: (lat * MICRO as f64).round() as i64,
            lng_micro: (lng * MICRO as f64).round() as i64,
        })
    }

    /// Creates a point directly from microdegrees.
    ///
    /// Grid stepping may produce points up to one tile span beyond the
    /// bounding box, so this constructor does not range-check.
    pub(crate) fn from_micro(lat_micro: i64, lng_micro: i64) -> Self {
        Self {
            lat_micro,
            lng_micro,
        }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat_micro as f64 / MICRO as f64
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng_micro as f64 / MICRO as f64
    }

    /// Latitude in microdegrees.
    #[inline]
    pub fn lat_micro(&self) -> i64 {
        self.lat_micro
    }

    /// Longitude in microdegrees.
    #[inline]
    pub fn lng_micro(&self) -> i64 {
        self.lng_micro
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat(), self.lng())
    }
}

/// Geographic width/height covered by one fetched tile.
///
/// Strictly positive in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeoSpan {
    lat_micro: i64,
    lng_micro: i64,
}

impl GeoSpan {
    /// Creates a span from degrees, rounding to 6 decimal places.
    ///
    /// # Errors
    ///
    /// Returns `GeoError::InvalidSpan` unless both axes are finite and
    /// strictly positive.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !lng.is_finite() || lat <= 0.0 || lng <= 0.0 {
            return Err(GeoError::InvalidSpan(lat, lng));
        }

        let lat_micro = (lat * MICRO as f64).round() as i64;
        let lng_micro = (lng * MICRO as f64).round() as i64;
        if lat_micro == 0 || lng_micro == 0 {
            // Finer than the 6-decimal coordinate precision
            return Err(GeoError::InvalidSpan(lat, lng));
        }

        Ok(Self {
            lat_micro,
            lng_micro,
        })
    }

    /// Latitude span in degrees.
    pub fn lat(&self) -> f64 {
        self.lat_micro as f64 / MICRO as f64
    }

    /// Longitude span in degrees.
    pub fn lng(&self) -> f64 {
        self.lng_micro as f64 / MICRO as f64
    }

    /// Latitude span in microdegrees.
    #[inline]
    pub fn lat_micro(&self) -> i64 {
        self.lat_micro
    }

    /// Longitude span in microdegrees.
    #[inline]
    pub fn lng_micro(&self) -> i64 {
        self.lng_micro
    }
}

/// Rectangular geographic area defined by two corner points.
///
/// The corners may arrive in any order; width accessors take absolute
/// values and the grid planner derives the stepping direction per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    start: GeoPoint,
    end: GeoPoint,
}

impl BoundingBox {
    /// Creates a bounding box from two corner coordinate pairs.
    ///
    /// # Arguments
    ///
    /// * `start` - (latitude, longitude) of the start corner in degrees
    /// * `end` - (latitude, longitude) of the end corner in degrees
    ///
    /// # Errors
    ///
    /// Returns `GeoError` if any coordinate is out of range or non-finite.
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Result<Self, GeoError> {
        Ok(Self {
            start: GeoPoint::new(start.0, start.1)?,
            end: GeoPoint::new(end.0, end.1)?,
        })
    }

    /// The start corner.
    #[inline]
    pub fn start(&self) -> GeoPoint {
        self.start
    }

    /// The end corner.
    #[inline]
    pub fn end(&self) -> GeoPoint {
        self.end
    }

    /// Absolute latitude extent in degrees.
    pub fn lat_width(&self) -> f64 {
        self.lat_width_micro() as f64 / MICRO as f64
    }

    /// Absolute longitude extent in degrees.
    pub fn lng_width(&self) -> f64 {
        self.lng_width_micro() as f64 / MICRO as f64
    }

    /// Absolute latitude extent in microdegrees.
    #[inline]
    pub fn lat_width_micro(&self) -> i64 {
        (self.start.lat_micro() - self.end.lat_micro()).abs()
    }

    /// Absolute longitude extent in microdegrees.
    #[inline]
    pub fn lng_width_micro(&self) -> i64 {
        (self.start.lng_micro() - self.end.lng_micro()).abs()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_rounds_to_six_decimals() {
        let point = GeoPoint::new(55.0000004, 37.0000006).unwrap();
        assert_eq!(point.lat_micro(), 55_000_000);
        assert_eq!(point.lng_micro(), 37_000_001);
    }

    #[test]
    fn test_point_rejects_out_of_range_latitude() {
        let result = GeoPoint::new(90.000001, 0.0);
        assert!(matches!(result, Err(GeoError::InvalidLatitude(_))));
    }

    #[test]
    fn test_point_rejects_out_of_range_longitude() {
        let result = GeoPoint::new(0.0, -180.5);
        assert!(matches!(result, Err(GeoError::InvalidLongitude(_))));
    }

    #[test]
    fn test_point_rejects_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_point_display() {
        let point = GeoPoint::new(55.02, 37.03).unwrap();
        assert_eq!(point.to_string(), "(55.020000, 37.030000)");
    }

    #[test]
    fn test_span_rejects_zero_and_negative() {
        assert!(GeoSpan::new(0.0, 0.01).is_err());
        assert!(GeoSpan::new(0.01, -0.01).is_err());
    }

    #[test]
    fn test_span_rejects_sub_precision() {
        // Rounds to 0 microdegrees
        assert!(GeoSpan::new(0.0000001, 0.01).is_err());
    }

    #[test]
    fn test_bounding_box_widths() {
        let bbox = BoundingBox::new((55.0, 37.0), (55.02, 37.03)).unwrap();
        assert_eq!(bbox.lat_width_micro(), 20_000);
        assert_eq!(bbox.lng_width_micro(), 30_000);
        assert!((bbox.lat_width() - 0.02).abs() < 1e-9);
        assert!((bbox.lng_width() - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_widths_are_absolute() {
        // Corners in descending order give the same widths
        let a = BoundingBox::new((55.02, 37.03), (55.0, 37.0)).unwrap();
        let b = BoundingBox::new((55.0, 37.0), (55.02, 37.03)).unwrap();
        assert_eq!(a.lat_width_micro(), b.lat_width_micro());
        assert_eq!(a.lng_width_micro(), b.lng_width_micro());
    }

    #[test]
    fn test_bounding_box_rejects_bad_corner() {
        let result = BoundingBox::new((91.0, 0.0), (55.0, 37.0));
        assert!(matches!(result, Err(GeoError::InvalidLatitude(_))));
    }

    #[test]
    fn test_error_display() {
        let err = GeoError::InvalidLatitude(91.0);
        assert!(err.to_string().contains("91"));
        assert!(err.to_string().contains("latitude"));
    }
}
