//! Geographic primitives
//!
//! Provides the fixed-precision coordinate types used throughout the capture
//! pipeline: points, tile spans, and bounding boxes. All values carry 6
//! fractional digits of precision and are stored as integer microdegrees so
//! grid arithmetic is exact and reproducible.

mod types;

pub use types::{BoundingBox, GeoError, GeoPoint, GeoSpan, MAX_LAT, MAX_LNG, MICRO, MIN_LAT, MIN_LNG};
