//! Capture area definitions.

use crate::geo::{BoundingBox, GeoError};
use std::fmt;

/// A named geographic area to capture.
///
/// Mirrors the persisted area definition supplied by the trigger boundary:
/// a name, an enabled flag, and two corner coordinate pairs. Corners are
/// kept as raw decimals and validated when a run starts, so a stale record
/// with bad coordinates fails the run instead of the area load.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    name: String,
    enabled: bool,
    start: (f64, f64),
    end: (f64, f64),
}

impl Area {
    /// Creates an enabled area from two (latitude, longitude) corners.
    pub fn new(name: impl Into<String>, start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            start,
            end,
        }
    }

    /// Set whether this area participates in scheduled captures.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Area name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this area participates in scheduled captures.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Validates the corners into a bounding box.
    pub fn bounding_box(&self) -> Result<BoundingBox, GeoError> {
        BoundingBox::new(self.start, self.end)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
