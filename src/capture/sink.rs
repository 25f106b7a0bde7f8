//! Persistence hand-off boundary.

use std::future::Future;
use std::time::SystemTime;

/// A finished composite ready for the persistence collaborator.
///
/// Created once per successful capture run and handed off immediately;
/// the core holds no long-lived reference and assigns no storage location.
#[derive(Debug, Clone)]
pub struct Shot {
    /// Name of the owning capture area
    pub area: String,
    /// When the capture run produced the composite
    pub captured_at: SystemTime,
    /// Composite width in pixels
    pub width: u32,
    /// Composite height in pixels
    pub height: u32,
    /// Lossless PNG encoding of the composite
    pub png: Vec<u8>,
}

/// Trait for the persistence collaborator.
///
/// Implementors assign storage locations and serialize concurrent writes;
/// the capture core only delivers finished shots. A failed run never calls
/// this, so a previous successful shot for the same area is never
/// corrupted or partially overwritten.
pub trait ShotSink: Send + Sync {
    /// Stores a finished shot.
    fn store(&self, shot: Shot) -> impl Future<Output = Result<(), std::io::Error>> + Send;
}
