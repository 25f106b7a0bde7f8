//! mapshot - Periodic traffic-overlay map capture
//!
//! This library captures rendered map images (with a live traffic overlay)
//! for configured geographic areas. Each capture run expands an area's
//! bounding box into a grid of sample points, fetches one map tile per
//! point from a static-map HTTP provider, and stitches the tiles into a
//! single composite image.
//!
//! # High-Level API
//!
//! ```ignore
//! use mapshot::capture::{Area, CaptureConfig, CaptureOrchestrator};
//! use mapshot::fetch::{ReqwestClient, StaticMapConfig, StaticMapFetcher};
//!
//! let fetcher = StaticMapFetcher::new(ReqwestClient::new()?, StaticMapConfig::default());
//! let orchestrator = CaptureOrchestrator::new(fetcher, CaptureConfig::default());
//!
//! let area = Area::new("downtown", (55.70, 37.50), (55.80, 37.70));
//! let shot = orchestrator.capture(&area).await?;
//! ```

pub mod capture;
pub mod compose;
pub mod fetch;
pub mod geo;
pub mod grid;
pub mod logging;

/// Version of the mapshot library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
