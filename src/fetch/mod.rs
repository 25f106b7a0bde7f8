//! Tile retrieval boundary
//!
//! Provides the [`TileFetcher`] trait consumed by the capture orchestrator,
//! the transient/permanent [`FetchError`] classification it reports, the
//! [`StaticMapFetcher`] reference implementation over a pluggable
//! [`HttpClient`], and the [`FetchLimiter`] bounding concurrent requests.

mod error;
mod fetcher;
mod http;
mod limiter;
mod static_map;

pub use error::FetchError;
pub use fetcher::TileFetcher;
pub use http::{is_retryable_status, HttpClient, ReqwestClient};
pub use limiter::{FetchLimiter, FetchPermit};
pub use static_map::{StaticMapConfig, StaticMapFetcher};

#[cfg(test)]
pub use http::tests::MockHttpClient;
