//! Capture pipeline: areas, run orchestration, and the persistence boundary.
//!
//! A capture run turns one [`Area`] into one [`Shot`]: the orchestrator
//! plans the sample grid, fetches every tile concurrently, assembles the
//! composite, and hands the finished shot to a [`ShotSink`].

mod area;
mod config;
mod error;
mod orchestrator;
mod run;
mod sink;

pub use area::Area;
pub use config::CaptureConfig;
pub use error::CaptureError;
pub use orchestrator::CaptureOrchestrator;
pub use run::{FetchStats, RunId, RunState};
pub use sink::{Shot, ShotSink};

#[cfg(test)]
pub use sink::tests::{FailingSink, MemorySink};
