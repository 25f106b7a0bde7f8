//! Capture run orchestration.
//!
//! Coordinates one end-to-end run: plan the sample grid, fetch every tile
//! concurrently with bounded retries, then assemble the composite. The
//! orchestrator is the only component that decides retry versus abort; the
//! run either produces a complete composite or a typed failure.

use super::area::Area;
use super::config::CaptureConfig;
use super::error::CaptureError;
use super::run::{FetchStats, RunId, RunState};
use super::sink::{Shot, ShotSink};
use crate::compose::{compose, encode_png, ComposeError, TileImage};
use crate::fetch::{FetchError, FetchLimiter, TileFetcher};
use crate::geo::GeoPoint;
use crate::grid::{plan_grid, GridIndex};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Base delay for exponential retry backoff.
const RETRY_BACKOFF_BASE_MS: u64 = 100;

/// Runs capture pipelines against one tile fetcher.
///
/// Runs share nothing mutable beyond the fetch concurrency limiter;
/// multiple captures may proceed fully in parallel.
pub struct CaptureOrchestrator<F: TileFetcher> {
    fetcher: Arc<F>,
    limiter: Arc<FetchLimiter>,
    config: CaptureConfig,
}

impl<F: TileFetcher> CaptureOrchestrator<F> {
    /// Creates an orchestrator with the given fetcher and configuration.
    pub fn new(fetcher: F, config: CaptureConfig) -> Self {
        let limiter = Arc::new(FetchLimiter::new(config.max_concurrent_fetches));
        Self {
            fetcher: Arc::new(fetcher),
            limiter,
            config,
        }
    }

    /// The fetch concurrency limiter, for metrics.
    pub fn limiter(&self) -> &FetchLimiter {
        &self.limiter
    }

    /// Captures one area: plan, fetch all tiles, compose.
    ///
    /// State machine: `Planning → Fetching → Composing → Done`, with
    /// `Failed` reachable from `Fetching` (permanent fetch error or
    /// exhausted retries, cancelling outstanding sibling fetches) and
    /// from `Composing`. Terminal states are final.
    pub async fn capture(&self, area: &Area) -> Result<Shot, CaptureError> {
        let run_id = RunId::new();
        let state = RunState::Planning;
        info!(
            run_id = %run_id,
            area = %area.name(),
            state = %state,
            fetcher = self.fetcher.name(),
            "capture run started"
        );

        let bbox = match area.bounding_box() {
            Ok(bbox) => bbox,
            Err(e) => {
                warn!(
                    run_id = %run_id,
                    area = %area.name(),
                    state = %RunState::Failed,
                    error = %e,
                    "capture run failed during planning"
                );
                return Err(CaptureError::InvalidBoundingBox(e));
            }
        };

        let grid = plan_grid(&bbox, self.config.tile_span);
        let state = RunState::Fetching;
        info!(
            run_id = %run_id,
            state = %state,
            rows = grid.rows(),
            cols = grid.cols(),
            points = grid.len(),
            "grid planned"
        );

        let token = CancellationToken::new();
        let stats = Arc::new(FetchStats::new());
        let mut tasks = JoinSet::new();

        for (seq, (index, point)) in grid.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = Arc::clone(&self.limiter);
            let stats = Arc::clone(&stats);
            let token = token.clone();
            let timeout = self.config.request_timeout;
            let max_retries = self.config.max_retries;

            tasks.spawn(async move {
                fetch_point(
                    seq,
                    index,
                    point,
                    fetcher,
                    limiter,
                    timeout,
                    max_retries,
                    stats,
                    token,
                )
                .await
            });
        }

        // Barrier: every task joins (success, failure, or cancelled)
        // before composition. Results land in their grid slot, restoring
        // canonical row-major order regardless of completion order.
        let mut slots: Vec<Option<TileImage>> = (0..grid.len()).map(|_| None).collect();
        let mut failure: Option<PointFailure> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((seq, tile))) => {
                    slots[seq] = Some(tile);
                }
                Ok(Err(fail)) => {
                    if fail.cancelled {
                        continue;
                    }
                    warn!(
                        run_id = %run_id,
                        index = %fail.index,
                        point = %fail.point,
                        attempts = fail.attempts,
                        error = %fail.error,
                        "point fetch failed"
                    );
                    if failure.is_none() {
                        // First real failure aborts the run; cancel
                        // outstanding siblings to avoid wasted calls
                        token.cancel();
                        failure = Some(fail);
                    }
                }
                Err(join_err) => {
                    if !join_err.is_cancelled() {
                        warn!(run_id = %run_id, error = %join_err, "fetch task panicked");
                    }
                }
            }
        }

        if let Some(fail) = failure {
            warn!(
                run_id = %run_id,
                state = %RunState::Failed,
                succeeded = stats.succeeded(),
                failed = stats.failed(),
                cancelled = stats.cancelled(),
                "capture run failed during fetch"
            );
            return Err(CaptureError::Fetch {
                point: fail.point,
                attempts: fail.attempts,
                source: fail.error,
            });
        }

        let state = RunState::Composing;
        debug!(
            run_id = %run_id,
            state = %state,
            attempts = stats.attempts(),
            retried = stats.retried(),
            "all tiles fetched"
        );

        let tiles: Vec<TileImage> = slots.into_iter().flatten().collect();
        let (rows, cols) = (grid.rows(), grid.cols());
        let (tile_width, tile_height) = (self.config.tile_width, self.config.tile_height);

        // Pixel blitting and PNG encoding are CPU-bound
        let composed = tokio::task::spawn_blocking(move || -> Result<_, ComposeError> {
            let composite = compose(&tiles, rows, cols, tile_width, tile_height)?;
            let png = encode_png(&composite)?;
            Ok((png, composite.width(), composite.height()))
        })
        .await
        .map_err(|e| CaptureError::Internal(format!("compose task panicked: {}", e)))?;

        let (png, width, height) = match composed {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    run_id = %run_id,
                    state = %RunState::Failed,
                    error = %e,
                    "capture run failed during composition"
                );
                return Err(CaptureError::Compose(e));
            }
        };

        info!(
            run_id = %run_id,
            state = %RunState::Done,
            width,
            height,
            bytes = png.len(),
            "capture run complete"
        );

        Ok(Shot {
            area: area.name().to_string(),
            captured_at: SystemTime::now(),
            width,
            height,
            png,
        })
    }

    /// Captures every enabled area and hands finished shots to the sink.
    ///
    /// Disabled areas are skipped. A failed run is reported in the result
    /// list and does not stop later areas; previously stored shots are
    /// untouched.
    pub async fn capture_enabled<S: ShotSink>(
        &self,
        areas: &[Area],
        sink: &S,
    ) -> Vec<(String, Result<(), CaptureError>)> {
        let mut results = Vec::with_capacity(areas.len());

        for area in areas {
            if !area.enabled() {
                debug!(area = %area.name(), "area disabled, skipping");
                continue;
            }

            let outcome = match self.capture(area).await {
                Ok(shot) => sink
                    .store(shot)
                    .await
                    .map_err(|e| CaptureError::Store(e.to_string())),
                Err(e) => Err(e),
            };
            results.push((area.name().to_string(), outcome));
        }

        results
    }
}

/// A point fetch that did not produce a tile.
struct PointFailure {
    index: GridIndex,
    point: GeoPoint,
    attempts: u32,
    error: FetchError,
    /// True when the task was abandoned because the run was cancelled;
    /// cancellations are counted but never reported as the run failure.
    cancelled: bool,
}

impl PointFailure {
    fn cancelled(index: GridIndex, point: GeoPoint, attempts: u32) -> Self {
        Self {
            index,
            point,
            attempts,
            error: FetchError::transient("run cancelled"),
            cancelled: true,
        }
    }
}

/// Fetches one tile with bounded retries, backoff, and cancellation.
///
/// Transient errors retry up to `max_retries` total attempts with
/// exponential backoff; permanent errors abort immediately. The
/// cancellation token is honored while waiting for a permit, during the
/// request, and during backoff.
#[allow(clippy::too_many_arguments)]
async fn fetch_point<F: TileFetcher>(
    seq: usize,
    index: GridIndex,
    point: GeoPoint,
    fetcher: Arc<F>,
    limiter: Arc<FetchLimiter>,
    timeout: Duration,
    max_retries: u32,
    stats: Arc<FetchStats>,
    token: CancellationToken,
) -> Result<(usize, TileImage), PointFailure> {
    let _permit = tokio::select! {
        biased;
        _ = token.cancelled() => {
            stats.record_cancelled();
            return Err(PointFailure::cancelled(index, point, 0));
        }
        permit = limiter.acquire() => permit,
    };

    let mut last_error = FetchError::transient("no attempts made");
    let mut attempts = 0;

    for attempt in 1..=max_retries {
        attempts = attempt;
        stats.record_attempt();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                stats.record_cancelled();
                return Err(PointFailure::cancelled(index, point, attempt - 1));
            }
            result = tokio::time::timeout(timeout, fetcher.fetch(point)) => result,
        };

        match result {
            Ok(Ok(data)) => {
                stats.record_success();
                return Ok((
                    seq,
                    TileImage {
                        index,
                        point,
                        data,
                    },
                ));
            }
            Ok(Err(e)) => {
                last_error = e;
                if !last_error.is_retryable() {
                    break;
                }
                if attempt < max_retries {
                    stats.record_retry();
                }
            }
            Err(_) => {
                last_error = FetchError::transient("request timed out");
                if attempt < max_retries {
                    stats.record_retry();
                }
            }
        }

        if attempt < max_retries {
            let backoff = Duration::from_millis(RETRY_BACKOFF_BASE_MS * (1 << attempt));
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    stats.record_cancelled();
                    return Err(PointFailure::cancelled(index, point, attempt));
                }
                _ = tokio::time::sleep(backoff) => {}
            }
        }
    }

    stats.record_failure();
    Err(PointFailure {
        index,
        point,
        attempts,
        error: last_error,
        cancelled: false,
    })
}
