//! End-to-end capture pipeline tests against the public API.
//!
//! Uses mock tile fetchers so runs are deterministic and offline: each
//! tile is a solid color derived from its sample point, which makes
//! composite placement checkable pixel by pixel.

use image::{Rgba, RgbaImage};
use mapshot::capture::{Area, CaptureConfig, CaptureError, CaptureOrchestrator, Shot, ShotSink};
use mapshot::fetch::{FetchError, TileFetcher};
use mapshot::geo::{GeoPoint, GeoSpan};
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn solid_png(r: u8, g: u8, width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |_, _| Rgba([r, g, 0, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn point_color(point: GeoPoint) -> (u8, u8) {
    (
        (point.lat_micro() % 251) as u8,
        (point.lng_micro() % 251) as u8,
    )
}

/// Fetcher returning solid 100x100 tiles keyed by sample point.
struct SolidFetcher;

impl TileFetcher for SolidFetcher {
    async fn fetch(&self, point: GeoPoint) -> Result<Vec<u8>, FetchError> {
        let (r, g) = point_color(point);
        Ok(solid_png(r, g, 100, 100))
    }

    fn name(&self) -> &str {
        "solid"
    }
}

fn test_config() -> CaptureConfig {
    CaptureConfig::default()
        .with_tile_span(GeoSpan::new(0.01, 0.01).unwrap())
        .with_tile_size(100, 100)
        .with_request_timeout(Duration::from_secs(2))
        .with_max_retries(2)
        .with_max_concurrent_fetches(8)
}

/// In-memory sink collecting stored shots.
#[derive(Default)]
struct CollectingSink {
    shots: Mutex<Vec<Shot>>,
}

impl ShotSink for CollectingSink {
    async fn store(&self, shot: Shot) -> Result<(), std::io::Error> {
        self.shots.lock().unwrap().push(shot);
        Ok(())
    }
}

#[tokio::test]
async fn test_two_by_three_grid_composes_to_expected_dimensions() {
    let orchestrator = CaptureOrchestrator::new(SolidFetcher, test_config());
    let area = Area::new("center", (55.0, 37.0), (55.02, 37.03));

    let shot = orchestrator.capture(&area).await.unwrap();

    // 2 rows x 3 cols of 100x100 tiles
    assert_eq!(shot.width, 300);
    assert_eq!(shot.height, 200);

    let decoded = image::load_from_memory(&shot.png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (300, 200));
}

#[tokio::test]
async fn test_tiles_land_in_row_major_positions() {
    let orchestrator = CaptureOrchestrator::new(SolidFetcher, test_config());
    let area = Area::new("center", (55.0, 37.0), (55.02, 37.03));

    let shot = orchestrator.capture(&area).await.unwrap();
    let decoded = image::load_from_memory(&shot.png).unwrap().to_rgba8();

    // Tile (row=1, col=2) samples (55.010000, 37.020000) and occupies
    // x in [200, 300), y in [100, 200)
    let expected = point_color(GeoPoint::new(55.01, 37.02).unwrap());
    for &(x, y) in &[(200, 100), (250, 150), (299, 199)] {
        let pixel = decoded.get_pixel(x, y);
        assert_eq!((pixel[0], pixel[1]), expected, "pixel at ({}, {})", x, y);
    }

    // Tile (row=0, col=0) samples the start corner at the origin
    let expected = point_color(GeoPoint::new(55.0, 37.0).unwrap());
    let pixel = decoded.get_pixel(0, 0);
    assert_eq!((pixel[0], pixel[1]), expected);
}

#[tokio::test]
async fn test_repeated_captures_are_deterministic() {
    let orchestrator = CaptureOrchestrator::new(SolidFetcher, test_config());
    let area = Area::new("center", (55.0, 37.0), (55.02, 37.03));

    let first = orchestrator.capture(&area).await.unwrap();
    let second = orchestrator.capture(&area).await.unwrap();

    // Same area, same fetcher, same pixels
    assert_eq!(first.png, second.png);
}

#[tokio::test]
async fn test_degenerate_area_yields_single_tile() {
    let orchestrator = CaptureOrchestrator::new(SolidFetcher, test_config());
    let area = Area::new("pin", (55.0, 37.0), (55.0, 37.0));

    let shot = orchestrator.capture(&area).await.unwrap();
    assert_eq!(shot.width, 100);
    assert_eq!(shot.height, 100);
}

#[tokio::test]
async fn test_capture_enabled_stores_through_sink() {
    let orchestrator = CaptureOrchestrator::new(SolidFetcher, test_config());
    let sink = CollectingSink::default();
    let areas = vec![
        Area::new("north", (55.0, 37.0), (55.01, 37.01)),
        Area::new("paused", (56.0, 38.0), (56.01, 38.01)).with_enabled(false),
        Area::new("south", (54.0, 36.0), (54.01, 36.01)),
    ];

    let results = orchestrator.capture_enabled(&areas, &sink).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, outcome)| outcome.is_ok()));

    let shots = sink.shots.lock().unwrap();
    assert_eq!(shots.len(), 2);
    assert_eq!(shots[0].area, "north");
    assert_eq!(shots[1].area, "south");
}

/// Fetcher where one poison point fails permanently at once and every
/// other fetch hangs. Counts fetches abandoned mid-flight via drop
/// guards, so tests can observe that a failing run cancels its siblings.
struct PoisonedFetcher {
    poison: (i64, i64),
    started: Arc<AtomicU32>,
    completed: Arc<AtomicU32>,
    abandoned: Arc<AtomicU32>,
}

impl PoisonedFetcher {
    fn new(poison: GeoPoint) -> Self {
        Self {
            poison: (poison.lat_micro(), poison.lng_micro()),
            started: Arc::new(AtomicU32::new(0)),
            completed: Arc::new(AtomicU32::new(0)),
            abandoned: Arc::new(AtomicU32::new(0)),
        }
    }
}

/// Increments `abandoned` on drop unless the fetch ran to completion.
struct AbandonGuard {
    abandoned: Arc<AtomicU32>,
    finished: bool,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl TileFetcher for PoisonedFetcher {
    async fn fetch(&self, point: GeoPoint) -> Result<Vec<u8>, FetchError> {
        self.started.fetch_add(1, Ordering::SeqCst);

        if (point.lat_micro(), point.lng_micro()) == self.poison {
            return Err(FetchError::permanent("HTTP 404 from provider"));
        }

        let mut guard = AbandonGuard {
            abandoned: Arc::clone(&self.abandoned),
            finished: false,
        };
        // Long enough that only cancellation can end these fetches
        tokio::time::sleep(Duration::from_secs(30)).await;
        guard.finished = true;
        self.completed.fetch_add(1, Ordering::SeqCst);

        let (r, g) = point_color(point);
        Ok(solid_png(r, g, 100, 100))
    }

    fn name(&self) -> &str {
        "poisoned"
    }
}

#[tokio::test]
async fn test_permanent_failure_cancels_outstanding_fetches() {
    let poison = GeoPoint::new(55.01, 37.02).unwrap();
    let fetcher = PoisonedFetcher::new(poison);
    let started = Arc::clone(&fetcher.started);
    let completed = Arc::clone(&fetcher.completed);
    let abandoned = Arc::clone(&fetcher.abandoned);

    let config = test_config().with_max_retries(1);
    let orchestrator = CaptureOrchestrator::new(fetcher, config);
    let area = Area::new("center", (55.0, 37.0), (55.02, 37.03));

    let begun = Instant::now();
    let err = orchestrator.capture(&area).await.unwrap_err();

    // The run aborts on the permanent error, not the 30s sleeps
    assert!(begun.elapsed() < Duration::from_secs(10));

    match err {
        CaptureError::Fetch {
            point,
            attempts,
            source,
        } => {
            assert_eq!(point, poison);
            assert_eq!(attempts, 1);
            assert!(!source.is_retryable());
        }
        other => panic!("expected fetch error, got {:?}", other),
    }

    // Every other in-flight fetch was abandoned, none ran to completion
    assert_eq!(completed.load(Ordering::SeqCst), 0);
    let started = started.load(Ordering::SeqCst);
    let abandoned = abandoned.load(Ordering::SeqCst);
    assert!(started >= 1);
    assert_eq!(abandoned, started - 1, "all non-poison fetches cancelled");
}

#[tokio::test]
async fn test_invalid_area_fails_before_fetching() {
    let poison = GeoPoint::new(55.0, 37.0).unwrap();
    let fetcher = PoisonedFetcher::new(poison);
    let started = Arc::clone(&fetcher.started);

    let orchestrator = CaptureOrchestrator::new(fetcher, test_config());
    let area = Area::new("broken", (120.0, 37.0), (55.0, 37.0));

    let err = orchestrator.capture(&area).await.unwrap_err();
    assert!(matches!(err, CaptureError::InvalidBoundingBox(_)));
    assert_eq!(started.load(Ordering::SeqCst), 0);
}
