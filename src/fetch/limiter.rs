//! Fetch concurrency limiter.
//!
//! Semaphore-based limiter that constrains the total number of concurrent
//! tile requests across all capture runs. A large bounding box can expand
//! into hundreds of sample points; without a bound the run would attempt
//! that many simultaneous HTTP connections and trip provider rate limits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limiter for concurrent tile fetches.
///
/// Wraps a Tokio semaphore and tracks in-flight and peak counts for
/// metrics and test assertions.
#[derive(Debug)]
pub struct FetchLimiter {
    /// Semaphore controlling concurrent requests
    semaphore: Arc<Semaphore>,

    /// Maximum permits (for stats/debugging)
    max_permits: usize,

    /// Current number of in-flight requests
    in_flight: AtomicUsize,

    /// Peak concurrent requests observed
    peak_in_flight: AtomicUsize,
}

impl FetchLimiter {
    /// Creates a new limiter with the specified maximum concurrent fetches.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a permit for a tile fetch, waiting if the limit is reached.
    ///
    /// The permit is released when dropped.
    pub async fn acquire(&self) -> FetchPermit<'_> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed unexpectedly");

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;

        let mut peak = self.peak_in_flight.load(Ordering::Relaxed);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }

        FetchPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Returns the maximum number of concurrent fetches allowed.
    #[inline]
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of in-flight fetches.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of concurrent fetches observed.
    #[inline]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }
}

/// Permit for one in-flight fetch.
///
/// Decrements the in-flight counter and releases the semaphore slot on drop.
#[derive(Debug)]
pub struct FetchPermit<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
}

impl Drop for FetchPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
