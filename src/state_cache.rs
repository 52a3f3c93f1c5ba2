//! # Bucketed state cache
//!
//! Memoization of [`DerivedState`] values keyed by a fixed-width time bucket.
//!
//! ## Keys
//!
//! An instant maps to the integer bucket
//!
//! ```text
//! key = floor(unix_seconds(instant) / bucket_width_seconds)
//! ```
//!
//! and every instant of a bucket receives the **same** state: the one computed at the bucket
//! start instant `key · bucket_width_seconds`. The cache never distinguishes sub-bucket time, so
//! a coarse width trades precision for hit rate. Refinement routines probe closely spaced
//! instants; their precision is bounded by the bucket width, and callers needing more must
//! use a smaller width or bypass the cache.
//!
//! ## Concurrency
//!
//! The bucket map is guarded by a [`parking_lot::Mutex`]. The state is computed **outside** the
//! lock and inserted with `entry().or_insert`, so when two threads miss the same bucket the first
//! stored value wins and both return it.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use hifitime::Epoch;
use parking_lot::Mutex;

use crate::{
    constants::{CacheKey, SECONDS_PER_MINUTE},
    derived_state::{compute_derived_state, DerivedBodies, DerivedState},
    ephemeris::EphemerisOracle,
    sextant_errors::SextantError,
};

/// Hit / miss counters and size of a [`StateCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct StateCache {
    bucket_width_seconds: f64,
    buckets: Mutex<AHashMap<CacheKey, DerivedState>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StateCache {
    /// Create an empty cache.
    ///
    /// Arguments
    /// -----------------
    /// * `bucket_width_minutes`: width of one bucket; must be strictly positive and finite.
    ///
    /// Return
    /// ----------
    /// * The cache, or [`SextantError::InvalidSearchParameter`] for a non-positive width.
    pub fn new(bucket_width_minutes: f64) -> Result<Self, SextantError> {
        if !(bucket_width_minutes.is_finite() && bucket_width_minutes > 0.0) {
            return Err(SextantError::InvalidSearchParameter(format!(
                "bucket width must be > 0 minutes, got {bucket_width_minutes}"
            )));
        }
        log::debug!("state cache created with {bucket_width_minutes} min buckets");
        Ok(StateCache {
            bucket_width_seconds: bucket_width_minutes * SECONDS_PER_MINUTE,
            buckets: Mutex::new(AHashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn bucket_width_seconds(&self) -> f64 {
        self.bucket_width_seconds
    }

    /// Bucket index of `instant`.
    pub fn bucket_key(&self, instant: Epoch) -> CacheKey {
        (instant.to_unix_seconds() / self.bucket_width_seconds).floor() as CacheKey
    }

    /// First instant of bucket `key`, in UTC.
    pub fn bucket_start(&self, key: CacheKey) -> Epoch {
        Epoch::from_unix_seconds(key as f64 * self.bucket_width_seconds)
    }

    /// Return the cached state of the bucket holding `instant`, computing it on a miss.
    ///
    /// Arguments
    /// -----------------
    /// * `instant`: UTC instant to look up.
    /// * `compute`: called with the bucket start instant on a miss.
    ///
    /// Return
    /// ----------
    /// * The state shared by every instant of the bucket, or the error of `compute`; failed
    ///   computations are not stored.
    pub fn get_or_compute<F>(&self, instant: Epoch, compute: F) -> Result<DerivedState, SextantError>
    where
        F: FnOnce(Epoch) -> Result<DerivedState, SextantError>,
    {
        let key = self.bucket_key(instant);
        if let Some(state) = self.buckets.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(*state);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let state = compute(self.bucket_start(key))?;
        Ok(*self.buckets.lock().entry(key).or_insert(state))
    }

    /// Cached derived state of `bodies` at `instant`.
    pub fn get<O: EphemerisOracle + ?Sized>(
        &self,
        oracle: &O,
        bodies: &DerivedBodies,
        instant: Epoch,
    ) -> Result<DerivedState, SextantError> {
        self.get_or_compute(instant, |bucket_start| {
            compute_derived_state(oracle, bodies, bucket_start)
        })
    }

    pub fn len(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.lock().is_empty()
    }

    /// Drop every stored state and reset the counters.
    pub fn clear(&self) {
        self.buckets.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
