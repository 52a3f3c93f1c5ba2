//! # Sextant
//!
//! The engine façade. A [`Sextant`] owns:
//!
//! * an injected [`EphemerisOracle`] backend,
//! * the [`DerivedBodies`] selection (target / reference / observer),
//! * the [`SearchParams`],
//! * its own [`StateCache`], alive as long as the engine.
//!
//! Every public query normalizes incoming epochs to UTC and validates its interval before the
//! oracle is touched. The scans then run on the offset (seconds) from `start`, sampling the
//! cached separation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hifitime::Epoch;
//! use sextant::{
//!     derived_state::DerivedBodies,
//!     ephemeris::{keplerian_oracle::KeplerianOracle, Body},
//!     search_params::SearchParams,
//!     sextant::Sextant,
//! };
//!
//! let engine = Sextant::new(
//!     KeplerianOracle::new(),
//!     DerivedBodies::solar_elongation(Body::Venus),
//!     SearchParams::default(),
//! )
//! .unwrap();
//!
//! let start = Epoch::from_gregorian_utc_at_midnight(2025, 1, 1);
//! let end = Epoch::from_gregorian_utc_at_midnight(2026, 1, 1);
//! let six_hours = hifitime::Duration::from_hours(6.0);
//! let two_days = hifitime::Duration::from_days(2.0);
//!
//! for event in engine.find_extrema(start, end, six_hours, two_days).unwrap() {
//!     println!("{event}");
//! }
//! ```

use hifitime::{Duration, Epoch};
use itertools::Itertools;

use crate::{
    constants::Degree,
    derived_state::{compute_derived_state, DerivedBodies, DerivedState},
    ephemeris::EphemerisOracle,
    events::{
        classifier::{classify_crossing, classify_extremum, event_from_state},
        dedup::{deduplicate, deduplicate_by, Dominance},
        pair_crossings, pair_windows, windows_from_pairs, CrossingPair, Event, VisibilityWindow,
    },
    scanner::{scan_crossings, scan_extrema},
    search::SearchDirection,
    search_params::{SearchParams, SearchParamsBuilder},
    sextant_errors::SextantError,
    state_cache::{CacheStats, StateCache},
    time::{offset_by_seconds, seconds_since, to_utc},
};

/// Validated scan interval, expressed in UTC and in seconds from `start`.
#[derive(Debug, Clone, Copy)]
struct ScanInterval {
    start: Epoch,
    end: Epoch,
    span: f64,
    step: f64,
}

/// Celestial event detection engine.
#[derive(Debug)]
pub struct Sextant<O: EphemerisOracle> {
    oracle: O,
    bodies: DerivedBodies,
    params: SearchParams,
    cache: StateCache,
}

impl<O: EphemerisOracle> Sextant<O> {
    /// Build an engine.
    ///
    /// Arguments
    /// -----------------
    /// * `oracle`: ephemeris backend.
    /// * `bodies`: which bodies feed the derived states.
    /// * `params`: search configuration; re-validated here.
    ///
    /// Return
    /// ----------
    /// * The engine with an empty cache, or [`SextantError::InvalidBodySelection`] /
    ///   [`SextantError::InvalidSearchParameter`].
    pub fn new(oracle: O, bodies: DerivedBodies, params: SearchParams) -> Result<Self, SextantError> {
        bodies.validate()?;
        let params = SearchParamsBuilder::from(params).build()?;
        let cache = StateCache::new(params.bucket_width_minutes)?;
        Ok(Sextant {
            oracle,
            bodies,
            params,
            cache,
        })
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn bodies(&self) -> &DerivedBodies {
        &self.bodies
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Cached derived state at `instant`.
    ///
    /// Every instant of a cache bucket receives the state computed at the bucket start.
    pub fn get_state(&self, instant: Epoch) -> Result<DerivedState, SextantError> {
        self.cached_state(to_utc(instant))
    }

    /// Derived state at exactly `instant`, bypassing the cache.
    pub fn compute_state_uncached(&self, instant: Epoch) -> Result<DerivedState, SextantError> {
        compute_derived_state(&self.oracle, &self.bodies, to_utc(instant))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear()
    }

    fn cached_state(&self, utc: Epoch) -> Result<DerivedState, SextantError> {
        self.cache.get(&self.oracle, &self.bodies, utc)
    }

    /// Cached separation at `seconds` after `origin`.
    fn separation_at(&self, origin: Epoch, seconds: f64) -> Result<Degree, SextantError> {
        self.cached_state(offset_by_seconds(origin, seconds))
            .map(|state| state.separation_deg)
    }

    fn validate_interval(
        &self,
        start: Epoch,
        end: Epoch,
        step: Duration,
    ) -> Result<ScanInterval, SextantError> {
        let start = to_utc(start);
        let end = to_utc(end);
        if start >= end {
            return Err(SextantError::DegenerateInterval { start, end });
        }
        let step = step.to_seconds();
        if !(step.is_finite() && step > 0.0) {
            return Err(SextantError::InvalidStep(format!(
                "scan step must be > 0, got {step} s"
            )));
        }
        Ok(ScanInterval {
            start,
            end,
            span: seconds_since(start, end),
            step,
        })
    }

    /// Find, classify and deduplicate the local extrema of the separation over `[start, end]`.
    ///
    /// Arguments
    /// -----------------
    /// * `start`, `end`: scanned interval, any time scale (`start < end`).
    /// * `step`: coarse sampling step (`> 0`).
    /// * `refine_half_window`: half-width `W` of the golden-section bracket around each
    ///   candidate (`> 0`), clamped to the interval.
    ///
    /// Return
    /// ----------
    /// * Maxima (deduplicated with `extremum_min_separation_hours`, larger separation wins) and
    ///   minima (deduplicated with `conjunction_min_separation_hours`, smaller separation wins),
    ///   merged in time order.
    ///
    /// Errors
    /// ----------
    /// * [`SextantError::DegenerateInterval`], [`SextantError::InvalidStep`],
    ///   [`SextantError::InvalidRefineWindow`] for bad inputs; any oracle failure.
    pub fn find_extrema(
        &self,
        start: Epoch,
        end: Epoch,
        step: Duration,
        refine_half_window: Duration,
    ) -> Result<Vec<Event>, SextantError> {
        let interval = self.validate_interval(start, end, step)?;
        let half_window = refine_half_window.to_seconds();
        if !(half_window.is_finite() && half_window > 0.0) {
            return Err(SextantError::InvalidRefineWindow(format!(
                "refinement half-window must be > 0, got {half_window} s"
            )));
        }

        log::debug!(
            "{}: extrema over {} → {}",
            self.bodies.target,
            interval.start,
            interval.end
        );
        let refined = scan_extrema(
            |t| self.separation_at(interval.start, t),
            interval.span,
            interval.step,
            half_window,
            self.params.golden_section_iterations,
        )?;

        let mut maxima = Vec::new();
        let mut minima = Vec::new();
        for found in refined {
            let instant = offset_by_seconds(interval.start, found.extremum.x);
            let state = self.cached_state(instant)?;
            let event = event_from_state(classify_extremum(found.direction, &state), instant, &state);
            match found.direction {
                SearchDirection::Maximize => maxima.push(event),
                SearchDirection::Minimize => minima.push(event),
            }
        }

        let maxima = deduplicate(
            &sorted_by_instant(maxima),
            self.params.extremum_min_separation_seconds(),
            Dominance::Larger,
        );
        let minima = deduplicate(
            &sorted_by_instant(minima),
            self.params.conjunction_min_separation_seconds(),
            Dominance::Smaller,
        );

        Ok(maxima
            .into_iter()
            .merge_by(minima, |a, b| a.instant <= b.instant)
            .collect())
    }

    /// Find the refined crossings of `threshold` by the separation over `[start, end]`.
    ///
    /// A [`ThresholdEnter`](crate::events::EventKind::ThresholdEnter) marks the separation
    /// dropping below the threshold, a [`ThresholdExit`](crate::events::EventKind::ThresholdExit)
    /// marks it rising above. Each direction is deduplicated (closest-to-threshold wins) with
    /// `crossing_min_separation_hours`, one scan step by default. A crossing is kept or dropped
    /// together with its partner, so enters and exits always alternate.
    ///
    /// Crossings that the bisection could not bracket are kept as best-effort events and logged.
    pub fn find_threshold_events(
        &self,
        start: Epoch,
        end: Epoch,
        threshold: Degree,
        step: Duration,
    ) -> Result<Vec<Event>, SextantError> {
        let interval = self.validate_interval(start, end, step)?;
        let pairs = self.threshold_pairs(&interval, threshold)?;
        Ok(pairs.iter().flat_map(CrossingPair::events).collect())
    }

    /// Visibility windows: intervals during which the separation stays below `threshold`.
    ///
    /// Arguments
    /// -----------------
    /// * `start`, `end`: scanned interval (`start < end`).
    /// * `threshold`: separation threshold in degrees.
    /// * `step`: coarse sampling step (`> 0`).
    ///
    /// Return
    /// ----------
    /// * Windows in non-decreasing `enter` order with `enter < exit`. A window already open at
    ///   `start` (or still open at `end`) is clamped to the interval and flagged `open_start`
    ///   (`open_end`); a separation below the threshold over the whole scan yields a single
    ///   window open at both ends.
    pub fn find_crossings(
        &self,
        start: Epoch,
        end: Epoch,
        threshold: Degree,
        step: Duration,
    ) -> Result<Vec<VisibilityWindow>, SextantError> {
        let interval = self.validate_interval(start, end, step)?;
        let pairs = self.threshold_pairs(&interval, threshold)?;
        Ok(windows_from_pairs(&pairs, interval.start, interval.end))
    }

    /// Intervals during which the target moves retrograde.
    ///
    /// The retrograde flag is scanned at `step` and each flip is refined by bisection on an
    /// indicator (`-1` retrograde, `+1` direct); the precision is bounded by the cache bucket
    /// width. Open ends follow the rules of [`Sextant::find_crossings`].
    pub fn find_retrograde_periods(
        &self,
        start: Epoch,
        end: Epoch,
        step: Duration,
    ) -> Result<Vec<VisibilityWindow>, SextantError> {
        let interval = self.validate_interval(start, end, step)?;
        let scan = scan_crossings(
            |t| {
                self.cached_state(offset_by_seconds(interval.start, t))
                    .map(|state| if state.is_retrograde { -1.0 } else { 1.0 })
            },
            interval.span,
            interval.step,
            0.0,
            self.params.bisection_iterations,
        )?;

        let flips: Vec<Event> = scan
            .crossings
            .iter()
            .map(|found| -> Result<Event, SextantError> {
                let instant = offset_by_seconds(interval.start, found.crossing.x);
                let state = self.cached_state(instant)?;
                Ok(event_from_state(classify_crossing(found.falling), instant, &state))
            })
            .collect::<Result<_, _>>()?;

        Ok(pair_windows(
            &flips,
            interval.start,
            interval.end,
            scan.below_at_start,
        ))
    }

    /// Refined crossings of `threshold`, grouped into enter/exit pairs and deduplicated.
    ///
    /// Enters are deduplicated first, then exits, each pass carrying the partner crossing of
    /// the pair along, so the surviving crossings still alternate.
    fn threshold_pairs(
        &self,
        interval: &ScanInterval,
        threshold: Degree,
    ) -> Result<Vec<CrossingPair>, SextantError> {
        log::debug!(
            "{}: crossings of {threshold}° over {} → {}",
            self.bodies.target,
            interval.start,
            interval.end
        );
        let scan = scan_crossings(
            |t| self.separation_at(interval.start, t),
            interval.span,
            interval.step,
            threshold,
            self.params.bisection_iterations,
        )?;

        let crossings: Vec<Event> = scan
            .crossings
            .iter()
            .map(|found| -> Result<Event, SextantError> {
                let instant = offset_by_seconds(interval.start, found.crossing.x);
                let state = self.cached_state(instant)?;
                Ok(event_from_state(classify_crossing(found.falling), instant, &state))
            })
            .collect::<Result<_, _>>()?;
        let pairs = pair_crossings(&crossings, scan.below_at_start);

        let min_separation = self.params.crossing_min_separation_seconds(interval.step);
        let dominance = Dominance::ClosestTo(threshold);
        let pairs = deduplicate_by(&pairs, |pair| pair.enter.as_ref(), min_separation, dominance);
        let pairs = deduplicate_by(&pairs, |pair| pair.exit.as_ref(), min_separation, dominance);
        log::debug!(
            "{}: {} crossings, {} windows after deduplication",
            self.bodies.target,
            crossings.len(),
            pairs.len()
        );
        Ok(pairs)
    }
}

fn sorted_by_instant(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| a.instant.cmp(&b.instant));
    events
}
