#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use hifitime::Epoch;
use sextant::{
    constants::{Degree, SECONDS_PER_DAY},
    derived_state::DerivedBodies,
    ephemeris::{normalize_deg, Body, EphemerisOracle, HeliocentricCoords},
    search_params::SearchParams,
    sextant::Sextant,
    sextant_errors::SextantError,
    time::{offset_by_seconds, seconds_since},
};

/// Period of the synthetic separation, in days.
pub const PERIOD_DAYS: f64 = 90.0;

/// Deterministic oracle whose separation is `45 + 45·sin(2π·t / 90 d)`, `t` counted from
/// `origin`.
///
/// The auxiliary quantities are shaped so that every extremum has a known classification:
/// * the target is east of the Sun during the first 90 days, west afterwards,
/// * the heliocentric longitude of the target (0.7 AU) grows by 2°/day and is 0° at day 67.5,
///   putting it between the Sun and the observer (1 AU, longitude 0°) at the first trough and
///   behind the Sun at the second one,
/// * the target is retrograde while the separation decreases.
#[derive(Debug)]
pub struct SinusoidOracle {
    pub origin: Epoch,
    pub fail_after_day: Option<f64>,
    pub separation_calls: AtomicUsize,
}

impl SinusoidOracle {
    pub fn new(origin: Epoch) -> Self {
        SinusoidOracle {
            origin,
            fail_after_day: None,
            separation_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_after(origin: Epoch, day: f64) -> Self {
        SinusoidOracle {
            fail_after_day: Some(day),
            ..SinusoidOracle::new(origin)
        }
    }

    pub fn calls(&self) -> usize {
        self.separation_calls.load(Ordering::Relaxed)
    }

    fn day(&self, body: Body, epoch: Epoch) -> Result<f64, SextantError> {
        let day = seconds_since(self.origin, epoch) / SECONDS_PER_DAY;
        match self.fail_after_day {
            Some(limit) if day > limit => Err(SextantError::OracleFailure {
                body: body.to_string(),
                epoch,
                reason: format!("synthetic ephemeris ends at day {limit}"),
            }),
            _ => Ok(day),
        }
    }

    pub fn analytic_separation(day: f64) -> Degree {
        45.0 + 45.0 * (std::f64::consts::TAU * day / PERIOD_DAYS).sin()
    }
}

impl EphemerisOracle for SinusoidOracle {
    fn separation(
        &self,
        target: Body,
        _reference: Body,
        _observer: Body,
        epoch: Epoch,
    ) -> Result<Degree, SextantError> {
        self.separation_calls.fetch_add(1, Ordering::Relaxed);
        Ok(Self::analytic_separation(self.day(target, epoch)?))
    }

    fn is_retrograde(&self, body: Body, epoch: Epoch) -> Result<bool, SextantError> {
        let day = self.day(body, epoch)?;
        Ok((std::f64::consts::TAU * day / PERIOD_DAYS).cos() < 0.0)
    }

    fn geocentric_longitude(&self, body: Body, epoch: Epoch) -> Result<Degree, SextantError> {
        let day = self.day(body, epoch)?;
        if body == Body::Sun {
            return Ok(0.0);
        }
        let side = if day < PERIOD_DAYS { 1.0 } else { -1.0 };
        Ok(normalize_deg(side * Self::analytic_separation(day)))
    }

    fn heliocentric(&self, body: Body, epoch: Epoch) -> Result<HeliocentricCoords, SextantError> {
        let day = self.day(body, epoch)?;
        Ok(match body {
            Body::Sun => HeliocentricCoords::new(0.0, 0.0, 0.0),
            Body::Earth => HeliocentricCoords::new(0.0, 0.0, 1.0),
            _ => HeliocentricCoords::new(0.0, normalize_deg(2.0 * (day - 67.5)), 0.7),
        })
    }
}

/// Day zero of the synthetic scenarios.
pub fn origin() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2024, 1, 1)
}

pub fn day(d: f64) -> Epoch {
    offset_by_seconds(origin(), d * SECONDS_PER_DAY)
}

pub fn day_of(epoch: Epoch) -> f64 {
    seconds_since(origin(), epoch) / SECONDS_PER_DAY
}

pub fn synthetic_engine() -> Sextant<SinusoidOracle> {
    engine_with(SinusoidOracle::new(origin()), SearchParams::default())
}

pub fn engine_with(oracle: SinusoidOracle, params: SearchParams) -> Sextant<SinusoidOracle> {
    Sextant::new(oracle, DerivedBodies::solar_elongation(Body::Venus), params).unwrap()
}

/// Day of the first threshold-10° crossing, falling through the threshold.
pub fn first_crossing_day() -> f64 {
    PERIOD_DAYS * (std::f64::consts::PI + (35.0f64 / 45.0).asin()) / std::f64::consts::TAU
}

pub fn assert_day_close(epoch: Epoch, expected_day: f64, tolerance_days: f64) {
    let found = day_of(epoch);
    assert!(
        (found - expected_day).abs() < tolerance_days,
        "expected day {expected_day}, found day {found}"
    );
}

pub fn assert_epoch_close(actual: Epoch, expected: Epoch, tolerance_days: f64) {
    let delta = seconds_since(expected, actual) / SECONDS_PER_DAY;
    assert!(
        delta.abs() < tolerance_days,
        "expected {expected}, found {actual} ({delta:+.3} d)"
    );
}
