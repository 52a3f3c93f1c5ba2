//! # Derived state
//!
//! Pure combination of raw [`EphemerisOracle`] outputs into one immutable
//! [`DerivedState`](crate::derived_state::DerivedState) per instant.
//!
//! ## Oracle lookups
//!
//! [`compute_derived_state`](crate::derived_state::compute_derived_state) performs the five
//! conceptual lookups of one instant, plus the retrograde flag:
//!
//! 1. separation between the target and the reference body, seen from the observer,
//! 2. geocentric ecliptic longitude of the target,
//! 3. geocentric ecliptic longitude of the reference body,
//! 4. heliocentric ecliptic triple of the observer,
//! 5. heliocentric ecliptic triple of the target.
//!
//! ## Phase angle
//!
//! The phase angle is the angle, at the target, between the direction to the illuminating
//! body (the Sun, at the heliocentric origin) and the direction to the observer:
//!
//! ```text
//! cos(φ) = (−P)·(O − P) / (|P|·|O − P|)
//! ```
//!
//! with `P` and `O` the heliocentric Cartesian positions of the target and the observer. The
//! cosine is clamped to `[-1, 1]` before `acos`, and the illuminated fraction is
//! `k = (1 + cos φ) / 2`.

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::{Degree, RADEG},
    ephemeris::{normalize_deg, Body, EphemerisOracle, HeliocentricCoords},
    sextant_errors::SextantError,
};

/// The three bodies feeding one derived state.
///
/// * `target` – the body whose events are searched (e.g. Venus).
/// * `reference` – the body separations and longitudes are measured against (e.g. the Sun).
/// * `observer` – the body the sky is seen from (e.g. the Earth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedBodies {
    pub target: Body,
    pub reference: Body,
    pub observer: Body,
}

impl DerivedBodies {
    /// Elongation of `target` from the Sun, seen from the Earth.
    pub fn solar_elongation(target: Body) -> Self {
        DerivedBodies {
            target,
            reference: Body::Sun,
            observer: Body::Earth,
        }
    }

    /// Reject selections for which the derived quantities are undefined.
    pub fn validate(&self) -> Result<(), SextantError> {
        if self.target == self.reference {
            return Err(SextantError::InvalidBodySelection(format!(
                "target and reference are both {}",
                self.target
            )));
        }
        if self.target == self.observer {
            return Err(SextantError::InvalidBodySelection(format!(
                "target and observer are both {}",
                self.target
            )));
        }
        if self.reference == self.observer {
            return Err(SextantError::InvalidBodySelection(format!(
                "reference and observer are both {}",
                self.reference
            )));
        }
        if self.target == Body::Sun {
            return Err(SextantError::InvalidBodySelection(
                "the Sun cannot be the target: its phase angle is undefined".into(),
            ));
        }
        Ok(())
    }
}

/// Geometry of the target at one instant.
///
/// Units
/// -----
/// * `separation_deg`: degrees, angular distance target ↔ reference seen from the observer.
/// * `longitude_body_deg`, `longitude_reference_deg`: geocentric ecliptic longitudes, `[0, 360)`.
/// * `phase_angle_deg`: degrees, `[0, 180]`.
/// * `illuminated_fraction`: unitless, `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedState {
    pub instant: Epoch,
    pub separation_deg: Degree,
    pub longitude_body_deg: Degree,
    pub longitude_reference_deg: Degree,
    pub is_retrograde: bool,
    pub phase_angle_deg: Degree,
    pub illuminated_fraction: f64,
}

impl DerivedState {
    /// Wrapped longitude difference `body − reference` in `[-180, 180)`.
    ///
    /// Positive values mean the target is east of the reference body.
    pub fn longitude_difference_deg(&self) -> Degree {
        wrap_pm180(self.longitude_body_deg - self.longitude_reference_deg)
    }
}

/// Wrap an angle difference to `[-180, 180)` using `((x + 180) mod 360) − 180`.
pub fn wrap_pm180(angle: Degree) -> Degree {
    normalize_deg(angle + 180.0) - 180.0
}

/// Phase angle (degrees, `[0, 180]`) of a target lit by the Sun at the heliocentric origin.
///
/// Arguments
/// -----------------
/// * `target`: heliocentric coordinates of the observed body.
/// * `observer`: heliocentric coordinates of the observer.
///
/// Return
/// ----------
/// * The angle at the target between the directions to the Sun and to the observer. When one
///   of the two directions is degenerate (zero length) the body is treated as fully lit
///   (`0°`).
pub fn phase_angle_deg(target: &HeliocentricCoords, observer: &HeliocentricCoords) -> Degree {
    let target_pos = target.to_cartesian();
    let to_sun: Vector3<f64> = -target_pos;
    let to_observer = observer.to_cartesian() - target_pos;

    let norms = to_sun.norm() * to_observer.norm();
    if norms == 0.0 {
        return 0.0;
    }
    let cos_phase = (to_sun.dot(&to_observer) / norms).clamp(-1.0, 1.0);
    cos_phase.acos() / RADEG
}

/// Illuminated fraction `(1 + cos φ) / 2` of a disk seen at phase angle `φ` (degrees).
pub fn illuminated_fraction(phase_angle: Degree) -> f64 {
    (1.0 + (phase_angle * RADEG).cos()) / 2.0
}

/// Compute the derived state of `bodies` at `epoch`.
///
/// Arguments
/// -----------------
/// * `oracle`: the ephemeris backend answering the raw lookups.
/// * `bodies`: target / reference / observer selection.
/// * `epoch`: instant of evaluation, already normalized to UTC by the caller.
///
/// Return
/// ----------
/// * A fresh [`DerivedState`], or the first oracle failure encountered.
pub fn compute_derived_state<O: EphemerisOracle + ?Sized>(
    oracle: &O,
    bodies: &DerivedBodies,
    epoch: Epoch,
) -> Result<DerivedState, SextantError> {
    let separation_deg = oracle.separation(bodies.target, bodies.reference, bodies.observer, epoch)?;
    let longitude_body_deg = oracle.geocentric_longitude(bodies.target, epoch)?;
    let longitude_reference_deg = oracle.geocentric_longitude(bodies.reference, epoch)?;
    let observer_helio = oracle.heliocentric(bodies.observer, epoch)?;
    let target_helio = oracle.heliocentric(bodies.target, epoch)?;
    let is_retrograde = oracle.is_retrograde(bodies.target, epoch)?;

    let phase_angle = phase_angle_deg(&target_helio, &observer_helio);

    Ok(DerivedState {
        instant: epoch,
        separation_deg,
        longitude_body_deg: normalize_deg(longitude_body_deg),
        longitude_reference_deg: normalize_deg(longitude_reference_deg),
        is_retrograde,
        phase_angle_deg: phase_angle,
        illuminated_fraction: illuminated_fraction(phase_angle),
    })
}
