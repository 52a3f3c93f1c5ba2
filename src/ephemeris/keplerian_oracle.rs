//! # Keplerian oracle
//!
//! A self-contained [`EphemerisOracle`](crate::ephemeris::EphemerisOracle) backend that
//! propagates the **mean orbital elements** of the major planets with the two-body model.
//!
//! ## Algorithm
//!
//! For each planet and instant:
//!
//! 1. Evaluate the J2000 mean elements `(a, e, I, L, ϖ, Ω)` and their secular rates at the
//!    number of Julian centuries (TDB) elapsed since J2000.
//! 2. Form the argument of perihelion `ω = ϖ − Ω` and the mean anomaly `M = L − ϖ`.
//! 3. Solve Kepler's equation `E − e·sin(E) = M` by Newton–Raphson.
//! 4. Build the position in the orbital plane and rotate it to the J2000 ecliptic frame.
//!
//! Geocentric quantities are obtained by differencing heliocentric vectors with the Earth
//! (Earth–Moon barycenter). Accuracy is at the level of the mean elements, a few arcminutes
//! for the inner planets over 1800–2050, which is enough to time elongations and conjunctions
//! to within a fraction of a day.
//!
//! ## Retrograde flag
//!
//! A body is retrograde when its geocentric ecliptic longitude decreases; the rate is taken as
//! a central difference over ±[`RETROGRADE_HALF_SPAN_SECONDS`].
//!
//! ## See also
//! ------------
//! * [`EphemerisOracle`] – Contract implemented here.
//! * Standish, E. M., *Keplerian Elements for Approximate Positions of the Major Planets*, JPL.

use std::f64::consts::PI;

use hifitime::Epoch;
use nalgebra::Vector3;
use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{
    constants::{Degree, DPI, RADEG},
    derived_state::wrap_pm180,
    ephemeris::{
        planet_elements::{mean_elements, OsculatingSet},
        normalize_deg, Body, EphemerisOracle, HeliocentricCoords,
    },
    sextant_errors::SextantError,
    time::{julian_centuries_since_j2000, offset_by_seconds},
};

/// Half span of the central difference used for the retrograde flag.
pub const RETROGRADE_HALF_SPAN_SECONDS: f64 = 43_200.0;

/// Mean-element two-body ephemeris of the Sun and the major planets.
#[derive(Debug, Clone, Default)]
pub struct KeplerianOracle;

impl KeplerianOracle {
    pub fn new() -> Self {
        KeplerianOracle
    }

    /// Heliocentric ecliptic J2000 position of `body` in AU.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: any [`Body`]; the Sun is the origin.
    /// * `epoch`: instant of evaluation.
    ///
    /// Return
    /// ----------
    /// * The Cartesian position, or a [`SextantError::RootFindingError`] if Kepler's equation
    ///   does not converge.
    pub fn heliocentric_position(
        &self,
        body: Body,
        epoch: Epoch,
    ) -> Result<Vector3<f64>, SextantError> {
        let Some(elements) = mean_elements(body) else {
            return Ok(Vector3::zeros());
        };
        let set = elements.at(julian_centuries_since_j2000(epoch));
        position_from_elements(&set)
    }

    fn geocentric_vector(&self, body: Body, epoch: Epoch) -> Result<Vector3<f64>, SextantError> {
        if body == Body::Earth {
            return Err(SextantError::OracleFailure {
                body: body.to_string(),
                epoch,
                reason: "geocentric direction of the Earth is undefined".into(),
            });
        }
        Ok(self.heliocentric_position(body, epoch)?
            - self.heliocentric_position(Body::Earth, epoch)?)
    }
}

/// Solve Kepler's equation `E − e·sin(E) = M` for the eccentric anomaly (radians).
fn solve_kepler_equation(mean_anomaly: f64, eccentricity: f64) -> Result<f64, SextantError> {
    let f = |ecc_anom: f64| ecc_anom - eccentricity * ecc_anom.sin() - mean_anomaly;
    let df = |ecc_anom: f64| 1.0 - eccentricity * ecc_anom.cos();

    let x0 = mean_anomaly + eccentricity * mean_anomaly.sin();

    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 30,
    };

    Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
}

/// Heliocentric ecliptic position (AU) from one evaluated element set.
fn position_from_elements(set: &OsculatingSet) -> Result<Vector3<f64>, SextantError> {
    let e = set.eccentricity;
    let arg_perihelion = (set.perihelion_longitude - set.ascending_node_longitude) * RADEG;
    let node = set.ascending_node_longitude * RADEG;
    let incl = set.inclination * RADEG;

    // Mean anomaly reduced to (-π, π] keeps the Newton start point close to the root
    let mut mean_anomaly = ((set.mean_longitude - set.perihelion_longitude) * RADEG).rem_euclid(DPI);
    if mean_anomaly > PI {
        mean_anomaly -= DPI;
    }

    let ecc_anom = solve_kepler_equation(mean_anomaly, e)?;

    let x_orb = set.semi_major_axis * (ecc_anom.cos() - e);
    let y_orb = set.semi_major_axis * (1.0 - e * e).sqrt() * ecc_anom.sin();

    let (sin_w, cos_w) = arg_perihelion.sin_cos();
    let (sin_n, cos_n) = node.sin_cos();
    let (sin_i, cos_i) = incl.sin_cos();

    Ok(Vector3::new(
        (cos_w * cos_n - sin_w * sin_n * cos_i) * x_orb
            + (-sin_w * cos_n - cos_w * sin_n * cos_i) * y_orb,
        (cos_w * sin_n + sin_w * cos_n * cos_i) * x_orb
            + (-sin_w * sin_n + cos_w * cos_n * cos_i) * y_orb,
        (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb,
    ))
}

fn angle_between_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> Degree {
    let norms = a.norm() * b.norm();
    if norms == 0.0 {
        return 0.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0).acos() / RADEG
}

fn ecliptic_longitude_deg(v: &Vector3<f64>) -> Degree {
    normalize_deg(v.y.atan2(v.x) / RADEG)
}

impl EphemerisOracle for KeplerianOracle {
    fn separation(
        &self,
        target: Body,
        reference: Body,
        observer: Body,
        epoch: Epoch,
    ) -> Result<Degree, SextantError> {
        let from = self.heliocentric_position(observer, epoch)?;
        let to_target = self.heliocentric_position(target, epoch)? - from;
        let to_reference = self.heliocentric_position(reference, epoch)? - from;
        Ok(angle_between_deg(&to_target, &to_reference))
    }

    fn is_retrograde(&self, body: Body, epoch: Epoch) -> Result<bool, SextantError> {
        let before = self.geocentric_longitude(
            body,
            offset_by_seconds(epoch, -RETROGRADE_HALF_SPAN_SECONDS),
        )?;
        let after = self.geocentric_longitude(
            body,
            offset_by_seconds(epoch, RETROGRADE_HALF_SPAN_SECONDS),
        )?;
        Ok(wrap_pm180(after - before) < 0.0)
    }

    fn geocentric_longitude(&self, body: Body, epoch: Epoch) -> Result<Degree, SextantError> {
        Ok(ecliptic_longitude_deg(&self.geocentric_vector(body, epoch)?))
    }

    fn heliocentric(&self, body: Body, epoch: Epoch) -> Result<HeliocentricCoords, SextantError> {
        Ok(HeliocentricCoords::from_cartesian(
            &self.heliocentric_position(body, epoch)?,
        ))
    }
}
