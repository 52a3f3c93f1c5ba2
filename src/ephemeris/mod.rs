//! # Ephemeris oracle
//!
//! This module defines the [`EphemerisOracle`](crate::ephemeris::EphemerisOracle) trait, the
//! single seam through which the engine obtains raw positional quantities. The engine never
//! models orbital mechanics itself: every angle it reasons about comes from an oracle passed
//! at construction time.
//!
//! ## Contract
//!
//! For a [`Body`] and a **UTC** instant, an oracle returns:
//!
//! 1. the angular separation (degrees) between the body and a reference body, as seen from the
//!    observer,
//! 2. whether the body is in retrograde apparent motion,
//! 3. the geocentric ecliptic longitude (degrees, `[0, 360)`),
//! 4. the heliocentric ecliptic latitude / longitude / distance triple ([`HeliocentricCoords`]).
//!
//! Failures are reported as [`SextantError::OracleFailure`](crate::sextant_errors::SextantError::OracleFailure)
//! and are propagated unchanged to the caller of the query that triggered them.
//!
//! ## Backends
//!
//! * [`KeplerianOracle`](crate::ephemeris::keplerian_oracle::KeplerianOracle) – mean-element
//!   two-body positions of the major planets, self-contained.
//! * Any user type implementing [`EphemerisOracle`], e.g. a synthetic deterministic function
//!   in tests.
//!
//! ## See also
//! ------------
//! * [`compute_derived_state`](crate::derived_state::compute_derived_state) – Combines the oracle outputs into a derived state.
//! * [`Sextant`](crate::sextant::Sextant) – Engine façade that owns the oracle.

use std::{fmt, str::FromStr};

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::{AstronomicalUnit, Degree, RADEG},
    sextant_errors::SextantError,
};

pub mod keplerian_oracle;
mod planet_elements;

/// Solar-system bodies known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    /// All bodies, ordered by heliocentric distance.
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Body {
    type Err = SextantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Body::ALL
            .into_iter()
            .find(|body| body.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SextantError::UnknownBody(s.to_string()))
    }
}

/// Reduce an angle in degrees to `[0, 360)`.
///
/// `rem_euclid` rounds tiny negative inputs up to exactly `360.0`, which folds back to `0.0`.
pub fn normalize_deg(angle: Degree) -> Degree {
    let reduced = angle.rem_euclid(360.0);
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Heliocentric ecliptic spherical coordinates of a body.
///
/// Units
/// -----
/// * `latitude`: degrees, `[-90, 90]`.
/// * `longitude`: degrees, `[0, 360)`.
/// * `distance`: astronomical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeliocentricCoords {
    pub latitude: Degree,
    pub longitude: Degree,
    pub distance: AstronomicalUnit,
}

impl HeliocentricCoords {
    pub fn new(latitude: Degree, longitude: Degree, distance: AstronomicalUnit) -> Self {
        HeliocentricCoords {
            latitude,
            longitude,
            distance,
        }
    }

    /// Build the spherical triple from a heliocentric ecliptic Cartesian vector.
    ///
    /// The origin maps to a zero triple.
    pub fn from_cartesian(position: &Vector3<f64>) -> Self {
        let distance = position.norm();
        if distance == 0.0 {
            return HeliocentricCoords::new(0.0, 0.0, 0.0);
        }
        let latitude = (position.z / distance).clamp(-1.0, 1.0).asin() / RADEG;
        let longitude = normalize_deg(position.y.atan2(position.x) / RADEG);
        HeliocentricCoords::new(latitude, longitude, distance)
    }

    /// Standard spherical → Cartesian conversion.
    ///
    /// `x = r·cos(lat)·cos(lon)`, `y = r·cos(lat)·sin(lon)`, `z = r·sin(lat)`.
    pub fn to_cartesian(&self) -> Vector3<f64> {
        let (sin_lat, cos_lat) = (self.latitude * RADEG).sin_cos();
        let (sin_lon, cos_lon) = (self.longitude * RADEG).sin_cos();
        Vector3::new(
            self.distance * cos_lat * cos_lon,
            self.distance * cos_lat * sin_lon,
            self.distance * sin_lat,
        )
    }
}

/// Source of raw positional quantities for the engine.
///
/// Every method receives a **UTC** epoch; the engine normalizes instants at its public
/// boundary before calling into the oracle. Implementations must be deterministic: two calls
/// with the same arguments are expected to return the same values.
pub trait EphemerisOracle {
    /// Angular separation (degrees) between `target` and `reference` as seen from `observer`.
    fn separation(
        &self,
        target: Body,
        reference: Body,
        observer: Body,
        epoch: Epoch,
    ) -> Result<Degree, SextantError>;

    /// Whether `body` moves retrograde in geocentric ecliptic longitude at `epoch`.
    fn is_retrograde(&self, body: Body, epoch: Epoch) -> Result<bool, SextantError>;

    /// Geocentric ecliptic longitude of `body` in degrees, `[0, 360)`.
    fn geocentric_longitude(&self, body: Body, epoch: Epoch) -> Result<Degree, SextantError>;

    /// Heliocentric ecliptic latitude / longitude / distance of `body`.
    fn heliocentric(&self, body: Body, epoch: Epoch) -> Result<HeliocentricCoords, SextantError>;
}

impl<O: EphemerisOracle + ?Sized> EphemerisOracle for &O {
    fn separation(
        &self,
        target: Body,
        reference: Body,
        observer: Body,
        epoch: Epoch,
    ) -> Result<Degree, SextantError> {
        (**self).separation(target, reference, observer, epoch)
    }

    fn is_retrograde(&self, body: Body, epoch: Epoch) -> Result<bool, SextantError> {
        (**self).is_retrograde(body, epoch)
    }

    fn geocentric_longitude(&self, body: Body, epoch: Epoch) -> Result<Degree, SextantError> {
        (**self).geocentric_longitude(body, epoch)
    }

    fn heliocentric(&self, body: Body, epoch: Epoch) -> Result<HeliocentricCoords, SextantError> {
        (**self).heliocentric(body, epoch)
    }
}
