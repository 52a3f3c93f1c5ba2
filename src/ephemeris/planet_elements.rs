//! Mean orbital elements of the major planets, referred to the mean ecliptic and equinox of
//! J2000, with their linear rates per Julian century (Standish, *Keplerian Elements for
//! Approximate Positions of the Major Planets*, valid 1800 AD – 2050 AD).
//!
//! Earth stands for the Earth–Moon barycenter.

use crate::constants::{AstronomicalUnit, Degree};

use super::Body;

/// Element set at J2000 with its rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MeanElements {
    pub semi_major_axis: AstronomicalUnit,
    pub semi_major_axis_rate: AstronomicalUnit,
    pub eccentricity: f64,
    pub eccentricity_rate: f64,
    pub inclination: Degree,
    pub inclination_rate: Degree,
    pub mean_longitude: Degree,
    pub mean_longitude_rate: Degree,
    pub perihelion_longitude: Degree,
    pub perihelion_longitude_rate: Degree,
    pub ascending_node_longitude: Degree,
    pub ascending_node_longitude_rate: Degree,
}

/// Elements evaluated at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OsculatingSet {
    pub semi_major_axis: AstronomicalUnit,
    pub eccentricity: f64,
    pub inclination: Degree,
    pub mean_longitude: Degree,
    pub perihelion_longitude: Degree,
    pub ascending_node_longitude: Degree,
}

impl MeanElements {
    /// Evaluate the elements `centuries` Julian centuries after J2000.
    pub fn at(&self, centuries: f64) -> OsculatingSet {
        OsculatingSet {
            semi_major_axis: self.semi_major_axis + self.semi_major_axis_rate * centuries,
            eccentricity: self.eccentricity + self.eccentricity_rate * centuries,
            inclination: self.inclination + self.inclination_rate * centuries,
            mean_longitude: self.mean_longitude + self.mean_longitude_rate * centuries,
            perihelion_longitude: self.perihelion_longitude
                + self.perihelion_longitude_rate * centuries,
            ascending_node_longitude: self.ascending_node_longitude
                + self.ascending_node_longitude_rate * centuries,
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn elements(
    a: f64,
    a_dot: f64,
    e: f64,
    e_dot: f64,
    i: f64,
    i_dot: f64,
    l: f64,
    l_dot: f64,
    w: f64,
    w_dot: f64,
    node: f64,
    node_dot: f64,
) -> MeanElements {
    MeanElements {
        semi_major_axis: a,
        semi_major_axis_rate: a_dot,
        eccentricity: e,
        eccentricity_rate: e_dot,
        inclination: i,
        inclination_rate: i_dot,
        mean_longitude: l,
        mean_longitude_rate: l_dot,
        perihelion_longitude: w,
        perihelion_longitude_rate: w_dot,
        ascending_node_longitude: node,
        ascending_node_longitude_rate: node_dot,
    }
}

const MERCURY: MeanElements = elements(
    0.38709927, 0.00000037, 0.20563593, 0.00001906, 7.00497902, -0.00594749, 252.25032350,
    149472.67411175, 77.45779628, 0.16047689, 48.33076593, -0.12534081,
);

const VENUS: MeanElements = elements(
    0.72333566, 0.00000390, 0.00677672, -0.00004107, 3.39467605, -0.00078890, 181.97909950,
    58517.81538729, 131.60246718, 0.00268329, 76.67984255, -0.27769418,
);

const EARTH_MOON_BARYCENTER: MeanElements = elements(
    1.00000261, 0.00000562, 0.01671123, -0.00004392, -0.00001531, -0.01294668, 100.46457166,
    35999.37244981, 102.93768193, 0.32327364, 0.0, 0.0,
);

const MARS: MeanElements = elements(
    1.52371034, 0.00001847, 0.09339410, 0.00007882, 1.84969142, -0.00813131, -4.55343205,
    19140.30268499, -23.94362959, 0.44441088, 49.55953891, -0.29257343,
);

const JUPITER: MeanElements = elements(
    5.20288700, -0.00011607, 0.04838624, -0.00013253, 1.30439695, -0.00183714, 34.39644051,
    3034.74612775, 14.72847983, 0.21252668, 100.47390909, 0.20469106,
);

const SATURN: MeanElements = elements(
    9.53667594, -0.00125060, 0.05386179, -0.00050991, 2.48599187, 0.00193609, 49.95424423,
    1222.49362201, 92.59887831, -0.41897216, 113.66242448, -0.28867794,
);

const URANUS: MeanElements = elements(
    19.18916464, -0.00196176, 0.04725744, -0.00004397, 0.77263783, -0.00242939, 313.23810451,
    428.48202785, 170.95427630, 0.40805281, 74.01692503, 0.04240589,
);

const NEPTUNE: MeanElements = elements(
    30.06992276, 0.00026291, 0.00859048, 0.00005105, 1.77004347, 0.00035372, -55.12002969,
    218.45945325, 44.96476227, -0.32241464, 131.78422574, -0.00508664,
);

/// Mean elements of a planet, `None` for the Sun.
pub(crate) fn mean_elements(body: Body) -> Option<&'static MeanElements> {
    match body {
        Body::Sun => None,
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Earth => Some(&EARTH_MOON_BARYCENTER),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
    }
}
