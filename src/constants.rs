//! # Constants and type definitions for Sextant
//!
//! This module centralizes the **unit conversions**, **numerical budgets** and **common type
//! aliases** used throughout the `sextant` library.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, days ↔ seconds)
//! - Reference epochs (J2000.0)
//! - Fixed iteration budgets of the golden-section and bisection refiners
//! - Default deduplication separations and cache bucket width
//!
//! The iteration budgets are **fixed counts** rather than tolerances: every refinement costs
//! the same number of oracle probes.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TDB)
pub const JD_J2000: f64 = 2_451_545.0;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

// -------------------------------------------------------------------------------------------------
// Numerical budgets
// -------------------------------------------------------------------------------------------------

/// Iterations of the golden-section extremum refiner.
///
/// Each iteration shrinks the bracket by 1/φ ≈ 0.618, so 45 iterations reduce it by a factor
/// of ≈ 4e-10: a 4-day bracket (345 600 s) collapses to ≈ 1.4e-4 s.
pub const GOLDEN_SECTION_ITERATIONS: u32 = 45;

/// Iterations of the bisection crossing refiner.
///
/// 40 halvings reduce a 6-hour bracket (21 600 s) to ≈ 2e-8 s.
pub const BISECTION_ITERATIONS: u32 = 40;

/// Default width of one state cache bucket, in minutes.
pub const DEFAULT_BUCKET_WIDTH_MINUTES: f64 = 1.0;

/// Default minimum separation between two kept maxima, in hours.
pub const DEFAULT_EXTREMUM_MIN_SEPARATION_HOURS: f64 = 36.0;

/// Default minimum separation between two kept minima (conjunctions), in hours.
pub const DEFAULT_CONJUNCTION_MIN_SEPARATION_HOURS: f64 = 48.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Unix bucket index of the state cache
pub type CacheKey = i64;
