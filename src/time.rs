use hifitime::{Duration, Epoch, TimeScale};
use std::str::FromStr;

use crate::{
    constants::{DAYS_PER_CENTURY, JD_J2000, SECONDS_PER_DAY},
    sextant_errors::SextantError,
};

/// Normalize an epoch to the UTC time scale.
///
/// Every public entry point of the engine calls this before any computation, so that the
/// bucket keys of the state cache and the reported event instants are always expressed in UTC,
/// whatever time scale the caller built its epoch in.
///
/// Argument
/// --------
/// * `epoch`: an epoch in any time scale
///
/// Return
/// ------
/// * the same instant, expressed in [`TimeScale::UTC`]
pub fn to_utc(epoch: Epoch) -> Epoch {
    if epoch.time_scale == TimeScale::UTC {
        epoch
    } else {
        epoch.to_time_scale(TimeScale::UTC)
    }
}

/// Parse a date string into a UTC epoch.
///
/// A naive timestamp (no time scale suffix), e.g. `"2025-01-10T12:00:00"`, is interpreted
/// as UTC. A timestamp carrying an explicit scale (e.g. `"2025-01-10T12:00:00 TT"`) is
/// converted to UTC.
///
/// Argument
/// --------
/// * `date`: a date in the format YYYY-MM-ddTHH:mm:ss, optionally followed by a time scale
///
/// Return
/// ------
/// * the UTC epoch, or [`SextantError::InvalidTimestamp`] if hifitime cannot parse the string
pub fn parse_utc(date: &str) -> Result<Epoch, SextantError> {
    Epoch::from_str(date.trim())
        .map(to_utc)
        .map_err(|err| SextantError::InvalidTimestamp(format!("{date}: {err}")))
}

/// Signed number of seconds from `origin` to `epoch`.
pub fn seconds_since(origin: Epoch, epoch: Epoch) -> f64 {
    (epoch - origin).to_seconds()
}

/// Epoch located `seconds` after `origin`, in the time scale of `origin`.
pub fn offset_by_seconds(origin: Epoch, seconds: f64) -> Epoch {
    origin + Duration::from_seconds(seconds)
}

/// Julian centuries of TDB elapsed since J2000.0.
///
/// This is the time argument of the mean orbital elements used by the analytic oracle.
pub fn julian_centuries_since_j2000(epoch: Epoch) -> f64 {
    (epoch.to_jde_tdb_days() - JD_J2000) / DAYS_PER_CENTURY
}

/// Convert a duration expressed in days to seconds.
pub fn days_to_seconds(days: f64) -> f64 {
    days * SECONDS_PER_DAY
}
