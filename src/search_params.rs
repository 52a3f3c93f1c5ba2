//! # Search parameters
//!
//! Engine-wide configuration of a [`Sextant`](crate::sextant::Sextant): cache resolution,
//! deduplication separations and the iteration budgets of the refiners.
//!
//! Parameters can be built in code with [`SearchParams::builder`] or loaded from TOML; both
//! paths go through the same validation.
//!
//! ```toml
//! bucket_width_minutes = 0.5
//! extremum_min_separation_hours = 36.0
//! conjunction_min_separation_hours = 48.0
//! crossing_min_separation_hours = 12.0
//! golden_section_iterations = 45
//! bisection_iterations = 40
//! ```
//!
//! Missing keys take their default value.

use std::{
    cmp::Ordering::{Equal, Greater},
    fmt,
    path::Path,
};

use serde::Deserialize;

use crate::{
    constants::{
        BISECTION_ITERATIONS, DEFAULT_BUCKET_WIDTH_MINUTES,
        DEFAULT_CONJUNCTION_MIN_SEPARATION_HOURS, DEFAULT_EXTREMUM_MIN_SEPARATION_HOURS,
        GOLDEN_SECTION_ITERATIONS, SECONDS_PER_HOUR,
    },
    sextant_errors::SextantError,
};

/// Configuration of the event detection engine.
///
/// Fields
/// -----------------
/// * `bucket_width_minutes` – width of one state-cache bucket. Every instant of a bucket shares
///   the state computed at the bucket start, so this bounds the time precision of refined events.
/// * `extremum_min_separation_hours` – two maxima closer than this are merged.
/// * `conjunction_min_separation_hours` – two minima closer than this are merged.
/// * `crossing_min_separation_hours` – two crossings of the same direction closer than this are
///   merged; `None` uses the scan step of the query.
/// * `golden_section_iterations` – fixed budget of the extremum refiner.
/// * `bisection_iterations` – fixed budget of the crossing refiner.
///
/// Defaults
/// -----------------
/// * `bucket_width_minutes`: 1.0
/// * `extremum_min_separation_hours`: 36.0
/// * `conjunction_min_separation_hours`: 48.0
/// * `crossing_min_separation_hours`: `None` (one scan step)
/// * `golden_section_iterations`: 45
/// * `bisection_iterations`: 40
///
/// See also
/// -----------------
/// * [`SearchParamsBuilder::build`] – validation rules.
/// * [`crate::state_cache::StateCache`] – consumer of `bucket_width_minutes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchParams {
    pub bucket_width_minutes: f64,
    pub extremum_min_separation_hours: f64,
    pub conjunction_min_separation_hours: f64,
    pub crossing_min_separation_hours: Option<f64>,
    pub golden_section_iterations: u32,
    pub bisection_iterations: u32,
}

impl SearchParams {
    /// Equivalent to [`SearchParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::new()
    }

    /// Parse and validate parameters from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, SextantError> {
        let params: SearchParams = toml::from_str(content)?;
        SearchParamsBuilder::from(params).build()
    }

    /// Read, parse and validate parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SextantError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn extremum_min_separation_seconds(&self) -> f64 {
        self.extremum_min_separation_hours * SECONDS_PER_HOUR
    }

    pub fn conjunction_min_separation_seconds(&self) -> f64 {
        self.conjunction_min_separation_hours * SECONDS_PER_HOUR
    }

    /// Crossing deduplication separation, falling back to `step_seconds`.
    pub fn crossing_min_separation_seconds(&self, step_seconds: f64) -> f64 {
        self.crossing_min_separation_hours
            .map_or(step_seconds, |hours| hours * SECONDS_PER_HOUR)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            bucket_width_minutes: DEFAULT_BUCKET_WIDTH_MINUTES,
            extremum_min_separation_hours: DEFAULT_EXTREMUM_MIN_SEPARATION_HOURS,
            conjunction_min_separation_hours: DEFAULT_CONJUNCTION_MIN_SEPARATION_HOURS,
            crossing_min_separation_hours: None,
            golden_section_iterations: GOLDEN_SECTION_ITERATIONS,
            bisection_iterations: BISECTION_ITERATIONS,
        }
    }
}

/// Builder for [`SearchParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct SearchParamsBuilder {
    params: SearchParams,
}

impl From<SearchParams> for SearchParamsBuilder {
    /// Start from existing parameters, e.g. to re-validate deserialized ones.
    fn from(params: SearchParams) -> Self {
        SearchParamsBuilder { params }
    }
}

impl SearchParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_width_minutes(mut self, v: f64) -> Self {
        self.params.bucket_width_minutes = v;
        self
    }
    pub fn extremum_min_separation_hours(mut self, v: f64) -> Self {
        self.params.extremum_min_separation_hours = v;
        self
    }
    pub fn conjunction_min_separation_hours(mut self, v: f64) -> Self {
        self.params.conjunction_min_separation_hours = v;
        self
    }
    pub fn crossing_min_separation_hours(mut self, v: Option<f64>) -> Self {
        self.params.crossing_min_separation_hours = v;
        self
    }
    pub fn golden_section_iterations(mut self, v: u32) -> Self {
        self.params.golden_section_iterations = v;
        self
    }
    pub fn bisection_iterations(mut self, v: u32) -> Self {
        self.params.bisection_iterations = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater) && x.is_finite()
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal)) && x.is_finite()
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `bucket_width_minutes > 0`.
    /// * `extremum_min_separation_hours >= 0`, `conjunction_min_separation_hours >= 0`; zero
    ///   disables the merge.
    /// * `crossing_min_separation_hours`, when set, `>= 0`.
    /// * `golden_section_iterations >= 1`, `bisection_iterations >= 1`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SearchParams)`, or [`SextantError::InvalidSearchParameter`] naming the first
    ///   offending field.
    pub fn build(self) -> Result<SearchParams, SextantError> {
        let p = &self.params;

        if !Self::gt0(p.bucket_width_minutes) {
            return Err(SextantError::InvalidSearchParameter(
                "bucket_width_minutes must be > 0".into(),
            ));
        }
        if !Self::ge0(p.extremum_min_separation_hours) {
            return Err(SextantError::InvalidSearchParameter(
                "extremum_min_separation_hours must be >= 0".into(),
            ));
        }
        if !Self::ge0(p.conjunction_min_separation_hours) {
            return Err(SextantError::InvalidSearchParameter(
                "conjunction_min_separation_hours must be >= 0".into(),
            ));
        }
        if p.crossing_min_separation_hours.is_some_and(|h| !Self::ge0(h)) {
            return Err(SextantError::InvalidSearchParameter(
                "crossing_min_separation_hours must be >= 0".into(),
            ));
        }
        if p.golden_section_iterations == 0 {
            return Err(SextantError::InvalidSearchParameter(
                "golden_section_iterations must be >= 1".into(),
            ));
        }
        if p.bisection_iterations == 0 {
            return Err(SextantError::InvalidSearchParameter(
                "bisection_iterations must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 46;
            writeln!(f, "Event Search Parameters")?;
            writeln!(f, "-----------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[State cache]")?;
            line!(
                "bucket_width_minutes             = {:.3} min",
                self.bucket_width_minutes,
                "Time resolution of cached states"
            )?;

            writeln!(f, "\n[Deduplication]")?;
            line!(
                "extremum_min_separation_hours    = {:.1} h",
                self.extremum_min_separation_hours,
                "Merge maxima closer than this"
            )?;
            line!(
                "conjunction_min_separation_hours = {:.1} h",
                self.conjunction_min_separation_hours,
                "Merge minima closer than this"
            )?;
            match self.crossing_min_separation_hours {
                Some(hours) => line!(
                    "crossing_min_separation_hours    = {:.1} h",
                    hours,
                    "Merge same-direction crossings"
                )?,
                None => line!(
                    "crossing_min_separation_hours    = {}",
                    "step",
                    "Merge same-direction crossings"
                )?,
            }

            writeln!(f, "\n[Refinement]")?;
            line!(
                "golden_section_iterations        = {}",
                self.golden_section_iterations,
                "Extremum refiner budget"
            )?;
            line!(
                "bisection_iterations             = {}",
                self.bisection_iterations,
                "Crossing refiner budget"
            )
        } else {
            write!(
                f,
                "SearchParams(bucket={:.2}min, extremum_sep={:.1}h, conjunction_sep={:.1}h, crossing_sep={}, gss_it={}, bisect_it={})",
                self.bucket_width_minutes,
                self.extremum_min_separation_hours,
                self.conjunction_min_separation_hours,
                self.crossing_min_separation_hours
                    .map_or_else(|| "step".to_string(), |h| format!("{h:.1}h")),
                self.golden_section_iterations,
                self.bisection_iterations,
            )
        }
    }
}

#[cfg(test)]
mod search_params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SearchParams::default();
        assert_eq!(params.golden_section_iterations, 45);
        assert_eq!(params.bisection_iterations, 40);
        assert_eq!(params.extremum_min_separation_seconds(), 36.0 * 3600.0);
        assert_eq!(params.conjunction_min_separation_seconds(), 48.0 * 3600.0);
        assert_eq!(params.crossing_min_separation_seconds(21_600.0), 21_600.0);
        assert_eq!(SearchParams::builder().build().unwrap(), params);
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(
            SearchParams::builder()
                .bucket_width_minutes(0.0)
                .build()
                .unwrap_err(),
            SextantError::InvalidSearchParameter("bucket_width_minutes must be > 0".into())
        );
        assert!(SearchParams::builder()
            .bucket_width_minutes(f64::NAN)
            .build()
            .is_err());
        assert!(SearchParams::builder()
            .extremum_min_separation_hours(-1.0)
            .build()
            .is_err());
        assert!(SearchParams::builder()
            .crossing_min_separation_hours(Some(-0.5))
            .build()
            .is_err());
        assert!(SearchParams::builder()
            .golden_section_iterations(0)
            .build()
            .is_err());
        assert!(SearchParams::builder().bisection_iterations(0).build().is_err());

        let params = SearchParams::builder()
            .conjunction_min_separation_hours(0.0)
            .crossing_min_separation_hours(Some(12.0))
            .build()
            .unwrap();
        assert_eq!(params.crossing_min_separation_seconds(21_600.0), 43_200.0);
    }

    #[test]
    fn test_from_toml() {
        let params = SearchParams::from_toml_str(
            "bucket_width_minutes = 0.5\ncrossing_min_separation_hours = 6.0\nbisection_iterations = 50\n",
        )
        .unwrap();
        assert_eq!(params.bucket_width_minutes, 0.5);
        assert_eq!(params.crossing_min_separation_hours, Some(6.0));
        assert_eq!(params.bisection_iterations, 50);
        assert_eq!(params.golden_section_iterations, GOLDEN_SECTION_ITERATIONS);

        assert!(matches!(
            SearchParams::from_toml_str("bucket_width_minutes = \"wide\""),
            Err(SextantError::ConfigParseError(_))
        ));
        assert!(matches!(
            SearchParams::from_toml_str("bucket_width_minutes = -2.0"),
            Err(SextantError::InvalidSearchParameter(_))
        ));
        assert!(matches!(
            SearchParams::from_toml_file("does/not/exist.toml"),
            Err(SextantError::IoError(_))
        ));
    }

    #[test]
    fn test_display() {
        let params = SearchParams::default();
        let compact = format!("{params}");
        assert!(compact.starts_with("SearchParams(bucket=1.00min"));
        assert!(compact.contains("crossing_sep=step"));

        let table = format!("{params:#}");
        assert!(table.contains("[Deduplication]"));
        assert!(table.contains("golden_section_iterations        = 45"));
    }
}
