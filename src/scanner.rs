//! # Event scanner
//!
//! Coarse fixed-step walk of a scalar function over `[0, span]` (seconds from the scan start),
//! followed by sub-step refinement of every candidate.
//!
//! ## Sampling
//!
//! [`sample_grid`] places samples at `0, step, 2·step, …` and always closes the grid exactly on
//! `span`, so the last interval may be shorter than `step`.
//!
//! ## Candidates
//!
//! Over each triple of consecutive samples `(t0, f0), (t1, f1), (t2, f2)`:
//!
//! * `f1 > f0 && f1 > f2` → [`Candidate::Peak`] at `t1`,
//! * `f1 < f0 && f1 < f2` → [`Candidate::Trough`] at `t1`.
//!
//! Comparisons are strict: a plateau of two equal samples is not a candidate.
//! Each candidate is refined by golden-section search over `[t1 − W, t1 + W] ∩ [0, span]`.
//!
//! Threshold crossings are detected on `g(t) = f(t) − threshold` between adjacent samples
//! whose "below" state (`g < 0`) differs, and refined by bisection over that pair.
//!
//! Both scans are generic over the objective, so the façade feeds them the cached separation
//! while tests can feed them a closed-form function.

use itertools::Itertools;

use crate::search::{
    bisect_crossing, golden_section_search, Crossing, Extremum, SearchDirection,
};

/// One sample of the scanned function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub value: f64,
}

/// Local pattern found in three consecutive samples, located at the middle sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    Peak(f64),
    Trough(f64),
}

impl Candidate {
    pub fn center(&self) -> f64 {
        match self {
            Candidate::Peak(t) | Candidate::Trough(t) => *t,
        }
    }

    pub fn direction(&self) -> SearchDirection {
        match self {
            Candidate::Peak(_) => SearchDirection::Maximize,
            Candidate::Trough(_) => SearchDirection::Minimize,
        }
    }
}

/// Pair of adjacent samples on both sides of the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignChange {
    pub before: Sample,
    pub after: Sample,
    /// `true` when the function goes from `≥ threshold` to `< threshold`.
    pub falling: bool,
}

/// Refined extremum, tagged with the search direction that found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedExtremum {
    pub direction: SearchDirection,
    pub extremum: Extremum,
}

/// Refined threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedCrossing {
    pub falling: bool,
    pub crossing: Crossing,
}

/// Result of a crossing scan.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingScan {
    pub crossings: Vec<RefinedCrossing>,
    /// The first sample was below the threshold.
    pub below_at_start: bool,
}

/// Sample abscissae `0, step, 2·step, …, span`.
///
/// Arguments
/// -----------------
/// * `span`: length of the scanned interval (`> 0`).
/// * `step`: sampling step (`> 0`).
///
/// Return
/// ----------
/// * Increasing abscissae, starting at `0` and ending exactly at `span`. An intermediate sample
///   lying within `1e-6·step` of `span` is merged into the final one.
pub fn sample_grid(span: f64, step: f64) -> Vec<f64> {
    let n = (span / step).ceil().max(1.0) as usize;
    let mut grid: Vec<f64> = (0..n)
        .map(|k| k as f64 * step)
        .take_while(|t| span - t > 1e-6 * step)
        .collect();
    grid.push(span);
    grid
}

/// Evaluate `f` on every abscissa of `grid`, stopping at the first error.
pub fn sample_function<F, E>(mut f: F, grid: &[f64]) -> Result<Vec<Sample>, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    grid.iter()
        .map(|&t| f(t).map(|value| Sample { t, value }))
        .collect()
}

/// Peaks and troughs over consecutive sample triples, in time order.
pub fn find_candidates(samples: &[Sample]) -> Vec<Candidate> {
    samples
        .iter()
        .tuple_windows()
        .filter_map(|(s0, s1, s2)| {
            if s1.value > s0.value && s1.value > s2.value {
                Some(Candidate::Peak(s1.t))
            } else if s1.value < s0.value && s1.value < s2.value {
                Some(Candidate::Trough(s1.t))
            } else {
                None
            }
        })
        .collect()
}

/// Adjacent sample pairs whose below-threshold state differs, in time order.
pub fn find_sign_changes(samples: &[Sample], threshold: f64) -> Vec<SignChange> {
    samples
        .iter()
        .tuple_windows()
        .filter_map(|(before, after)| {
            let below_before = before.value - threshold < 0.0;
            let below_after = after.value - threshold < 0.0;
            (below_before != below_after).then_some(SignChange {
                before: *before,
                after: *after,
                falling: below_after,
            })
        })
        .collect()
}

/// Refinement bracket `[center − half_window, center + half_window]` clamped to `[0, span]`.
pub fn refine_window(center: f64, half_window: f64, span: f64) -> (f64, f64) {
    ((center - half_window).max(0.0), (center + half_window).min(span))
}

/// Scan `f` for local extrema and refine each of them.
///
/// Arguments
/// -----------------
/// * `f`: scanned function of the offset in seconds; errors abort the scan.
/// * `span`, `step`: scanned interval length and sampling step, in seconds.
/// * `half_window`: refinement half-window `W`, in seconds.
/// * `iterations`: golden-section budget.
///
/// Return
/// ----------
/// * Refined maxima and minima in the order their candidates were found.
pub fn scan_extrema<F, E>(
    mut f: F,
    span: f64,
    step: f64,
    half_window: f64,
    iterations: u32,
) -> Result<Vec<RefinedExtremum>, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let grid = sample_grid(span, step);
    let samples = sample_function(&mut f, &grid)?;
    let candidates = find_candidates(&samples);
    log::debug!(
        "extrema scan: {} samples, {} candidates",
        samples.len(),
        candidates.len()
    );

    candidates
        .into_iter()
        .map(|candidate| -> Result<RefinedExtremum, E> {
            let (lo, hi) = refine_window(candidate.center(), half_window, span);
            let extremum = golden_section_search(&mut f, lo, hi, candidate.direction(), iterations)?;
            log::trace!(
                "{candidate:?} refined to t = {:.3} s, value = {:.6}",
                extremum.x,
                extremum.value
            );
            Ok(RefinedExtremum {
                direction: candidate.direction(),
                extremum,
            })
        })
        .collect()
}

/// Scan `f` for crossings of `threshold` and refine each of them.
///
/// Arguments
/// -----------------
/// * `f`: scanned function of the offset in seconds; errors abort the scan.
/// * `span`, `step`: scanned interval length and sampling step, in seconds.
/// * `threshold`: crossing level.
/// * `iterations`: bisection budget.
///
/// Return
/// ----------
/// * The refined crossings in time order, and whether the function started below the threshold.
pub fn scan_crossings<F, E>(
    mut f: F,
    span: f64,
    step: f64,
    threshold: f64,
    iterations: u32,
) -> Result<CrossingScan, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let grid = sample_grid(span, step);
    let samples = sample_function(&mut f, &grid)?;
    let changes = find_sign_changes(&samples, threshold);
    let below_at_start = samples
        .first()
        .is_some_and(|s| s.value - threshold < 0.0);
    log::debug!(
        "crossing scan: {} samples, {} sign changes, below at start: {below_at_start}",
        samples.len(),
        changes.len()
    );

    let crossings = changes
        .into_iter()
        .map(|change| -> Result<RefinedCrossing, E> {
            let crossing = bisect_crossing(
                &mut f,
                change.before.t,
                change.after.t,
                threshold,
                iterations,
            )?;
            log::trace!(
                "{} crossing refined to t = {:.3} s, residual = {:.3e}",
                if change.falling { "falling" } else { "rising" },
                crossing.x,
                crossing.residual
            );
            Ok(RefinedCrossing {
                falling: change.falling,
                crossing,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CrossingScan {
        crossings,
        below_at_start,
    })
}
