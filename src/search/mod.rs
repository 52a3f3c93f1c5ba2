//! # One-dimensional refiners
//!
//! Fixed-budget numerical routines used by the event scanner to refine a coarse candidate to
//! sub-step precision:
//!
//! * [`golden_section`](crate::search::golden_section) – extremum of a unimodal function on a
//!   bracket (maximize or minimize).
//! * [`bisection`](crate::search::bisection) – instant where a function crosses a threshold,
//!   given a bracketing pair of samples.
//!
//! Both routines work on a plain `f64` abscissa (the scanner uses seconds from the scan start)
//! and take a fallible objective `FnMut(f64) -> Result<f64, E>`, so oracle failures raised
//! while probing are propagated as-is. They run a **fixed** number of iterations rather than
//! testing a tolerance; see [`GOLDEN_SECTION_ITERATIONS`](crate::constants::GOLDEN_SECTION_ITERATIONS)
//! and [`BISECTION_ITERATIONS`](crate::constants::BISECTION_ITERATIONS) for the precision they
//! yield on brackets of a few days.

pub mod bisection;
pub mod golden_section;

pub use bisection::{bisect_crossing, Crossing};
pub use golden_section::{golden_section_search, Extremum, SearchDirection};
