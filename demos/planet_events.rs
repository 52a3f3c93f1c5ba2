use std::env;

use hifitime::{Duration, Epoch};
use sextant::{
    derived_state::DerivedBodies,
    ephemeris::{keplerian_oracle::KeplerianOracle, Body},
    search_params::SearchParams,
    sextant::Sextant,
    sextant_errors::SextantError,
    time::parse_utc,
};

/// Print the elongation events, visibility windows and retrograde periods of `target`.
///
/// Arguments
/// -----------------
/// * `target`: inner or outer planet seen from the Earth.
/// * `start`, `end`: UTC interval of the report.
/// * `params`: engine configuration.
/// * `threshold`: separation (degrees) below which the planet is lost in the Sun's glare.
fn report(
    target: Body,
    start: Epoch,
    end: Epoch,
    params: &SearchParams,
    threshold: f64,
) -> Result<(), SextantError> {
    let engine = Sextant::new(
        KeplerianOracle::new(),
        DerivedBodies::solar_elongation(target),
        params.clone(),
    )?;
    let step = Duration::from_hours(6.0);

    println!("== {target} ==");
    for event in engine.find_extrema(start, end, step, Duration::from_days(2.0))? {
        println!("  {event}");
    }

    println!("  below {threshold}° from the Sun:");
    for window in engine.find_crossings(start, end, threshold, step)? {
        println!("    {window}");
    }

    println!("  retrograde:");
    for period in engine.find_retrograde_periods(start, end, Duration::from_days(1.0))? {
        println!("    {period}");
    }

    let stats = engine.cache_stats();
    println!(
        "  cache: {} states, {} hits, {} misses\n",
        stats.entries, stats.hits, stats.misses
    );
    Ok(())
}

/// Usage:
///   planet_events [START] [END] [CONFIG.toml]
/// Example:
///   cargo run --example planet_events -- 2025-01-01T00:00:00 2026-01-01T00:00:00
fn main() -> Result<(), SextantError> {
    let args: Vec<String> = env::args().collect();
    let start = parse_utc(args.get(1).map_or("2025-01-01T00:00:00", String::as_str))?;
    let end = parse_utc(args.get(2).map_or("2026-01-01T00:00:00", String::as_str))?;
    let params = match args.get(3) {
        Some(path) => SearchParams::from_toml_file(path)?,
        None => SearchParams::default(),
    };

    println!("{params:#}");
    for target in [Body::Mercury, Body::Venus] {
        report(target, start, end, &params, 10.0)?;
    }
    Ok(())
}
