mod common;

use approx::assert_abs_diff_eq;
use common::*;
use hifitime::{Duration, TimeScale};
use sextant::{
    events::{
        dedup::{deduplicate, Dominance},
        EventKind,
    },
    search_params::SearchParams,
    sextant_errors::SextantError,
};

fn six_hours() -> Duration {
    Duration::from_hours(6.0)
}

fn two_days() -> Duration {
    Duration::from_days(2.0)
}

#[test]
fn test_extrema_of_sinusoid() {
    let engine = synthetic_engine();
    let events = engine
        .find_extrema(day(0.0), day(180.0), six_hours(), two_days())
        .unwrap();

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::MaximumEast,
            EventKind::MinimumInferior,
            EventKind::MaximumWest,
            EventKind::MinimumSuperior,
        ]
    );

    for (event, (expected_day, expected_sep)) in
        events.iter().zip([(22.5, 90.0), (67.5, 0.0), (112.5, 90.0), (157.5, 0.0)])
    {
        assert_day_close(event.instant, expected_day, 0.01);
        assert_abs_diff_eq!(event.magnitude_deg, expected_sep, epsilon = 1e-3);
    }

    assert!(events[1].illuminated_fraction < 0.01);
    assert!(events[3].illuminated_fraction > 0.99);
    assert!(events.windows(2).all(|w| w[0].instant <= w[1].instant));
}

#[test]
fn test_one_maximum_and_minimum_per_period() {
    let engine = synthetic_engine();
    let events = engine
        .find_extrema(day(0.0), day(360.0), six_hours(), two_days())
        .unwrap();
    let maxima = events.iter().filter(|e| e.kind.is_maximum()).count();
    let minima = events.iter().filter(|e| e.kind.is_minimum()).count();
    assert_eq!(maxima, 4);
    assert_eq!(minima, 4);
}

#[test]
fn test_extrema_output_is_already_deduplicated() {
    let engine = synthetic_engine();
    let events = engine
        .find_extrema(day(0.0), day(180.0), six_hours(), two_days())
        .unwrap();

    let maxima: Vec<_> = events.iter().copied().filter(|e| e.kind.is_maximum()).collect();
    let minima: Vec<_> = events.iter().copied().filter(|e| e.kind.is_minimum()).collect();
    let params = SearchParams::default();

    assert_eq!(
        deduplicate(&maxima, params.extremum_min_separation_seconds(), Dominance::Larger),
        maxima
    );
    assert_eq!(
        deduplicate(&minima, params.conjunction_min_separation_seconds(), Dominance::Smaller),
        minima
    );
}

#[test]
fn test_visibility_window_around_trough() {
    let engine = synthetic_engine();
    let windows = engine
        .find_crossings(day(0.0), day(180.0), 10.0, six_hours())
        .unwrap();

    assert_eq!(windows.len(), 2);
    assert!(windows.iter().all(|w| w.enter < w.exit));
    assert!(windows.windows(2).all(|w| w[0].enter <= w[1].enter));
    assert!(windows.iter().all(|w| !w.open_start && !w.open_end));

    let around_trough: Vec<_> = windows.iter().filter(|w| w.contains(day(67.5))).collect();
    assert_eq!(around_trough.len(), 1);

    let enter = first_crossing_day();
    assert_day_close(around_trough[0].enter, enter, 0.01);
    assert_day_close(around_trough[0].exit, 135.0 - enter, 0.01);
}

#[test]
fn test_threshold_events() {
    let engine = synthetic_engine();
    let events = engine
        .find_threshold_events(day(0.0), day(180.0), 10.0, six_hours())
        .unwrap();

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ThresholdEnter,
            EventKind::ThresholdExit,
            EventKind::ThresholdEnter,
            EventKind::ThresholdExit,
        ]
    );
    for event in &events {
        assert_abs_diff_eq!(event.magnitude_deg, 10.0, epsilon = 0.01);
    }
    assert_day_close(events[2].instant, first_crossing_day() + PERIOD_DAYS, 0.01);
}

#[test]
fn test_windows_clipped_by_interval() {
    let engine = synthetic_engine();

    // Separation stays below 10° from day 60 to day 70
    let inside = engine
        .find_crossings(day(60.0), day(70.0), 10.0, six_hours())
        .unwrap();
    assert_eq!(inside.len(), 1);
    assert!(inside[0].open_start && inside[0].open_end);
    assert_eq!(inside[0].enter, day(60.0));
    assert_eq!(inside[0].exit, day(70.0));

    // Starts inside the window, leaves it at ~day 77.24
    let leaving = engine
        .find_crossings(day(70.0), day(100.0), 10.0, six_hours())
        .unwrap();
    assert_eq!(leaving.len(), 1);
    assert!(leaving[0].open_start && !leaving[0].open_end);
    assert_day_close(leaving[0].exit, 135.0 - first_crossing_day(), 0.01);

    // Enters at ~day 57.76 and is still inside at the end
    let entering = engine
        .find_crossings(day(40.0), day(65.0), 10.0, six_hours())
        .unwrap();
    assert_eq!(entering.len(), 1);
    assert!(!entering[0].open_start && entering[0].open_end);
    assert_day_close(entering[0].enter, first_crossing_day(), 0.01);

    // Never below
    assert!(engine
        .find_crossings(day(0.0), day(180.0), -1.0, six_hours())
        .unwrap()
        .is_empty());
}

#[test]
fn test_long_crossing_separation_keeps_whole_windows() {
    // 100 days: the two enters (90 days apart) are duplicates, and so are the two exits
    let params = SearchParams::builder()
        .crossing_min_separation_hours(Some(2400.0))
        .build()
        .unwrap();
    let engine = engine_with(SinusoidOracle::new(origin()), params);

    let windows = engine
        .find_crossings(day(0.0), day(180.0), 10.0, six_hours())
        .unwrap();
    assert_eq!(windows.len(), 1);
    let window = windows[0];
    assert!(!window.open_start && !window.open_end);

    // One of the two true windows, whole: (57.76, 77.24) or (147.76, 167.24)
    let enter = first_crossing_day();
    let shift = if day_of(window.enter) < PERIOD_DAYS { 0.0 } else { PERIOD_DAYS };
    assert_day_close(window.enter, enter + shift, 0.01);
    assert_day_close(window.exit, 135.0 - enter + shift, 0.01);
    assert!(SinusoidOracle::analytic_separation(day_of(window.enter) + 1.0) < 10.0);

    let events = engine
        .find_threshold_events(day(0.0), day(180.0), 10.0, six_hours())
        .unwrap();
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::ThresholdEnter, EventKind::ThresholdExit]);
    assert_eq!(events[0].instant, window.enter);
    assert_eq!(events[1].instant, window.exit);
}

#[test]
fn test_retrograde_periods() {
    let engine = synthetic_engine();
    let periods = engine
        .find_retrograde_periods(day(0.0), day(180.0), six_hours())
        .unwrap();
    // Retrograde while the separation decreases: (22.5, 67.5) and (112.5, 157.5)
    assert_eq!(periods.len(), 2);
    assert_day_close(periods[0].enter, 22.5, 0.01);
    assert_day_close(periods[0].exit, 67.5, 0.01);
    assert_day_close(periods[1].enter, 112.5, 0.01);
    assert_day_close(periods[1].exit, 157.5, 0.01);
}

#[test]
fn test_state_ranges_and_bucket_equivalence() {
    let engine = synthetic_engine();
    for d in 0..180 {
        let t = day(d as f64 + 0.25);
        let state = engine.get_state(t).unwrap();
        assert!((0.0..=1.0).contains(&state.illuminated_fraction));
        assert!((0.0..=180.0).contains(&state.phase_angle_deg));

        // Same one-minute bucket
        let later = engine.get_state(t + Duration::from_seconds(45.0)).unwrap();
        assert_eq!(state, later);
    }
    assert_eq!(engine.cache_stats().entries, 180);
}

#[test]
fn test_cache_amortizes_repeated_scans() {
    let engine = synthetic_engine();
    let first = engine
        .find_extrema(day(0.0), day(90.0), six_hours(), two_days())
        .unwrap();
    let calls = engine.oracle().calls();
    let misses = engine.cache_stats().misses;

    let second = engine
        .find_extrema(day(0.0), day(90.0), six_hours(), two_days())
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.oracle().calls(), calls);
    assert_eq!(engine.cache_stats().misses, misses);
    assert!(engine.cache_stats().hits > 0);

    engine.clear_cache();
    assert_eq!(engine.cache_stats().entries, 0);
}

#[test]
fn test_coarse_buckets_bound_precision() {
    let params = SearchParams::builder()
        .bucket_width_minutes(360.0)
        .build()
        .unwrap();
    let engine = engine_with(SinusoidOracle::new(origin()), params);
    let events = engine
        .find_extrema(day(0.0), day(90.0), six_hours(), two_days())
        .unwrap();
    assert_eq!(events.len(), 2);
    // Six-hour buckets: precision is a couple of buckets, not minutes
    assert_day_close(events[0].instant, 22.5, 0.5);
    assert_day_close(events[1].instant, 67.5, 0.5);
    assert!(events[0].magnitude_deg > 89.9);
}

#[test]
fn test_time_scale_normalization() {
    let engine = synthetic_engine();
    let utc = engine
        .find_extrema(day(0.0), day(90.0), six_hours(), two_days())
        .unwrap();
    let tai = engine
        .find_extrema(
            day(0.0).to_time_scale(TimeScale::TAI),
            day(90.0).to_time_scale(TimeScale::TT),
            six_hours(),
            two_days(),
        )
        .unwrap();

    assert_eq!(utc.len(), tai.len());
    for (a, b) in utc.iter().zip(&tai) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(b.instant.time_scale, TimeScale::UTC);
        assert_epoch_close(b.instant, a.instant, 1e-6);
    }
}

#[test]
fn test_degenerate_inputs() {
    let engine = synthetic_engine();
    assert!(matches!(
        engine.find_extrema(day(10.0), day(5.0), six_hours(), two_days()),
        Err(SextantError::DegenerateInterval { .. })
    ));
    assert!(matches!(
        engine.find_threshold_events(day(10.0), day(10.0), 10.0, six_hours()),
        Err(SextantError::DegenerateInterval { .. })
    ));
    assert!(matches!(
        engine.find_crossings(day(0.0), day(10.0), 10.0, Duration::ZERO),
        Err(SextantError::InvalidStep(_))
    ));
    assert!(matches!(
        engine.find_extrema(day(0.0), day(10.0), six_hours(), Duration::ZERO),
        Err(SextantError::InvalidRefineWindow(_))
    ));
    assert_eq!(engine.oracle().calls(), 0);
}

#[test]
fn test_oracle_failure_is_propagated() {
    let engine = engine_with(
        SinusoidOracle::failing_after(origin(), 100.0),
        SearchParams::default(),
    );
    assert!(engine.get_state(day(50.0)).is_ok());

    let err = engine
        .find_extrema(day(0.0), day(180.0), six_hours(), two_days())
        .unwrap_err();
    assert!(matches!(err, SextantError::OracleFailure { .. }));

    let err = engine
        .find_crossings(day(0.0), day(180.0), 10.0, six_hours())
        .unwrap_err();
    assert!(matches!(err, SextantError::OracleFailure { .. }));

    // Nothing is cached past the failure
    assert!(engine.get_state(day(150.0)).is_err());
}

#[test]
fn test_shared_engine_across_threads() {
    let engine = synthetic_engine();
    let reference = synthetic_engine()
        .find_extrema(day(0.0), day(180.0), six_hours(), two_days())
        .unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    engine
                        .find_extrema(day(0.0), day(180.0), six_hours(), two_days())
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), reference);
        }
    });
}
