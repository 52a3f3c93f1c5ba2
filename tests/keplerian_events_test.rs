mod common;

use common::assert_epoch_close;
use hifitime::{Duration, Epoch};
use sextant::{
    derived_state::DerivedBodies,
    ephemeris::{keplerian_oracle::KeplerianOracle, Body},
    events::EventKind,
    search_params::SearchParams,
    sextant::Sextant,
};

fn engine(target: Body) -> Sextant<KeplerianOracle> {
    Sextant::new(
        KeplerianOracle::new(),
        DerivedBodies::solar_elongation(target),
        SearchParams::default(),
    )
    .unwrap()
}

fn year_2025() -> (Epoch, Epoch) {
    (
        Epoch::from_gregorian_utc_at_midnight(2025, 1, 1),
        Epoch::from_gregorian_utc_at_midnight(2026, 1, 1),
    )
}

#[test]
fn test_venus_2025_elongations() {
    let (start, end) = year_2025();
    let events = engine(Body::Venus)
        .find_extrema(start, end, Duration::from_hours(6.0), Duration::from_days(2.0))
        .unwrap();

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::MaximumEast,
            EventKind::MinimumInferior,
            EventKind::MaximumWest
        ]
    );

    // Greatest eastern elongation, 2025-01-10, 47.2°
    assert_epoch_close(
        events[0].instant,
        Epoch::from_gregorian_utc_at_midnight(2025, 1, 10),
        2.0,
    );
    assert!((events[0].magnitude_deg - 47.2).abs() < 0.5);

    // Inferior conjunction, 2025-03-23, passing ~8° north of the Sun
    assert_epoch_close(
        events[1].instant,
        Epoch::from_gregorian_utc_at_midnight(2025, 3, 23),
        2.0,
    );
    assert!(events[1].magnitude_deg > 6.0 && events[1].magnitude_deg < 10.5);
    assert!(events[1].illuminated_fraction < 0.05);

    // Greatest western elongation, 2025-06-01, 45.9°
    assert_epoch_close(
        events[2].instant,
        Epoch::from_gregorian_utc_at_midnight(2025, 6, 1),
        2.0,
    );
    assert!((events[2].magnitude_deg - 45.9).abs() < 0.5);
}

#[test]
fn test_mercury_2025_alternation() {
    let (start, end) = year_2025();
    let events = engine(Body::Mercury)
        .find_extrema(start, end, Duration::from_hours(6.0), Duration::from_days(2.0))
        .unwrap();

    assert_eq!(events.len(), 12);
    // Extrema alternate, starting with the superior conjunction of February
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.kind.is_minimum(), i % 2 == 0, "{event}");
    }

    let maxima: Vec<EventKind> = events
        .iter()
        .filter(|e| e.kind.is_maximum())
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        maxima,
        [EventKind::MaximumEast, EventKind::MaximumWest].repeat(3)
    );

    let minima: Vec<EventKind> = events
        .iter()
        .filter(|e| e.kind.is_minimum())
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        minima,
        [EventKind::MinimumSuperior, EventKind::MinimumInferior].repeat(3)
    );

    // Greatest western elongation, 2025-04-21, 27.4°
    assert_epoch_close(
        events[3].instant,
        Epoch::from_gregorian_utc_hms(2025, 4, 21, 12, 0, 0),
        2.0,
    );
    assert!((events[3].magnitude_deg - 27.4).abs() < 0.5);
}

#[test]
fn test_venus_2025_visibility_windows() {
    let (start, end) = year_2025();
    let windows = engine(Body::Venus)
        .find_crossings(start, end, 15.0, Duration::from_hours(6.0))
        .unwrap();

    // Around the inferior conjunction, then approaching the January 2026 superior conjunction
    assert_eq!(windows.len(), 2);
    let conjunction = windows[0];
    assert!(!conjunction.open_start && !conjunction.open_end);
    assert!(conjunction.contains(Epoch::from_gregorian_utc_at_midnight(2025, 3, 23)));
    assert_epoch_close(
        conjunction.enter,
        Epoch::from_gregorian_utc_at_midnight(2025, 3, 15),
        2.0,
    );
    assert_epoch_close(
        conjunction.exit,
        Epoch::from_gregorian_utc_at_midnight(2025, 3, 31),
        2.0,
    );

    assert!(!windows[1].open_start && windows[1].open_end);
    assert_eq!(windows[1].exit, end);
}

#[test]
fn test_states_over_a_year() {
    let (start, _) = year_2025();
    for target in [Body::Mercury, Body::Venus, Body::Mars, Body::Jupiter] {
        let engine = engine(target);
        for day in (0..365).step_by(7) {
            let state = engine
                .get_state(start + Duration::from_days(day as f64))
                .unwrap();
            assert!((0.0..=1.0).contains(&state.illuminated_fraction));
            assert!((0.0..=180.0).contains(&state.phase_angle_deg));
            assert!((0.0..=180.0).contains(&state.separation_deg));
        }
    }
}
