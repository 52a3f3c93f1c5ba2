use crate::{
    derived_state::DerivedState,
    events::{Event, EventKind},
    search::SearchDirection,
};

/// Illuminated fraction separating inferior (near side) from superior (far side) minima.
pub const HALF_ILLUMINATED: f64 = 0.5;

/// Label a refined extremum.
///
/// * A maximum is [`EventKind::MaximumEast`] when the wrapped longitude difference
///   `((lon_body − lon_ref + 180) mod 360) − 180` is strictly positive, [`EventKind::MaximumWest`]
///   otherwise.
/// * A minimum is [`EventKind::MinimumInferior`] when the illuminated fraction is strictly below
///   `0.5`, [`EventKind::MinimumSuperior`] otherwise.
pub fn classify_extremum(direction: SearchDirection, state: &DerivedState) -> EventKind {
    match direction {
        SearchDirection::Maximize => {
            if state.longitude_difference_deg() > 0.0 {
                EventKind::MaximumEast
            } else {
                EventKind::MaximumWest
            }
        }
        SearchDirection::Minimize => {
            if state.illuminated_fraction < HALF_ILLUMINATED {
                EventKind::MinimumInferior
            } else {
                EventKind::MinimumSuperior
            }
        }
    }
}

/// Label a threshold crossing: `falling` means the separation drops below the threshold.
pub fn classify_crossing(falling: bool) -> EventKind {
    if falling {
        EventKind::ThresholdEnter
    } else {
        EventKind::ThresholdExit
    }
}

/// Build the [`Event`] reported for `state`, stamped at the refined `instant`.
pub fn event_from_state(kind: EventKind, instant: hifitime::Epoch, state: &DerivedState) -> Event {
    Event {
        instant,
        kind,
        magnitude_deg: state.separation_deg,
        illuminated_fraction: state.illuminated_fraction,
    }
}
