//! # Events and visibility windows
//!
//! Output records of the engine:
//!
//! * [`Event`](crate::events::Event) – one refined, classified instant (extremum or threshold
//!   crossing) of the separation function.
//! * [`VisibilityWindow`](crate::events::VisibilityWindow) – a `[enter, exit]` interval built
//!   from consecutive crossing events.
//!
//! Both are created fresh per query and never mutated afterwards; the deduplicator
//! ([`dedup`](crate::events::dedup)) only replaces whole events.
//!
//! ## Event kinds
//!
//! | Kind | Meaning | Selected by |
//! |------|---------|-------------|
//! | [`EventKind::MaximumEast`] | greatest separation, target east of the reference | wrapped `lon_body − lon_ref > 0` |
//! | [`EventKind::MaximumWest`] | greatest separation, target west of the reference | wrapped `lon_body − lon_ref ≤ 0` |
//! | [`EventKind::MinimumInferior`] | least separation, target on the near side | illuminated fraction `< 0.5` |
//! | [`EventKind::MinimumSuperior`] | least separation, target on the far side | illuminated fraction `≥ 0.5` |
//! | [`EventKind::ThresholdEnter`] | separation drops below the threshold | sign change `+ → −` |
//! | [`EventKind::ThresholdExit`] | separation rises above the threshold | sign change `− → +` |

use std::fmt;

use hifitime::Epoch;

use crate::constants::Degree;

pub mod classifier;
pub mod dedup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MaximumEast,
    MaximumWest,
    MinimumInferior,
    MinimumSuperior,
    ThresholdEnter,
    ThresholdExit,
}

/// Broad category of an [`EventKind`]; deduplication only compares events of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Maximum,
    Minimum,
    Enter,
    Exit,
}

impl EventKind {
    pub fn category(&self) -> EventCategory {
        match self {
            EventKind::MaximumEast | EventKind::MaximumWest => EventCategory::Maximum,
            EventKind::MinimumInferior | EventKind::MinimumSuperior => EventCategory::Minimum,
            EventKind::ThresholdEnter => EventCategory::Enter,
            EventKind::ThresholdExit => EventCategory::Exit,
        }
    }

    pub fn is_maximum(&self) -> bool {
        self.category() == EventCategory::Maximum
    }

    pub fn is_minimum(&self) -> bool {
        self.category() == EventCategory::Minimum
    }

    pub fn is_crossing(&self) -> bool {
        matches!(self.category(), EventCategory::Enter | EventCategory::Exit)
    }

    /// Human-readable label, phrased for solar elongations.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::MaximumEast => "greatest eastern elongation",
            EventKind::MaximumWest => "greatest western elongation",
            EventKind::MinimumInferior => "inferior conjunction",
            EventKind::MinimumSuperior => "superior conjunction",
            EventKind::ThresholdEnter => "enters threshold",
            EventKind::ThresholdExit => "exits threshold",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One refined and classified event.
///
/// Units
/// -----
/// * `instant`: UTC epoch of the refined event.
/// * `magnitude_deg`: separation at the event, degrees.
/// * `illuminated_fraction`: unitless, `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub instant: Epoch,
    pub kind: EventKind,
    pub magnitude_deg: Degree,
    pub illuminated_fraction: f64,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:<28} sep = {:>8.4}°  k = {:.3}",
            self.instant, self.kind, self.magnitude_deg, self.illuminated_fraction
        )
    }
}

/// Interval during which the separation stays below a threshold.
///
/// `open_start` / `open_end` flag windows clipped by the scanned interval: the separation was
/// already below the threshold at the scan start, or still below it at the scan end, and the
/// corresponding bound is the scan bound rather than a crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityWindow {
    pub enter: Epoch,
    pub exit: Epoch,
    pub open_start: bool,
    pub open_end: bool,
}

impl VisibilityWindow {
    pub fn duration_days(&self) -> f64 {
        (self.exit - self.enter).to_seconds() / crate::constants::SECONDS_PER_DAY
    }

    /// True when `instant` lies within `[enter, exit]`.
    pub fn contains(&self, instant: Epoch) -> bool {
        self.enter <= instant && instant <= self.exit
    }
}

impl fmt::Display for VisibilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} → {}{}  ({:.2} d)",
            if self.open_start { "…" } else { "" },
            self.enter,
            self.exit,
            if self.open_end { "…" } else { "" },
            self.duration_days()
        )
    }
}

/// One below-threshold stretch bounded by its crossings.
///
/// `enter` is `None` when the function was already below the threshold at the scan start, and
/// `exit` is `None` when it is still below at the scan end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingPair {
    pub enter: Option<Event>,
    pub exit: Option<Event>,
}

impl CrossingPair {
    /// The crossing events of the pair, enter first.
    pub fn events(&self) -> impl Iterator<Item = Event> {
        self.enter.into_iter().chain(self.exit)
    }

    /// The window covered by the pair, with missing crossings clamped to `start` / `end`.
    pub fn window(&self, start: Epoch, end: Epoch) -> VisibilityWindow {
        VisibilityWindow {
            enter: self.enter.map_or(start, |e| e.instant),
            exit: self.exit.map_or(end, |e| e.instant),
            open_start: self.enter.is_none(),
            open_end: self.exit.is_none(),
        }
    }
}

/// Group time-ordered crossing events into enter/exit pairs.
///
/// Arguments
/// -----------------
/// * `crossings`: [`EventKind::ThresholdEnter`] / [`EventKind::ThresholdExit`] events sorted by
///   instant; other kinds are ignored.
/// * `below_at_start`: whether the scanned function was already below the threshold at the
///   scan start.
///
/// Return
/// ----------
/// * Pairs in time order. A leading exit (or a function below the threshold at the start)
///   yields a pair without `enter`; a trailing enter yields a pair without `exit`. Repeated
///   enters or exits keep the first enter and the first following exit.
pub fn pair_crossings(crossings: &[Event], below_at_start: bool) -> Vec<CrossingPair> {
    let mut pairs = Vec::new();
    let mut open: Option<Option<Event>> = below_at_start.then_some(None);

    for event in crossings.iter().filter(|e| e.kind.is_crossing()) {
        match (event.kind, open) {
            (EventKind::ThresholdEnter, None) => open = Some(Some(*event)),
            (EventKind::ThresholdExit, Some(enter)) => {
                pairs.push(CrossingPair {
                    enter,
                    exit: Some(*event),
                });
                open = None;
            }
            (EventKind::ThresholdExit, None) if pairs.is_empty() => {
                // Exit without any enter: the scan started inside a window
                pairs.push(CrossingPair {
                    enter: None,
                    exit: Some(*event),
                });
            }
            _ => {}
        }
    }

    if let Some(enter) = open {
        pairs.push(CrossingPair { enter, exit: None });
    }
    pairs
}

/// Windows of `pairs` over `[start, end]`, dropping the empty ones.
pub fn windows_from_pairs(pairs: &[CrossingPair], start: Epoch, end: Epoch) -> Vec<VisibilityWindow> {
    pairs
        .iter()
        .map(|pair| pair.window(start, end))
        .filter(|w| w.enter < w.exit)
        .collect()
}

/// Pair time-ordered crossing events into windows.
///
/// Arguments
/// -----------------
/// * `crossings`: crossing events sorted by instant, see [`pair_crossings`].
/// * `start`, `end`: scanned interval.
/// * `below_at_start`: whether the scanned function was already below the threshold at `start`.
///
/// Return
/// ----------
/// * Windows in increasing `enter` order, each with `enter < exit`. A window open at `start`
///   or `end` is clamped to it and flagged `open_start` / `open_end`.
pub fn pair_windows(
    crossings: &[Event],
    start: Epoch,
    end: Epoch,
    below_at_start: bool,
) -> Vec<VisibilityWindow> {
    windows_from_pairs(&pair_crossings(crossings, below_at_start), start, end)
}
