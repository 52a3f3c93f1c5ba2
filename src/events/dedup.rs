//! # Deduplication
//!
//! Coarse sampling may hand the refiners two candidates that converge on the same physical
//! event (for instance a flat peak sampled twice). [`deduplicate`] merges such near-duplicates
//! with a **single left-to-right pass**: each event is compared only with the last *kept*
//! event, never with the whole cluster. With three or more near-duplicates this greedy rule can
//! keep a different event than a global "strongest in cluster" selection would, and this
//! behaviour is relied upon.
//!
//! The output is idempotent: consecutive kept events are always at least `min_separation` apart,
//! so a second pass merges nothing.

use crate::{constants::Degree, events::Event, time::seconds_since};

/// Which of two near-duplicate events is the stronger one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dominance {
    /// Larger separation wins (maxima).
    Larger,
    /// Smaller separation wins (minima, conjunctions).
    Smaller,
    /// Separation closer to the given threshold wins (threshold crossings).
    ClosestTo(Degree),
}

impl Dominance {
    /// True when `candidate` is **strictly** stronger than `kept`.
    pub fn is_stronger(&self, candidate: &Event, kept: &Event) -> bool {
        match self {
            Dominance::Larger => candidate.magnitude_deg > kept.magnitude_deg,
            Dominance::Smaller => candidate.magnitude_deg < kept.magnitude_deg,
            Dominance::ClosestTo(threshold) => {
                (candidate.magnitude_deg - threshold).abs() < (kept.magnitude_deg - threshold).abs()
            }
        }
    }
}

/// Merge near-duplicate events of one category.
///
/// Arguments
/// -----------------
/// * `events`: time-ordered events of a single category (all maxima, all minima, or all
///   crossings of one direction).
/// * `min_separation_seconds`: an event closer than this to the last kept event is a duplicate.
/// * `dominance`: rule deciding whether a duplicate replaces the kept event.
///
/// Return
/// ----------
/// * The kept events, still in time order. A duplicate replaces the last kept event only when
///   it is strictly stronger; otherwise it is dropped.
///
/// See also
/// ------------
/// * [`deduplicate_by`] – Same pass over records carrying an event.
pub fn deduplicate(events: &[Event], min_separation_seconds: f64, dominance: Dominance) -> Vec<Event> {
    deduplicate_by(events, |event| Some(event), min_separation_seconds, dominance)
}

/// Merge near-duplicate records, compared through the event each one carries.
///
/// This is the pass of [`deduplicate`] applied to whole records: a duplicate replaces or is
/// dropped together with everything it carries. Records for which `key` returns `None` are
/// kept as they are and never compared; they may only appear before the first or after the
/// last keyed record.
///
/// Arguments
/// -----------------
/// * `items`: records in time order of their keyed events.
/// * `key`: the event a record is compared by.
/// * `min_separation_seconds`, `dominance`: as in [`deduplicate`].
pub fn deduplicate_by<T, F>(
    items: &[T],
    key: F,
    min_separation_seconds: f64,
    dominance: Dominance,
) -> Vec<T>
where
    T: Copy,
    F: Fn(&T) -> Option<&Event>,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut last_keyed: Option<usize> = None;

    for item in items {
        let Some(event) = key(item) else {
            kept.push(*item);
            continue;
        };
        let duplicate_of = last_keyed.filter(|&index| {
            key(&kept[index]).is_some_and(|last| {
                seconds_since(last.instant, event.instant).abs() < min_separation_seconds
            })
        });
        match duplicate_of {
            None => {
                last_keyed = Some(kept.len());
                kept.push(*item);
            }
            Some(index) => {
                if key(&kept[index]).is_some_and(|last| dominance.is_stronger(event, last)) {
                    kept[index] = *item;
                }
            }
        }
    }

    kept
}
