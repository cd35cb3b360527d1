//! Filter, sort and truncate a snapshot into the list that gets displayed.

use serde::{Deserialize, Serialize};

use crate::event::{CategoryId, Event};

/// How long an event stays visible after its scheduled start.
pub const GRACE_PERIOD_SECS: i64 = 60;

/// Maximum number of events on screen.
pub const MAX_DISPLAY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    pub grace_period_secs: i64,
    pub max_display: usize,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            grace_period_secs: GRACE_PERIOD_SECS,
            max_display: MAX_DISPLAY,
        }
    }
}

impl WindowPolicy {
    /// Visible subset of `snapshot` at `now`: matching `filter`, not older
    /// than the grace period, soonest first, at most `max_display` long.
    ///
    /// Ties on start time keep snapshot order.
    pub fn apply(&self, snapshot: &[Event], filter: Option<&CategoryId>, now: i64) -> Vec<Event> {
        let mut visible: Vec<Event> = snapshot
            .iter()
            .filter(|event| event.matches(filter))
            .filter(|event| event.is_live(now, self.grace_period_secs))
            .cloned()
            .collect();
        visible.sort_by_key(|event| event.scheduled_start);
        visible.truncate(self.max_display);
        visible
    }

    /// Drop entries that aged out of the grace period. Never reorders.
    pub fn prune(&self, events: &mut Vec<Event>, now: i64) -> bool {
        let before = events.len();
        events.retain(|event| event.is_live(now, self.grace_period_secs));
        events.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, GREYHOUND, HARNESS, HORSE};

    const NOW: i64 = 1_700_000_000;

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_two_upcoming_events_sorted() {
        let snapshot = vec![
            testing::event("later", NOW + 20, HORSE),
            testing::event("sooner", NOW + 10, GREYHOUND),
        ];
        let visible = WindowPolicy::default().apply(&snapshot, None, NOW);
        assert_eq!(ids(&visible), vec!["sooner", "later"]);
        assert_eq!(visible[0].scheduled_start, NOW + 10);
        assert_eq!(visible[1].scheduled_start, NOW + 20);
    }

    #[test]
    fn test_event_past_grace_period_excluded() {
        let snapshot = vec![testing::event("old", NOW - 70, HORSE)];
        assert!(WindowPolicy::default().apply(&snapshot, None, NOW).is_empty());
    }

    #[test]
    fn test_event_within_grace_period_included() {
        let snapshot = vec![testing::event("recent", NOW - 30, HORSE)];
        let visible = WindowPolicy::default().apply(&snapshot, None, NOW);
        assert_eq!(ids(&visible), vec!["recent"]);
    }

    #[test]
    fn test_grace_boundary_is_exclusive() {
        let snapshot = vec![
            testing::event("edge", NOW - 60, HORSE),
            testing::event("inside", NOW - 59, HORSE),
        ];
        let visible = WindowPolicy::default().apply(&snapshot, None, NOW);
        assert_eq!(ids(&visible), vec!["inside"]);
    }

    #[test]
    fn test_truncates_to_five_soonest() {
        let snapshot: Vec<Event> = [70, 10, 60, 20, 50, 30, 40]
            .iter()
            .map(|offset| testing::event(&format!("r{offset}"), NOW + offset, HORSE))
            .collect();
        let visible = WindowPolicy::default().apply(&snapshot, Some(&HORSE.into()), NOW);
        assert_eq!(ids(&visible), vec!["r10", "r20", "r30", "r40", "r50"]);
    }

    #[test]
    fn test_filter_keeps_only_matching_category() {
        let snapshot = vec![
            testing::event("h", NOW + 5, HORSE),
            testing::event("g", NOW + 1, GREYHOUND),
            testing::event("n", NOW + 3, HARNESS),
        ];
        let visible = WindowPolicy::default().apply(&snapshot, Some(&GREYHOUND.into()), NOW);
        assert_eq!(ids(&visible), vec!["g"]);
    }

    #[test]
    fn test_far_future_events_kept() {
        let snapshot = vec![testing::event("far", NOW + 86_400 * 30, HORSE)];
        assert_eq!(WindowPolicy::default().apply(&snapshot, None, NOW).len(), 1);
    }

    #[test]
    fn test_start_near_i64_max_is_kept_and_pruned_safely() {
        let policy = WindowPolicy::default();
        let snapshot = vec![
            testing::event("max", i64::MAX - 5, HORSE),
            testing::event("soon", NOW + 5, HORSE),
        ];
        let visible = policy.apply(&snapshot, None, NOW);
        assert_eq!(ids(&visible), vec!["soon", "max"]);

        let mut events = visible;
        assert!(!policy.prune(&mut events, NOW));
        assert!(policy.prune(&mut events, i64::MAX));
        assert!(events.is_empty());
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let snapshot = vec![
            testing::event("first", NOW + 10, HORSE),
            testing::event("second", NOW + 10, HORSE),
            testing::event("third", NOW + 10, HORSE),
        ];
        let visible = WindowPolicy::default().apply(&snapshot, None, NOW);
        assert_eq!(ids(&visible), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_output_invariants_over_mixed_snapshots() {
        let categories = [HORSE, GREYHOUND, HARNESS];
        let policy = WindowPolicy::default();
        // Deterministic spread of offsets from well past to well ahead.
        for seed in 0..50i64 {
            let snapshot: Vec<Event> = (0..12i64)
                .map(|i| {
                    let offset = ((seed * 37 + i * 53) % 400) - 150;
                    let category = categories[((seed + i) % 3) as usize];
                    testing::event(&format!("s{seed}-{i}"), NOW + offset, category)
                })
                .collect();

            for filter in [None, Some(CategoryId::from(HORSE)), Some(CategoryId::from(HARNESS))] {
                let visible = policy.apply(&snapshot, filter.as_ref(), NOW);
                assert!(visible.len() <= MAX_DISPLAY);
                assert!(visible.windows(2).all(|w| w[0].scheduled_start <= w[1].scheduled_start));
                assert!(visible.iter().all(|e| e.matches(filter.as_ref())));
                assert!(visible.iter().all(|e| e.scheduled_start + 60 > NOW));
                assert_eq!(visible, policy.apply(&snapshot, filter.as_ref(), NOW));
            }
        }
    }

    #[test]
    fn test_custom_policy() {
        let policy = WindowPolicy {
            grace_period_secs: 0,
            max_display: 1,
        };
        let snapshot = vec![
            testing::event("started", NOW, HORSE),
            testing::event("a", NOW + 2, HORSE),
            testing::event("b", NOW + 1, HORSE),
        ];
        assert_eq!(ids(&policy.apply(&snapshot, None, NOW)), vec!["b"]);
    }

    #[test]
    fn test_prune_removes_only_expired() {
        let policy = WindowPolicy::default();
        let mut events = vec![
            testing::event("a", NOW - 61, HORSE),
            testing::event("b", NOW + 10, HORSE),
            testing::event("c", NOW - 60, HORSE),
            testing::event("d", NOW - 5, HORSE),
        ];
        assert!(policy.prune(&mut events, NOW));
        assert_eq!(ids(&events), vec!["b", "d"]);
        assert!(!policy.prune(&mut events, NOW));
    }
}
