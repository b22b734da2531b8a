use std::collections::HashMap;
use std::sync::Mutex;

/// Tracks the previous `risk_score` scored for each `(state, lga)` so the
/// poller can flag a sudden jump between one scoring and the next. Process-
/// local and single-writer: the risk poller is the only task that calls
/// [`SurgeTracker::observe`], so an uncontended `Mutex` is enough.
#[derive(Default)]
pub struct SurgeTracker {
    previous: Mutex<HashMap<(String, String), f64>>,
}

/// Result of comparing a freshly scored `risk_score` against the last one
/// recorded for the same `(state, lga)`. `percentage_increase` is always
/// `None` on the first scoring for a place — there's nothing to compare
/// against yet.
pub struct SurgeObservation {
    pub surge_detected: bool,
    pub percentage_increase: Option<f64>,
}

impl SurgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `current` against the last score seen for `(state, lga)`,
    /// then unconditionally overwrite it with `current` — the map always
    /// reflects the most recent scoring, surge or not.
    pub fn observe(&self, state: &str, lga: &str, current: f64, threshold_pct: f64) -> SurgeObservation {
        let key = (state.to_string(), lga.to_string());
        let mut previous = self.previous.lock().unwrap();

        let observation = match previous.get(&key) {
            Some(&last) if last > 0.0 => {
                let pct = (current - last) / last * 100.0;
                SurgeObservation {
                    surge_detected: pct > threshold_pct,
                    percentage_increase: Some(pct),
                }
            }
            _ => SurgeObservation {
                surge_detected: false,
                percentage_increase: None,
            },
        };

        previous.insert(key, current);
        observation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_never_surges() {
        let tracker = SurgeTracker::new();
        let obs = tracker.observe("Lagos", "Ikeja", 50.0, 20.0);
        assert!(!obs.surge_detected);
        assert!(obs.percentage_increase.is_none());
    }

    #[test]
    fn jump_past_threshold_flags_a_surge() {
        let tracker = SurgeTracker::new();
        tracker.observe("Lagos", "Ikeja", 50.0, 20.0);
        let obs = tracker.observe("Lagos", "Ikeja", 65.0, 20.0);
        assert!(obs.surge_detected);
        assert!((obs.percentage_increase.unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn jump_under_threshold_does_not_surge() {
        let tracker = SurgeTracker::new();
        tracker.observe("Lagos", "Ikeja", 50.0, 20.0);
        let obs = tracker.observe("Lagos", "Ikeja", 55.0, 20.0);
        assert!(!obs.surge_detected);
    }

    #[test]
    fn distinct_places_are_tracked_independently() {
        let tracker = SurgeTracker::new();
        tracker.observe("Lagos", "Ikeja", 90.0, 20.0);
        let obs = tracker.observe("Benue", "Makurdi", 10.0, 20.0);
        assert!(!obs.surge_detected);
        assert!(obs.percentage_increase.is_none());
    }

    #[test]
    fn map_updates_even_when_no_surge_fires() {
        let tracker = SurgeTracker::new();
        tracker.observe("Lagos", "Ikeja", 50.0, 20.0);
        tracker.observe("Lagos", "Ikeja", 52.0, 20.0);
        let obs = tracker.observe("Lagos", "Ikeja", 54.0, 20.0);
        assert!((obs.percentage_increase.unwrap() - (2.0 / 52.0 * 100.0)).abs() < 1e-9);
    }
}
