use crate::panel::constants::TRAIL_MARGIN;
use std::time::{Duration, Instant};
use tracing::debug;

/// Right bound of the bounce track for a given container width
pub fn end_x_for(container_width: f64) -> f64 {
    container_width - TRAIL_MARGIN
}

/// Coalesces resize events so a burst produces one reconciliation, roughly
/// one debounce interval after the last event.
///
/// Deadlines are checked against an explicit `now` so tests can drive the
/// debounce with synthetic time. The controller applies the reconciled width
/// between frames, never concurrently with a tick.
pub struct ViewportReconciler {
    pending_width: Option<f64>,
    deadline: Option<Instant>,
    debounce: Duration,
}

impl ViewportReconciler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending_width: None,
            deadline: None,
            debounce,
        }
    }

    /// Record a resize event. A later event within the debounce window
    /// replaces the pending width and pushes the deadline out.
    pub fn notify(&mut self, container_width: f64, now: Instant) {
        self.pending_width = Some(container_width);
        self.deadline = Some(now + self.debounce);
    }

    /// Take the coalesced width once the debounce window has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<f64> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let width = self.pending_width.take();
                if let Some(width) = width {
                    debug!(container_width = width, "Reconciling viewport bounds");
                }
                width
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::animator::{AnimatorRegistry, Tuning};
    use crate::panel::constants::RESIZE_DEBOUNCE_MS;

    fn debounce() -> Duration {
        Duration::from_millis(RESIZE_DEBOUNCE_MS)
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut reconciler = ViewportReconciler::new(debounce());
        let t0 = Instant::now();
        reconciler.notify(640.0, t0);

        assert_eq!(reconciler.take_due(t0), None);
        assert_eq!(reconciler.take_due(t0 + Duration::from_millis(99)), None);

        // Early checks must not drain the pending width
        assert_eq!(
            reconciler.take_due(t0 + Duration::from_millis(100)),
            Some(640.0)
        );
    }

    #[test]
    fn test_due_after_deadline_then_drained() {
        let mut reconciler = ViewportReconciler::new(debounce());
        let t0 = Instant::now();
        reconciler.notify(640.0, t0);

        let due = reconciler.take_due(t0 + Duration::from_millis(100));
        assert_eq!(due, Some(640.0));
        assert_eq!(reconciler.take_due(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_burst_coalesces_to_last_width() {
        let mut reconciler = ViewportReconciler::new(debounce());
        let t0 = Instant::now();
        reconciler.notify(640.0, t0);
        reconciler.notify(700.0, t0 + Duration::from_millis(50));
        reconciler.notify(720.0, t0 + Duration::from_millis(90));

        // First deadline passed but was pushed out by later events
        assert_eq!(reconciler.take_due(t0 + Duration::from_millis(120)), None);
        assert_eq!(
            reconciler.take_due(t0 + Duration::from_millis(190)),
            Some(720.0)
        );
    }

    #[test]
    fn test_end_x_subtracts_trailing_margin() {
        assert_eq!(end_x_for(800.0), 800.0 - TRAIL_MARGIN);
    }

    #[test]
    fn test_reconciled_bound_applies_to_all_animators() {
        use crate::panel::ledger::{sample_event, RequestLedger};

        let mut ledger = RequestLedger::new();
        let mut registry = AnimatorRegistry::new();
        let tuning = Tuning::new(1.0);

        let inside = ledger.ingest(&sample_event("https://t/in", 100.0), 0).unwrap().id;
        let outside = ledger.ingest(&sample_event("https://t/out", 100.0), 1).unwrap().id;

        registry.create(inside.clone(), 100, 0.0, 720.0);
        registry.create(outside.clone(), 100, 0.0, 720.0);

        // Leave one marker near the start, park the other at the far end
        registry.tick_all(1.0, &tuning);
        registry.stop(&inside);
        registry.tick_all(49.0, &tuning);

        let new_end = end_x_for(400.0);
        registry.rebound_all(new_end);

        let outside_state = registry.state(&outside).unwrap();
        assert_eq!(outside_state.current_x, new_end);
        assert_eq!(outside_state.cycle_progress, 0.5);

        let inside_state = registry.state(&inside).unwrap();
        assert_eq!(inside_state.end_x, new_end);
        assert!(inside_state.current_x < new_end);
        assert_ne!(inside_state.cycle_progress, 0.5);
    }
}
