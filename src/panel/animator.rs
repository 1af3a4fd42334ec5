use crate::panel::ledger::RecordId;
use std::collections::HashMap;
use tracing::debug;

/// Shared animation tuning, broadcast to every animator by reference.
///
/// Not cached anywhere: each tick reads the current value, so speed changes
/// take effect on the very next tick without resetting phase.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Global speed multiplier; smaller values slow the animation.
    /// Always positive and finite.
    pub speed_multiplier: f64,
}

impl Tuning {
    pub fn new(speed_multiplier: f64) -> Self {
        Self { speed_multiplier }
    }
}

/// Continuous-time bounce state for one marker.
///
/// One full cycle is a round trip: `cycle_progress` in [0, 0.5) moves right
/// from `start_x` to `end_x`, [0.5, 1) moves back. The cycle duration is
/// `latency_ms / speed_multiplier` milliseconds, recomputed every tick.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub start_x: f64,
    pub end_x: f64,
    pub current_x: f64,
    pub cycle_progress: f64,
    latency_ms: u64,
}

impl AnimationState {
    pub fn new(latency_ms: u64, start_x: f64, end_x: f64) -> Self {
        Self {
            start_x,
            end_x,
            current_x: start_x,
            cycle_progress: 0.0,
            latency_ms,
        }
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    /// Advance by `dt_ms` of wall-clock time.
    ///
    /// A non-positive span (container too narrow) skips the whole update:
    /// no division by a degenerate span, no position change, and the phase
    /// holds until the container widens again.
    pub fn tick(&mut self, dt_ms: f64, tuning: &Tuning) {
        if self.end_x <= self.start_x {
            return;
        }
        if dt_ms <= 0.0 || !dt_ms.is_finite() {
            return;
        }

        let duration_ms = self.latency_ms as f64 / tuning.speed_multiplier;
        self.cycle_progress = (self.cycle_progress + dt_ms / duration_ms).rem_euclid(1.0);
        if self.cycle_progress >= 1.0 {
            // the boundary wraps to the start of the rightward leg
            self.cycle_progress = 0.0;
        }

        let span = self.end_x - self.start_x;
        if self.cycle_progress <= 0.5 {
            self.current_x = self.start_x + span * (self.cycle_progress * 2.0);
        } else {
            self.current_x = self.end_x - span * ((self.cycle_progress - 0.5) * 2.0);
        }
    }

    /// Phase reset only: back to the start of the rightward leg
    pub fn restart(&mut self) {
        self.cycle_progress = 0.0;
        self.current_x = self.start_x;
    }

    /// Apply a new right bound after a container resize.
    ///
    /// A marker beyond the new bound snaps onto it and flips to the leftward
    /// leg, so it re-enters visible bounds on the next tick. Markers within
    /// bounds keep their position and phase untouched.
    pub fn rebound(&mut self, new_end_x: f64) {
        self.end_x = new_end_x;
        if self.current_x > new_end_x {
            self.current_x = new_end_x;
            self.cycle_progress = 0.5;
        }
    }
}

struct Entry {
    state: AnimationState,
    running: bool,
}

/// Registry of live animators, keyed by record id (arena pattern: the render
/// surface looks positions up by id, never holds animator references).
pub struct AnimatorRegistry {
    entries: HashMap<RecordId, Entry>,
}

impl AnimatorRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn create(&mut self, id: RecordId, latency_ms: u64, start_x: f64, end_x: f64) {
        debug!(id = id.as_str(), latency_ms, "Creating animator");
        self.entries.insert(
            id,
            Entry {
                state: AnimationState::new(latency_ms, start_x, end_x),
                running: true,
            },
        );
    }

    /// Advance every running animator by the same wall-clock delta.
    /// Ticks are independent per animator; relative order does not matter.
    pub fn tick_all(&mut self, dt_ms: f64, tuning: &Tuning) {
        for entry in self.entries.values_mut() {
            if entry.running {
                entry.state.tick(dt_ms, tuning);
            }
        }
    }

    /// Stop one animator. Synchronous and idempotent: once stopped, no
    /// further tick touches its state. Unknown ids are a no-op.
    pub fn stop(&mut self, id: &RecordId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.running = false;
        }
    }

    /// Phase-reset every live animator without recreating it
    pub fn restart_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.state.restart();
        }
    }

    /// Apply a reconciled right bound to every animator
    pub fn rebound_all(&mut self, new_end_x: f64) {
        for entry in self.entries.values_mut() {
            entry.state.rebound(new_end_x);
        }
    }

    pub fn state(&self, id: &RecordId) -> Option<&AnimationState> {
        self.entries.get(id).map(|e| &e.state)
    }

    pub fn position(&self, id: &RecordId) -> Option<f64> {
        self.state(id).map(|s| s.current_x)
    }

    pub fn is_running(&self, id: &RecordId) -> bool {
        self.entries.get(id).map(|e| e.running).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every animator. Paired with `RequestLedger::clear` so no
    /// animator outlives its backing record.
    pub fn clear(&mut self) {
        debug!(animators = self.entries.len(), "Clearing animators");
        self.entries.clear();
    }
}

impl Default for AnimatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
