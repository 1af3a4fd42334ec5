use crate::capture::CaptureEvent;
use crate::panel::animator::{AnimatorRegistry, Tuning};
use crate::panel::constants::{RESIZE_DEBOUNCE_MS, TRACK_START_X};
use crate::panel::error::Result;
use crate::panel::ledger::{RecordId, RequestLedger};
use crate::panel::palette::{PaletteStore, Rgb};
use crate::panel::reconciler::{end_x_for, ViewportReconciler};
use crate::panel::render;
use crate::panel::stats::LatencySummary;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Discrete user commands consumed by the panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    SelectPalette(String),
    SetSpeed(f64),
    ClearAll,
    RestartAll,
}

/// Source of frame timing for the animation loop.
///
/// The real implementation sleeps one frame and reports the measured
/// wall-clock delta; tests drive the loop with synthetic steps instead.
pub trait FrameClock {
    /// Block until the next frame is due; returns the elapsed milliseconds
    /// since the previous frame
    fn wait_frame(&mut self) -> f64;
}

/// Frame clock backed by thread sleep
pub struct SleepClock {
    interval: Duration,
    last: Instant,
}

impl SleepClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }
}

impl FrameClock for SleepClock {
    fn wait_frame(&mut self) -> f64 {
        std::thread::sleep(self.interval);
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64() * 1000.0;
        self.last = now;
        dt
    }
}

/// Wires the capture feed, ledger, palette, animators, and reconciler
/// together and produces the render model once per frame.
pub struct PanelController {
    palette: PaletteStore,
    ledger: RequestLedger,
    registry: AnimatorRegistry,
    reconciler: ViewportReconciler,
    tuning: Tuning,
    colors: HashMap<RecordId, Rgb>,
    summary: LatencySummary,
    container_width: f64,
    status: Option<String>,
}

impl PanelController {
    pub fn new(speed_multiplier: f64, palette_name: &str, container_width: f64) -> Result<Self> {
        let mut palette = PaletteStore::new();
        palette.select(palette_name);
        Ok(Self {
            palette,
            ledger: RequestLedger::new(),
            registry: AnimatorRegistry::new(),
            reconciler: ViewportReconciler::new(Duration::from_millis(RESIZE_DEBOUNCE_MS)),
            tuning: Tuning::new(speed_multiplier),
            colors: HashMap::new(),
            summary: LatencySummary::new()?,
            container_width,
            status: None,
        })
    }

    /// Feed one finished-request event into the pipeline. Filtered events
    /// (non-positive latency) return `None` and change nothing.
    pub fn ingest(&mut self, event: &CaptureEvent, now_ms: u64) -> Option<RecordId> {
        let admitted = self.ledger.ingest(event, now_ms)?;
        let latency_ms = self.ledger.get(&admitted.id)?.latency_ms;
        self.summary.record(latency_ms);

        self.registry.create(
            admitted.id.clone(),
            latency_ms,
            TRACK_START_X,
            end_x_for(self.container_width),
        );
        self.colors
            .insert(admitted.id.clone(), self.palette.color_for(admitted.color_index));
        Some(admitted.id)
    }

    /// Apply one user command
    pub fn apply(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::SelectPalette(name) => {
                if self.palette.select(&name) {
                    self.recolor_all();
                    self.ledger.reset_color_cursor();
                }
            }
            PanelCommand::SetSpeed(multiplier) => {
                if multiplier.is_finite() && multiplier > 0.0 {
                    debug!(speed_multiplier = multiplier, "Speed updated");
                    self.tuning.speed_multiplier = multiplier;
                } else {
                    warn!(speed_multiplier = multiplier, "Ignoring invalid speed");
                }
            }
            PanelCommand::ClearAll => {
                // Stop animators and drop records in one operation so no
                // animator outlives its backing row
                self.registry.clear();
                self.ledger.clear();
                self.colors.clear();
                self.summary.reset();
            }
            PanelCommand::RestartAll => {
                self.registry.restart_all();
            }
        }
    }

    /// Recolor every displayed marker from index 0 in display order.
    /// Indices come strictly from the current sorted view, never from the
    /// original assignment order.
    fn recolor_all(&mut self) {
        let recolored: Vec<(RecordId, Rgb)> = self
            .ledger
            .display_order()
            .enumerate()
            .map(|(index, record)| (record.id.clone(), self.palette.color_for(index)))
            .collect();
        for (id, color) in recolored {
            self.colors.insert(id, color);
        }
    }

    /// Ambient resize event; reconciled after the debounce window
    pub fn resize(&mut self, container_width: f64, now: Instant) {
        self.reconciler.notify(container_width, now);
    }

    /// Advance one frame: apply any due reconciliation first, then tick
    /// every animator with the measured delta.
    pub fn frame(&mut self, dt_ms: f64, now: Instant) {
        if let Some(width) = self.reconciler.take_due(now) {
            self.container_width = width;
            self.registry.rebound_all(end_x_for(width));
        }
        self.registry.tick_all(dt_ms, &self.tuning);
    }

    /// Render the whole panel as a multi-line string
    pub fn render(&self) -> String {
        let mut lines = vec![render::render_header(
            self.palette.active_name(),
            self.tuning.speed_multiplier,
        )];

        if let Some(status) = &self.status {
            lines.push(render::render_status(status));
        }

        if self.ledger.is_empty() {
            lines.push(render::EMPTY_STATE_MESSAGE.to_string());
            return lines.join("\n");
        }

        for record in self.ledger.display_order() {
            let state = match self.registry.state(&record.id) {
                Some(state) => state,
                None => continue,
            };
            let color = self
                .colors
                .get(&record.id)
                .copied()
                .unwrap_or(Rgb::new(255, 255, 255));
            lines.push(render::render_row(record, state, color));
        }

        let footer = render::render_summary(&self.summary);
        if !footer.is_empty() {
            lines.push(String::new());
            lines.push(footer);
        }

        lines.join("\n")
    }

    /// One-shot status message (capture attach failures)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.tuning.speed_multiplier
    }

    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &AnimatorRegistry {
        &self.registry
    }

    pub fn marker_color(&self, id: &RecordId) -> Option<Rgb> {
        self.colors.get(id).copied()
    }

    pub fn palette_name(&self) -> &'static str {
        self.palette.active_name()
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }
}
