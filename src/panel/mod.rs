//! Panel module for the netbounce latency visualizer

pub mod animator;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod palette;
pub mod reconciler;
pub mod render;
pub mod stats;

pub use animator::{AnimationState, AnimatorRegistry, Tuning};
pub use config::Config;
pub use constants::*;
pub use controller::{FrameClock, PanelCommand, PanelController, SleepClock};
pub use error::{PanelError, Result};
pub use ledger::{Admitted, RecordId, RequestLedger, RequestRecord, ResourceType};
pub use logging::init_logging;
pub use palette::{PaletteStore, Rgb};
pub use reconciler::{end_x_for, ViewportReconciler};
pub use stats::LatencySummary;
