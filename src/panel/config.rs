use crate::panel::constants::{DEFAULT_CONTAINER_WIDTH, DEFAULT_FPS, DEFAULT_SPEED_MULTIPLIER};
use crate::panel::error::{PanelError, Result};
use clap::Parser;
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "netbounce")]
#[command(about = "Per-request network latency bounce visualizer")]
pub struct Config {
    /// Request event feed: path to a JSONL file, or "-" for stdin
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Global animation speed multiplier (smaller is slower)
    #[arg(long, default_value_t = DEFAULT_SPEED_MULTIPLIER)]
    pub speed: f64,

    /// Initial color palette (vibrant, pastel, saturated, monochrome)
    #[arg(long, default_value = "vibrant")]
    pub palette: String,

    /// Container width in virtual pixels when no terminal is attached
    #[arg(long, default_value_t = DEFAULT_CONTAINER_WIDTH)]
    pub width: f64,

    /// Panel refresh rate in frames per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Returns the configured frame interval as a Duration
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(PanelError::Config("speed must be a positive real".into()));
        }
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(PanelError::Config("width must be >= 0".into()));
        }
        if self.fps == 0 {
            return Err(PanelError::Config("fps must be > 0".into()));
        }
        debug!("Configuration validated successfully");
        Ok(())
    }
}
