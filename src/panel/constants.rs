//! Constants used throughout the panel

/// Left edge of the bounce track, leaving room for the request label column
pub const TRACK_START_X: f64 = 270.0;

/// Trailing margin subtracted from the container width to get the right bound
pub const TRAIL_MARGIN: f64 = 80.0;

/// Container width assumed before the first resize event arrives
pub const DEFAULT_CONTAINER_WIDTH: f64 = 800.0;

/// Resize events are coalesced until this long after the last one
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Default global speed multiplier (0.01x: 200ms latency -> 20s round trip)
pub const DEFAULT_SPEED_MULTIPLIER: f64 = 0.01;

/// Default frame rate for the live panel
pub const DEFAULT_FPS: u32 = 60;

/// Horizontal span covered by one terminal cell when rendering the track
pub const TRACK_CELL_WIDTH: f64 = 8.0;

/// Percentage by which a marker's trim color is darkened from its fill
pub const MARKER_DARKEN_PERCENT: u8 = 20;

/// Histogram lower bound in milliseconds
pub const HISTOGRAM_LOW_BOUND_MS: u64 = 1;

/// Histogram upper bound in milliseconds
pub const HISTOGRAM_HIGH_BOUND_MS: u64 = 100_000;

/// Histogram significant digits for precision
pub const HISTOGRAM_SIGNIFICANT_DIGITS: u8 = 3;

/// Latency below this renders green in the row info column (milliseconds)
pub const FAST_LATENCY_MS: u64 = 100;

/// Latency below this renders yellow in the row info column (milliseconds)
pub const ACCEPTABLE_LATENCY_MS: u64 = 500;
