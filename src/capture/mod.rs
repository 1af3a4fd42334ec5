//! Capture boundary: HAR-shaped finished-request events and feed sources

pub mod event;
pub mod source;

pub use event::{CaptureEvent, ContentPart, RequestPart, ResponsePart};
pub use source::{CaptureSource, JsonlCaptureSource};
