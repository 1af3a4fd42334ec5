use crate::panel::error::{PanelError, Result};
use serde::Deserialize;
use tracing::debug;

/// One finished network request, HAR-shaped.
///
/// The panel reads only the fields below; anything else in the feed is
/// ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureEvent {
    pub request: RequestPart,
    pub response: ResponsePart,
    /// Total elapsed time for the request, in milliseconds
    pub time: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestPart {
    pub url: String,
    pub method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub status: u16,
    #[serde(default)]
    pub content: ContentPart,
    #[serde(rename = "bodySize", default)]
    pub body_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
}

impl CaptureEvent {
    /// Parse one JSONL feed line
    pub fn from_json_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| {
            debug!(error = %e, "Malformed capture event");
            PanelError::Capture(format!("Malformed capture event: {}", e))
        })
    }

    /// Elapsed time rounded to whole milliseconds. May be non-positive,
    /// in which case the ledger filters the event out.
    pub fn latency_ms(&self) -> i64 {
        self.time.round() as i64
    }

    /// Response body size; falls back to the transfer body size when the
    /// decoded content size is absent or unknown (negative in HAR).
    pub fn size_bytes(&self) -> u64 {
        self.response
            .content
            .size
            .filter(|&s| s > 0)
            .or(self.response.body_size.filter(|&s| s > 0))
            .unwrap_or(0) as u64
    }

    pub fn mime_type(&self) -> &str {
        self.response
            .content
            .mime_type
            .as_deref()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"request":{"url":"https://example.com/app.js","method":"GET"},"response":{"status":200,"content":{"size":2048,"mimeType":"application/javascript"},"bodySize":1900},"time":142.7}"#;

    #[test]
    fn test_event_parses_har_shape() {
        let event = CaptureEvent::from_json_line(SAMPLE).unwrap();
        assert_eq!(event.request.url, "https://example.com/app.js");
        assert_eq!(event.request.method, "GET");
        assert_eq!(event.response.status, 200);
        assert_eq!(event.latency_ms(), 143);
        assert_eq!(event.size_bytes(), 2048);
        assert_eq!(event.mime_type(), "application/javascript");
    }

    #[test]
    fn test_event_size_falls_back_to_body_size() {
        let line = r#"{"request":{"url":"https://example.com/","method":"GET"},"response":{"status":200,"content":{"mimeType":"text/html"},"bodySize":512},"time":30.0}"#;
        let event = CaptureEvent::from_json_line(line).unwrap();
        assert_eq!(event.size_bytes(), 512);
    }

    #[test]
    fn test_event_unknown_sizes_are_zero() {
        let line = r#"{"request":{"url":"https://example.com/","method":"GET"},"response":{"status":304,"content":{"size":-1},"bodySize":-1},"time":5.0}"#;
        let event = CaptureEvent::from_json_line(line).unwrap();
        assert_eq!(event.size_bytes(), 0);
        assert_eq!(event.mime_type(), "");
    }

    #[test]
    fn test_event_malformed_line_is_error() {
        assert!(CaptureEvent::from_json_line("not json").is_err());
        assert!(CaptureEvent::from_json_line(r#"{"request":{}}"#).is_err());
    }

    #[test]
    fn test_event_latency_rounds() {
        let line = r#"{"request":{"url":"u","method":"GET"},"response":{"status":200},"time":0.4}"#;
        let event = CaptureEvent::from_json_line(line).unwrap();
        assert_eq!(event.latency_ms(), 0);
    }
}
