use crate::capture::event::CaptureEvent;
use crate::panel::error::{PanelError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::{debug, warn};

/// Feed of finished network requests.
///
/// `attach` is attempted once per panel open; on failure the panel shows a
/// status message and monitoring simply does not start (no retries).
pub trait CaptureSource: Send {
    /// Attach to the underlying feed
    fn attach(&mut self) -> Result<()>;

    /// Next finished-request event, or `None` when the feed is exhausted.
    /// Malformed entries are skipped, not surfaced.
    fn poll_event(&mut self) -> Result<Option<CaptureEvent>>;
}

/// Newline-delimited JSON capture feed read from a file or stdin ("-")
pub struct JsonlCaptureSource {
    path: String,
    reader: Option<Box<dyn BufRead + Send>>,
}

impl JsonlCaptureSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            reader: None,
        }
    }

    /// Wrap an already-open reader; used by tests
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self {
            path: "<reader>".to_string(),
            reader: Some(Box::new(reader)),
        }
    }
}

impl CaptureSource for JsonlCaptureSource {
    fn attach(&mut self) -> Result<()> {
        if self.reader.is_some() {
            return Ok(());
        }
        debug!(path = %self.path, "Attaching capture source");
        if self.path == "-" {
            // BufReader over Stdin rather than StdinLock: the reader moves
            // into the pump thread, and StdinLock is not Send
            self.reader = Some(Box::new(BufReader::new(io::stdin())));
        } else {
            let file = File::open(&self.path).map_err(|e| {
                warn!(path = %self.path, error = %e, "Failed to attach capture source");
                PanelError::Capture(format!("Cannot open feed {}: {}", self.path, e))
            })?;
            self.reader = Some(Box::new(BufReader::new(file)));
        }
        debug!("Capture source attached");
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<CaptureEvent>> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| PanelError::Capture("Capture source not attached".into()))?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line).map_err(PanelError::Io)?;
            if read == 0 {
                debug!("Capture feed exhausted");
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match CaptureEvent::from_json_line(trimmed) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    // Filtered input: skip and keep reading
                    warn!(error = %e, "Skipping malformed feed line");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use std::io::Cursor;

    mock! {
        pub CaptureSource {}

        impl CaptureSource for CaptureSource {
            fn attach(&mut self) -> Result<()>;
            fn poll_event(&mut self) -> Result<Option<CaptureEvent>>;
        }
    }

    const GOOD: &str = r#"{"request":{"url":"https://t/a.js","method":"GET"},"response":{"status":200,"content":{"size":10,"mimeType":"application/javascript"}},"time":42.0}"#;

    #[test]
    fn test_jsonl_source_reads_events_in_order() -> Result<()> {
        let feed = format!("{}\n{}\n", GOOD, GOOD.replace("a.js", "b.js"));
        let mut source = JsonlCaptureSource::from_reader(Cursor::new(feed));
        source.attach()?;

        let first = source.poll_event()?.unwrap();
        assert_eq!(first.request.url, "https://t/a.js");
        let second = source.poll_event()?.unwrap();
        assert_eq!(second.request.url, "https://t/b.js");
        assert!(source.poll_event()?.is_none());
        Ok(())
    }

    #[test]
    fn test_jsonl_source_skips_malformed_and_blank_lines() -> Result<()> {
        let feed = format!("\nnot json\n{}\n{{}}\n", GOOD);
        let mut source = JsonlCaptureSource::from_reader(Cursor::new(feed));
        source.attach()?;

        let event = source.poll_event()?.unwrap();
        assert_eq!(event.request.url, "https://t/a.js");
        assert!(source.poll_event()?.is_none());
        Ok(())
    }

    #[test]
    fn test_attach_missing_file_is_capture_error() {
        let mut source = JsonlCaptureSource::new("/nonexistent/feed.jsonl");
        let err = source.attach().unwrap_err();
        assert!(matches!(err, PanelError::Capture(_)));
    }

    #[test]
    fn test_poll_before_attach_is_error() {
        let mut source = JsonlCaptureSource::new("/nonexistent/feed.jsonl");
        assert!(source.poll_event().is_err());
    }

    #[test]
    fn test_mock_source_drains_until_exhausted() -> Result<()> {
        let mut mock = MockCaptureSource::new();
        mock.expect_attach().times(1).returning(|| Ok(()));
        let mut remaining = 2;
        mock.expect_poll_event().returning(move || {
            if remaining > 0 {
                remaining -= 1;
                Ok(Some(CaptureEvent::from_json_line(GOOD)?))
            } else {
                Ok(None)
            }
        });

        mock.attach()?;
        let mut count = 0;
        while mock.poll_event()?.is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
        Ok(())
    }
}
