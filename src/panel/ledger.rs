use crate::capture::CaptureEvent;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use url::Url;

/// Stable identifier for one observed request, derived from the URL and the
/// ingest timestamp so repeated URLs stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Coarse request classification derived from MIME type and URL suffix.
/// MIME takes precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Script,
    Stylesheet,
    Image,
    Font,
    Json,
    Document,
    Other,
}

impl ResourceType {
    pub fn derive(mime_type: &str, url: &str) -> Self {
        let url = url.to_lowercase();
        let has_ext = |exts: &[&str]| exts.iter().any(|ext| url.contains(ext));

        if mime_type.contains("javascript") || url.ends_with(".js") {
            ResourceType::Script
        } else if mime_type.contains("css") || url.ends_with(".css") {
            ResourceType::Stylesheet
        } else if mime_type.contains("image")
            || has_ext(&[".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico"])
        {
            ResourceType::Image
        } else if mime_type.contains("font") || has_ext(&[".woff", ".woff2", ".ttf", ".eot"]) {
            ResourceType::Font
        } else if mime_type.contains("json") {
            ResourceType::Json
        } else if mime_type.contains("html") {
            ResourceType::Document
        } else {
            ResourceType::Other
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Script => "script",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Json => "json",
            ResourceType::Document => "document",
            ResourceType::Other => "other",
        };
        f.write_str(name)
    }
}

/// One admitted request. Immutable once created; removed only by clear-all.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub id: RecordId,
    pub url: String,
    pub method: String,
    pub resource_type: ResourceType,
    pub status: u16,
    pub size_bytes: u64,
    pub latency_ms: u64,
    pub mime_type: String,
}

impl RequestRecord {
    /// Display label: the filename from the URL path, or the hostname when
    /// the path is empty.
    pub fn label(&self) -> String {
        if let Ok(parsed) = Url::parse(&self.url) {
            let filename = parsed
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
                .filter(|s| !s.is_empty());
            if let Some(name) = filename {
                return name;
            }
            if let Some(host) = parsed.host_str() {
                return host.to_string();
            }
        }
        self.url.clone()
    }
}

/// Outcome of a successful ingest
#[derive(Debug, Clone)]
pub struct Admitted {
    pub id: RecordId,
    /// Position in the latency-ascending display order where the record
    /// was inserted
    pub display_index: usize,
    /// Monotonic color-assignment index handed to this record
    pub color_index: usize,
}

/// Insertion-ordered, latency-keyed collection of observed requests.
///
/// Display order is latency-ascending ("fastest on top"); ties are broken by
/// arrival order. The color cursor is monotonic and independent of ledger
/// size, reset only by `clear` or `reset_color_cursor`.
pub struct RequestLedger {
    records: HashMap<RecordId, RequestRecord>,
    display: Vec<RecordId>,
    color_cursor: usize,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            display: Vec::new(),
            color_cursor: 0,
        }
    }

    /// Admit one capture event. Events with non-positive rounded latency are
    /// dropped silently (expected noise such as cached responses), returning
    /// `None`.
    pub fn ingest(&mut self, event: &CaptureEvent, ingested_at_ms: u64) -> Option<Admitted> {
        let latency = event.latency_ms();
        if latency <= 0 {
            debug!(
                url = %event.request.url,
                latency_ms = latency,
                "Dropping event with non-positive latency"
            );
            return None;
        }
        let latency_ms = latency as u64;

        let id = self.unique_id(&event.request.url, ingested_at_ms);
        let record = RequestRecord {
            id: id.clone(),
            url: event.request.url.clone(),
            method: event.request.method.clone(),
            resource_type: ResourceType::derive(event.mime_type(), &event.request.url),
            status: event.response.status,
            size_bytes: event.size_bytes(),
            latency_ms,
            mime_type: event.mime_type().to_string(),
        };

        // Stable insertion: after all existing records with equal latency,
        // before the first strictly greater one.
        let display_index = self.display.partition_point(|existing| {
            self.records
                .get(existing)
                .map(|r| r.latency_ms <= latency_ms)
                .unwrap_or(false)
        });

        self.display.insert(display_index, id.clone());
        self.records.insert(id.clone(), record);

        let color_index = self.color_cursor;
        self.color_cursor += 1;

        debug!(
            id = id.as_str(),
            latency_ms,
            display_index,
            color_index,
            "Request admitted"
        );

        Some(Admitted {
            id,
            display_index,
            color_index,
        })
    }

    fn unique_id(&self, url: &str, ingested_at_ms: u64) -> RecordId {
        let base = format!("{}_{}", url, ingested_at_ms);
        if !self.records.contains_key(&RecordId(base.clone())) {
            return RecordId(base);
        }
        // Same URL in the same millisecond; disambiguate by probe count.
        let mut n = 1usize;
        loop {
            let candidate = RecordId(format!("{}_{}", base, n));
            if !self.records.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Empty the ledger and reset the color cursor. The caller is
    /// responsible for stopping the animators backing these records in the
    /// same operation.
    pub fn clear(&mut self) {
        debug!(records = self.records.len(), "Clearing ledger");
        self.records.clear();
        self.display.clear();
        self.color_cursor = 0;
    }

    /// Reset the color-assignment cursor without touching records.
    /// Used when the active palette changes.
    pub fn reset_color_cursor(&mut self) {
        self.color_cursor = 0;
    }

    pub fn get(&self, id: &RecordId) -> Option<&RequestRecord> {
        self.records.get(id)
    }

    /// Records in display order (latency ascending)
    pub fn display_order(&self) -> impl Iterator<Item = &RequestRecord> {
        self.display.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn color_cursor(&self) -> usize {
        self.color_cursor
    }
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub use tests::event as sample_event;
