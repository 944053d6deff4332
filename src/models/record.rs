//! Event record data structures.

use serde::{Deserialize, Serialize};

/// One structured item found on a page, e.g. a calendar entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StructuredEvent {
    /// Event title, never empty
    pub title: String,

    /// Date text as shown on the page
    #[serde(default)]
    pub date: String,

    /// Description text, already truncated at extraction
    #[serde(default)]
    pub description: String,

    /// Absolute URL of the event
    #[serde(default)]
    pub link: String,

    /// Site name the event came from
    #[serde(default)]
    pub source: String,

    /// Page URL the event came from
    #[serde(default)]
    pub source_url: String,
}

/// Whole-page fallback used when no structured event could be extracted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HashRecord {
    /// Short hex digest of the visible page text
    pub page_hash: String,

    /// Leading page text with newlines flattened
    #[serde(default)]
    pub content_preview: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub source_url: String,
}

/// A comparable record: either a structured event or a page hash, never both.
///
/// Equality is structural over every field, so a record whose description
/// changed is a different record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EventRecord {
    // `page_hash` is required, so structured events never match this arm.
    PageHash(HashRecord),
    Event(StructuredEvent),
}

impl EventRecord {
    pub fn is_page_hash(&self) -> bool {
        matches!(self, EventRecord::PageHash(_))
    }

    /// Short one-line label for logs.
    pub fn label(&self) -> String {
        match self {
            EventRecord::PageHash(r) => format!("page hash {}", r.page_hash),
            EventRecord::Event(e) if e.date.is_empty() => e.title.clone(),
            EventRecord::Event(e) => format!("{} ({})", e.title, e.date),
        }
    }
}

impl From<StructuredEvent> for EventRecord {
    fn from(event: StructuredEvent) -> Self {
        EventRecord::Event(event)
    }
}

impl From<HashRecord> for EventRecord {
    fn from(record: HashRecord) -> Self {
        EventRecord::PageHash(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> StructuredEvent {
        StructuredEvent {
            title: "Spring Concert".to_string(),
            date: "2026-04-01".to_string(),
            description: "Annual concert".to_string(),
            link: "https://example.com/events/1".to_string(),
            source: "Music Hall".to_string(),
            source_url: "https://example.com/events".to_string(),
        }
    }

    #[test]
    fn test_untagged_variants_round_trip_by_shape() {
        let hash: EventRecord = serde_json::from_str(
            r#"{"page_hash":"0123456789abcdef","content_preview":"hello"}"#,
        )
        .unwrap();
        assert!(hash.is_page_hash());

        let event: EventRecord =
            serde_json::from_str(r#"{"title":"Spring Concert","date":"2026-04-01"}"#).unwrap();
        assert!(!event.is_page_hash());
    }

    #[test]
    fn test_equality_is_field_wise() {
        let a = EventRecord::from(sample_event());
        let mut changed = sample_event();
        changed.description = "Annual concert, new venue".to_string();

        assert_eq!(a, EventRecord::from(sample_event()));
        assert_ne!(a, EventRecord::from(changed));
    }

    #[test]
    fn test_label() {
        let event = EventRecord::from(sample_event());
        assert_eq!(event.label(), "Spring Concert (2026-04-01)");
    }
}
