//! Persisted per-site state used as the baseline of the next run.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::EventRecord;

/// Whole-page reduction produced in signature mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSignature {
    /// Hex digest of the cleaned page text
    pub signature: String,

    /// Up to a few leading text snippets, for the report only
    pub preview: Vec<String>,

    /// Character count of the cleaned page text
    pub content_length: usize,
}

/// Current reduction of a site, one variant per run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    Signature(PageSignature),
    Events(Vec<EventRecord>),
}

impl Representation {
    pub fn kind(&self) -> &'static str {
        match self {
            Representation::Signature(_) => "signature",
            Representation::Events(_) => "events",
        }
    }
}

/// Last observed state of one site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SiteSnapshot {
    Signature {
        signature: String,
        #[serde(deserialize_with = "utc_or_naive")]
        last_check: DateTime<Utc>,
    },
    Events(Vec<EventRecord>),
}

impl SiteSnapshot {
    /// Build the snapshot that replaces the previous one after a successful check.
    pub fn from_representation(current: &Representation, now: DateTime<Utc>) -> Self {
        match current {
            Representation::Signature(sig) => SiteSnapshot::Signature {
                signature: sig.signature.clone(),
                last_check: now,
            },
            Representation::Events(events) => SiteSnapshot::Events(events.clone()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SiteSnapshot::Signature { .. } => "signature",
            SiteSnapshot::Events(_) => "events",
        }
    }
}

/// Every site's snapshot, keyed by site name. Overwritten wholesale each run.
pub type GlobalSnapshot = BTreeMap<String, SiteSnapshot>;

/// Accept RFC 3339 timestamps as well as offset-less ones, read as UTC.
fn utc_or_naive<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
