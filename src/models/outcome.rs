//! Per-site results and the aggregate of a run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventRecord, RunMode};

/// How the current observation relates to the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// No usable prior snapshot; everything observed counts as new
    FirstCheck,
    Updated,
    Unchanged,
}

/// Detector output for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSet {
    Signature {
        status: ChangeStatus,
        preview: Vec<String>,
        content_length: usize,
    },
    Events {
        status: ChangeStatus,
        new_events: Vec<EventRecord>,
    },
}

impl ChangeSet {
    pub fn status(&self) -> ChangeStatus {
        match self {
            ChangeSet::Signature { status, .. } | ChangeSet::Events { status, .. } => *status,
        }
    }

    pub fn has_changes(&self) -> bool {
        match self {
            ChangeSet::Signature { status, .. } => *status != ChangeStatus::Unchanged,
            ChangeSet::Events { new_events, .. } => !new_events.is_empty(),
        }
    }

    /// Number of independent changes: new events, or 1 for a changed page.
    pub fn change_count(&self) -> usize {
        match self {
            ChangeSet::Signature { .. } => usize::from(self.has_changes()),
            ChangeSet::Events { new_events, .. } => new_events.len(),
        }
    }
}

/// What happened to a single site this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SiteOutcome {
    Checked(ChangeSet),
    Failed { reason: String },
}

/// Result for one site, carrying its URL so rendering needs no config lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteResult {
    pub name: String,
    pub url: String,
    pub outcome: SiteOutcome,
}

impl SiteResult {
    pub fn changes(&self) -> Option<&ChangeSet> {
        match &self.outcome {
            SiteOutcome::Checked(changes) if changes.has_changes() => Some(changes),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SiteOutcome::Failed { .. })
    }
}

/// Aggregated results of one run, in configuration order.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub checked_at: DateTime<Utc>,
    pub results: Vec<SiteResult>,
}

impl RunSummary {
    pub fn new(mode: RunMode, checked_at: DateTime<Utc>) -> Self {
        Self {
            mode,
            checked_at,
            results: Vec::new(),
        }
    }

    pub fn has_updates(&self) -> bool {
        self.results.iter().any(|r| r.changes().is_some())
    }

    /// Sites with at least one change.
    pub fn updated_sites(&self) -> impl Iterator<Item = (&SiteResult, &ChangeSet)> {
        self.results
            .iter()
            .filter_map(|r| r.changes().map(|c| (r, c)))
    }

    /// Total new events (event mode) or changed sites (signature mode).
    pub fn update_count(&self) -> usize {
        self.updated_sites().map(|(_, c)| c.change_count()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SiteResult> {
        self.results.iter().filter(|r| r.is_failed())
    }

    pub fn success_count(&self) -> usize {
        self.results.len() - self.failures().count()
    }
}
