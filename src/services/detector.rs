// src/services/detector.rs

//! Change detection between the stored snapshot and the current observation.
//!
//! Event lists are compared by set difference over full record equality;
//! page signatures by plain inequality. There is no identity key across runs,
//! so an event whose description changed shows up as a new event.

use std::collections::HashSet;

use crate::models::{ChangeSet, ChangeStatus, EventRecord, Representation, SiteSnapshot};

/// Compares a site's current representation with its previous snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect changes for one site.
    ///
    /// A missing snapshot, an empty stored signature, or one stored by the
    /// other run mode is a first check: everything observed is reported.
    pub fn detect(&self, previous: Option<&SiteSnapshot>, current: &Representation) -> ChangeSet {
        match current {
            Representation::Signature(sig) => {
                let status = match previous {
                    Some(SiteSnapshot::Signature { signature, .. })
                        if *signature == sig.signature =>
                    {
                        ChangeStatus::Unchanged
                    }
                    Some(SiteSnapshot::Signature { signature, .. }) if !signature.is_empty() => {
                        ChangeStatus::Updated
                    }
                    _ => ChangeStatus::FirstCheck,
                };
                ChangeSet::Signature {
                    status,
                    preview: sig.preview.clone(),
                    content_length: sig.content_length,
                }
            }
            Representation::Events(events) => match previous {
                Some(SiteSnapshot::Events(seen)) => {
                    let new_events = new_records(seen, events);
                    let status = if new_events.is_empty() {
                        ChangeStatus::Unchanged
                    } else {
                        ChangeStatus::Updated
                    };
                    ChangeSet::Events { status, new_events }
                }
                _ => ChangeSet::Events {
                    status: ChangeStatus::FirstCheck,
                    new_events: new_records(&[], events),
                },
            },
        }
    }
}

/// `current - previous`, keeping the order of `current` and collapsing
/// duplicates.
pub fn new_records(previous: &[EventRecord], current: &[EventRecord]) -> Vec<EventRecord> {
    let mut seen: HashSet<&EventRecord> = previous.iter().collect();
    current
        .iter()
        .filter(|record| seen.insert(*record))
        .cloned()
        .collect()
}
