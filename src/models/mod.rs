// src/models/mod.rs

//! Domain models for the watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod outcome;
mod record;
mod selectors;
mod site;
mod snapshot;

// Re-export all public types
pub use config::{
    Config, ExtractionConfig, FetcherConfig, PathsConfig, ReportConfig, RunMode,
};
pub use outcome::{ChangeSet, ChangeStatus, RunSummary, SiteOutcome, SiteResult};
pub use record::{EventRecord, HashRecord, StructuredEvent};
pub use selectors::{Field, SelectorRules};
pub use site::{SiteConfig, SitesFile};
pub use snapshot::{GlobalSnapshot, PageSignature, Representation, SiteSnapshot};
