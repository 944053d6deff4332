//! Service layer for the watcher.
//!
//! This module contains the business logic for:
//! - Event extraction with selector rules (`EventExtractor`)
//! - Whole-page signatures (`SignatureExtractor`)
//! - Change detection against the last snapshot (`ChangeDetector`)
//! - Report rendering (`ReportBuilder`)

mod detector;
mod extractor;
mod report;
mod signature;

pub use detector::{ChangeDetector, new_records};
pub use extractor::{EventExtractor, parse_selector};
pub use report::ReportBuilder;
pub use signature::SignatureExtractor;
