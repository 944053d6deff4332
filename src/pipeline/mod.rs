//! Pipeline entry points for watcher operations.
//!
//! - `run_watch`: Check every enabled site, persist the snapshot, write the report
//! - `CiSignal`: Report the outcome to automation

pub mod signal;
pub mod watch;

pub use signal::CiSignal;
pub use watch::{SiteChecker, run_watch};
