//! Storage abstractions for snapshot persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! {storage_dir}/
//! ├── config.toml           # Watcher configuration (optional)
//! ├── sites_config.json     # Monitored sites
//! ├── last_state.json       # GlobalSnapshot, overwritten each run
//! └── report.md             # Latest report, written every run
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::GlobalSnapshot;

// Re-export for convenience
pub use local::LocalStorage;

/// Durable site-name to snapshot mapping plus the report artifact.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the last snapshot; a missing state is an empty snapshot.
    async fn load_snapshot(&self) -> Result<GlobalSnapshot>;

    /// Replace the stored snapshot wholesale.
    async fn save_snapshot(&self, snapshot: &GlobalSnapshot) -> Result<()>;

    /// Write the report document.
    async fn write_report(&self, report: &str) -> Result<()>;
}
