//! Local filesystem storage implementation.
//!
//! Files are replaced by writing a sibling `.partial` file and renaming it
//! over the target, so a crash mid-write never leaves a torn snapshot.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{GlobalSnapshot, PathsConfig, SiteSnapshot};
use crate::storage::SnapshotStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    state_key: String,
    report_key: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_paths(root_dir, &PathsConfig::default())
    }

    /// Create a LocalStorage using configured file names.
    pub fn with_paths(root_dir: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        Self {
            root_dir: root_dir.into(),
            state_key: paths.state_file.clone(),
            report_key: paths.report_file.clone(),
        }
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    pub fn state_path(&self) -> PathBuf {
        self.path(&self.state_key)
    }

    pub fn report_path(&self) -> PathBuf {
        self.path(&self.report_key)
    }
}

/// Replace `path` with `contents`, creating parent directories as needed.
async fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut partial: OsString = path.as_os_str().to_owned();
    partial.push(".partial");
    tokio::fs::write(&partial, contents).await?;
    tokio::fs::rename(&partial, path).await?;
    Ok(())
}

/// File contents, or `None` when the file does not exist yet.
async fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Decode the state file one site at a time.
///
/// An entry that does not parse is dropped with a warning; the other sites
/// keep their baseline. A file that is not a JSON object is dropped whole.
fn decode_state(name: &str, bytes: &[u8]) -> GlobalSnapshot {
    let entries: Map<String, Value> = match serde_json::from_slice(bytes) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Ignoring unreadable {name}: {e}. Every site is checked as new.");
            return GlobalSnapshot::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(site, value)| match serde_json::from_value::<SiteSnapshot>(value) {
            Ok(snapshot) => Some((site, snapshot)),
            Err(e) => {
                log::warn!("Dropping unreadable state for '{site}' in {name}: {e}");
                None
            }
        })
        .collect()
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load_snapshot(&self) -> Result<GlobalSnapshot> {
        match read_if_exists(&self.state_path()).await? {
            Some(bytes) => Ok(decode_state(&self.state_key, &bytes)),
            None => {
                log::info!("No {} found, starting from an empty state", self.state_key);
                Ok(GlobalSnapshot::new())
            }
        }
    }

    async fn save_snapshot(&self, snapshot: &GlobalSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        replace_file(&self.state_path(), &json).await?;
        log::info!(
            "Saved {} site snapshot(s) to {}",
            snapshot.len(),
            self.state_path().display()
        );
        Ok(())
    }

    async fn write_report(&self, report: &str) -> Result<()> {
        replace_file(&self.report_path(), report.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventRecord, StructuredEvent};
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replace_file_leaves_no_partial() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("nested/test.txt");

        replace_file(&target, b"hello").await.unwrap();
        replace_file(&target, b"world").await.unwrap();

        assert_eq!(read_if_exists(&target).await.unwrap(), Some(b"world".to_vec()));
        assert!(!tmp.path().join("nested/test.txt.partial").exists());
        assert_eq!(read_if_exists(&tmp.path().join("missing")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_entry_does_not_drop_others() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        std::fs::write(
            storage.state_path(),
            r#"{
                "A": {"signature": "abc", "last_check": "2026-01-01T12:00:00.123456"},
                "B": {"signature": "def", "last_check": "2026-01-01T12:00:00Z"},
                "C": {"signature": "ghi", "last_check": "not a time"},
                "D": 42
            }"#,
        )
        .unwrap();

        let loaded = storage.load_snapshot().await.unwrap();
        assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(matches!(
            &loaded["A"],
            SiteSnapshot::Signature { signature, .. } if signature == "abc"
        ));
    }

    #[tokio::test]
    async fn test_missing_state_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.load_snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_state_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        std::fs::write(storage.state_path(), "{not json").unwrap();

        assert!(storage.load_snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_save_load() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let mut snapshot = GlobalSnapshot::new();
        snapshot.insert(
            "A".to_string(),
            SiteSnapshot::Signature {
                signature: "abc".to_string(),
                last_check: Utc::now(),
            },
        );
        snapshot.insert(
            "B".to_string(),
            SiteSnapshot::Events(vec![EventRecord::Event(StructuredEvent {
                title: "장학금 신청 안내".to_string(),
                date: "2026-02-02".to_string(),
                description: String::new(),
                link: "https://example.com/1".to_string(),
                source: "B".to_string(),
                source_url: "https://example.com".to_string(),
            })]),
        );

        storage.save_snapshot(&snapshot).await.unwrap();
        let loaded = storage.load_snapshot().await.unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_custom_paths() {
        let tmp = TempDir::new().unwrap();
        let paths = PathsConfig {
            sites_file: "sites.json".to_string(),
            state_file: "state/last_events.json".to_string(),
            report_file: "out/report.md".to_string(),
        };
        let storage = LocalStorage::with_paths(tmp.path(), &paths);

        storage.write_report("# report").await.unwrap();
        storage.save_snapshot(&GlobalSnapshot::new()).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(tmp.path().join("out/report.md")).unwrap(),
            "# report"
        );
        assert!(tmp.path().join("state/last_events.json").exists());
    }
}
