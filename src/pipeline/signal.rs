// src/pipeline/signal.rs

//! Machine-readable run outcome for CI pipelines.
//!
//! Printed as `key=value` lines and, when a GitHub Actions output file is
//! available, appended there as step outputs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::RunSummary;

/// Flags consumed by automation after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CiSignal {
    pub has_updates: bool,
    pub update_count: usize,
}

impl CiSignal {
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self {
            has_updates: summary.has_updates(),
            update_count: summary.update_count(),
        }
    }

    pub fn lines(&self) -> [String; 2] {
        [
            format!("has_updates={}", self.has_updates),
            format!("update_count={}", self.update_count),
        ]
    }

    /// Print the flags and append them to `github_output` if given.
    pub fn emit(&self, github_output: Option<&Path>) -> Result<()> {
        for line in self.lines() {
            println!("{line}");
        }

        if let Some(path) = github_output {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            for line in self.lines() {
                writeln!(file, "{line}")?;
            }
            log::debug!("Wrote CI outputs to {}", path.display());
        }
        Ok(())
    }
}
