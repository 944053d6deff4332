// src/pipeline/watch.rs

//! Site watching pipeline.

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{
    ChangeSet, ChangeStatus, Config, GlobalSnapshot, Representation, RunMode, RunSummary,
    SiteConfig, SiteOutcome, SiteResult, SiteSnapshot, SitesFile,
};
use crate::services::{ChangeDetector, EventExtractor, ReportBuilder, SignatureExtractor};
use crate::storage::SnapshotStore;
use crate::utils::http::PageFetcher;
use crate::utils::log::{header, summary as log_summary};

/// Checks single sites: fetch, reduce, compare.
pub struct SiteChecker {
    mode: RunMode,
    events: EventExtractor,
    signature: SignatureExtractor,
    detector: ChangeDetector,
}

impl SiteChecker {
    pub fn new(config: &Config) -> Self {
        Self {
            mode: config.mode,
            events: EventExtractor::new(config.extraction.clone()),
            signature: SignatureExtractor::new(config.extraction.clone()),
            detector: ChangeDetector::new(),
        }
    }

    /// Reduce fetched content to the representation of the current mode.
    pub fn reduce(&self, site: &SiteConfig, content: &str) -> Result<Representation> {
        if content.trim().is_empty() {
            return Err(AppError::parse(&site.name, "empty page body"));
        }
        Ok(match self.mode {
            RunMode::Signature => Representation::Signature(self.signature.extract(content)),
            RunMode::Events => Representation::Events(self.events.extract(content, site)),
        })
    }

    /// Check one site. Failures are recorded in the result, never returned.
    pub async fn check(
        &self,
        site: &SiteConfig,
        fetcher: &dyn PageFetcher,
        previous: Option<&SiteSnapshot>,
    ) -> (SiteResult, Option<Representation>) {
        log::info!("Checking {} ({})", site.name, site.url);

        let observed = match fetcher.fetch(&site.name, &site.url).await {
            Ok(content) => self.reduce(site, &content),
            Err(e) => Err(e),
        };

        match observed {
            Ok(current) => {
                if let Some(stored) = previous.filter(|p| p.kind() != current.kind()) {
                    log::info!(
                        "[{}] stored {} snapshot does not match {} mode",
                        site.name,
                        stored.kind(),
                        current.kind()
                    );
                }
                let changes = self.detector.detect(previous, &current);
                match changes.status() {
                    ChangeStatus::FirstCheck => {
                        log::info!("[{}] first check, recording initial state", site.name)
                    }
                    ChangeStatus::Updated => log::info!(
                        "[{}] update detected ({} change(s))",
                        site.name,
                        changes.change_count()
                    ),
                    ChangeStatus::Unchanged => log::info!("[{}] no new updates", site.name),
                }
                if let ChangeSet::Events { new_events, .. } = &changes {
                    for record in new_events {
                        log::debug!("[{}] new: {}", site.name, record.label());
                    }
                }
                let result = SiteResult {
                    name: site.name.clone(),
                    url: site.url.clone(),
                    outcome: SiteOutcome::Checked(changes),
                };
                (result, Some(current))
            }
            Err(e) => {
                if e.is_site_local() {
                    log::warn!("[{}] skipped this run: {}", site.name, e);
                } else {
                    log::error!("[{}] skipped this run: {}", site.name, e);
                }
                let result = SiteResult {
                    name: site.name.clone(),
                    url: site.url.clone(),
                    outcome: SiteOutcome::Failed {
                        reason: e.to_string(),
                    },
                };
                (result, None)
            }
        }
    }
}

/// Run one watch cycle over every enabled site.
///
/// The snapshot is read once before any site is checked and written at most
/// once after all sites complete. Sites that fail keep their previous
/// snapshot. The report file is written on every run.
pub async fn run_watch(
    config: &Config,
    sites: &SitesFile,
    fetcher: &dyn PageFetcher,
    store: &dyn SnapshotStore,
) -> Result<RunSummary> {
    let checked_at = Utc::now();
    let reporter = ReportBuilder::new(config.report.clone());
    let mut summary = RunSummary::new(config.mode, checked_at);

    header(&format!("Site watch ({} mode)", config.mode));

    let enabled: Vec<&SiteConfig> = sites.enabled().collect();
    if enabled.is_empty() {
        log::error!("No enabled sites configured");
        store.write_report(&reporter.no_updates(checked_at)).await?;
        return Ok(summary);
    }
    log::info!("Checking {} site(s)", enabled.len());

    let previous = store.load_snapshot().await?;
    let checker = SiteChecker::new(config);
    let concurrency = config.fetcher.max_concurrent.max(1);

    // `buffered` keeps configuration order regardless of completion order.
    let checks: Vec<_> = stream::iter(enabled)
        .map(|site| checker.check(site, fetcher, previous.get(&site.name)))
        .buffered(concurrency)
        .collect()
        .await;

    let mut next: GlobalSnapshot = previous.clone();
    for (result, current) in checks {
        if let Some(current) = current {
            next.insert(
                result.name.clone(),
                SiteSnapshot::from_representation(&current, checked_at),
            );
        }
        summary.results.push(result);
    }

    if summary.success_count() > 0 {
        store.save_snapshot(&next).await?;
    } else {
        log::warn!("No site could be checked, keeping the previous state");
    }

    let report = reporter.render(&summary);
    store.write_report(&report).await?;

    log_summary(
        "Watch complete",
        &[
            ("Sites checked", summary.success_count().to_string()),
            ("Sites failed", summary.failures().count().to_string()),
            ("Sites updated", summary.updated_sites().count().to_string()),
            ("Updates", summary.update_count().to_string()),
        ],
    );

    Ok(summary)
}
