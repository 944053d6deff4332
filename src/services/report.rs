// src/services/report.rs

//! Markdown report rendering.
//!
//! Every rendered preview or description is cut to the configured character
//! cap, ellipsis included.

use chrono::{DateTime, Utc};

use crate::models::{
    ChangeSet, ChangeStatus, EventRecord, HashRecord, ReportConfig, RunMode, RunSummary,
    SiteOutcome, SiteResult, StructuredEvent,
};
use crate::utils::text::truncate_with_ellipsis;

const SECTION_RULE: &str = "---\n\n";

/// Renders run results into a Markdown report.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render a report, or `None` when no site changed.
    pub fn build(&self, summary: &RunSummary) -> Option<String> {
        if !summary.has_updates() {
            return None;
        }

        let mut out = String::new();
        self.write_summary(&mut out, summary);
        self.write_title(&mut out, "🎯 Site Update Report", summary.checked_at);

        for (site, changes) in summary.updated_sites() {
            self.write_site(&mut out, site, changes);
        }

        self.write_failures(&mut out, summary);
        Some(out)
    }

    /// Fixed document written when nothing changed.
    pub fn no_updates(&self, checked_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        self.write_title(&mut out, "✅ No Updates", checked_at);
        out.push_str("None of the monitored sites reported new updates.\n");
        out
    }

    /// Report when there are changes, otherwise the fixed no-updates document.
    pub fn render(&self, summary: &RunSummary) -> String {
        self.build(summary)
            .unwrap_or_else(|| self.no_updates(summary.checked_at))
    }

    fn write_title(&self, out: &mut String, title: &str, checked_at: DateTime<Utc>) {
        out.push_str(&format!(
            "# {title}\n\nChecked at: {} UTC\n\n",
            checked_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(SECTION_RULE);
    }

    fn write_summary(&self, out: &mut String, summary: &RunSummary) {
        let sites = summary.updated_sites().count();
        out.push_str("## 📊 Summary\n\n");
        out.push_str(&match summary.mode {
            RunMode::Signature => format!("**{sites}** site(s) have updates\n\n"),
            RunMode::Events => format!(
                "**{}** new event(s) across **{sites}** site(s)\n\n",
                summary.update_count()
            ),
        });
        out.push_str(SECTION_RULE);
    }

    fn write_site(&self, out: &mut String, site: &SiteResult, changes: &ChangeSet) {
        out.push_str(&format!("## 📌 {}\n\n", site.name));

        match changes {
            ChangeSet::Signature {
                status, preview, ..
            } => {
                let headline = status_line(*status, "Page content updated");
                out.push_str(&format!("**{headline}**\n\n"));
                let previews: Vec<_> = preview.iter().take(self.config.max_previews).collect();
                if !previews.is_empty() {
                    out.push_str("**Preview:**\n\n");
                    for (i, text) in previews.iter().enumerate() {
                        let text = truncate_with_ellipsis(text, self.config.preview_limit);
                        out.push_str(&format!("{}. {text}\n\n", i + 1));
                    }
                }
            }
            ChangeSet::Events { status, new_events } => {
                let headline = status_line(*status, "New events detected");
                out.push_str(&format!("**{headline}** ({} new)\n\n", new_events.len()));
                for record in new_events {
                    match record {
                        EventRecord::Event(event) => self.write_event(out, event),
                        EventRecord::PageHash(hash) => self.write_page_hash(out, hash),
                    }
                }
            }
        }

        out.push_str(&format!("🔗 [View full page]({})\n\n", site.url));
        out.push_str(SECTION_RULE);
    }

    fn write_event(&self, out: &mut String, event: &StructuredEvent) {
        out.push_str(&format!("### {}\n\n", event.title));
        if !event.date.is_empty() {
            out.push_str(&format!("- 📅 {}\n", event.date));
        }
        if !event.description.is_empty() {
            let description =
                truncate_with_ellipsis(&event.description, self.config.description_limit);
            out.push_str(&format!("- 📝 {description}\n"));
        }
        if !event.link.is_empty() {
            out.push_str(&format!("- 🔗 [Details]({})\n", event.link));
        }
        out.push('\n');
    }

    fn write_page_hash(&self, out: &mut String, record: &HashRecord) {
        out.push_str(&format!(
            "**✨ Page content changed** (fingerprint `{}`)\n\n",
            record.page_hash
        ));
        if !record.content_preview.is_empty() {
            let preview =
                truncate_with_ellipsis(&record.content_preview, self.config.preview_limit);
            out.push_str(&format!("> {preview}\n\n"));
        }
    }

    fn write_failures(&self, out: &mut String, summary: &RunSummary) {
        let failures: Vec<_> = summary.failures().collect();
        if failures.is_empty() {
            return;
        }
        out.push_str("## ⚠️ Errors\n\n");
        for site in failures {
            if let SiteOutcome::Failed { reason } = &site.outcome {
                out.push_str(&format!("- {}: {}\n", site.name, reason));
            }
        }
        out.push('\n');
    }
}

fn status_line(status: ChangeStatus, update: &str) -> String {
    match status {
        ChangeStatus::FirstCheck => "📝 First check, initial state recorded".to_string(),
        _ => format!("✨ {update}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::text::char_len;

    fn summary(mode: RunMode, results: Vec<SiteResult>) -> RunSummary {
        let mut summary = RunSummary::new(mode, Utc::now());
        summary.results = results;
        summary
    }

    fn checked(name: &str, changes: ChangeSet) -> SiteResult {
        SiteResult {
            name: name.to_string(),
            url: format!("https://{name}.example/"),
            outcome: SiteOutcome::Checked(changes),
        }
    }

    fn signature(status: ChangeStatus, preview: Vec<String>) -> ChangeSet {
        ChangeSet::Signature {
            status,
            preview,
            content_length: 100,
        }
    }

    #[test]
    fn test_no_report_without_changes() {
        let s = summary(
            RunMode::Signature,
            vec![checked("a", signature(ChangeStatus::Unchanged, vec![]))],
        );
        let builder = ReportBuilder::default();
        assert!(builder.build(&s).is_none());
        assert!(builder.render(&s).starts_with("# ✅ No Updates"));
    }

    #[test]
    fn test_first_check_flagged() {
        let s = summary(
            RunMode::Signature,
            vec![checked("a", signature(ChangeStatus::FirstCheck, vec![]))],
        );
        let report = ReportBuilder::default().build(&s).unwrap();
        assert!(report.contains("**1** site(s) have updates"));
        assert!(report.contains("## 📌 a"));
        assert!(report.contains("First check"));
        assert!(report.contains("(https://a.example/)"));
    }

    #[test]
    fn test_signature_previews_bounded() {
        let previews: Vec<String> = (0..5).map(|i| format!("{i}{}", "p".repeat(300))).collect();
        let s = summary(
            RunMode::Signature,
            vec![checked("a", signature(ChangeStatus::Updated, previews))],
        );
        let report = ReportBuilder::default().build(&s).unwrap();

        let lines: Vec<&str> = report
            .lines()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()) && l.contains(". "))
            .collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let (_, text) = line.split_once(". ").unwrap();
            assert!(char_len(text) <= 150);
        }
        assert!(report.contains("Page content updated"));
    }

    #[test]
    fn test_event_mode_renders_each_variant() {
        let event = EventRecord::Event(StructuredEvent {
            title: "Open Day".into(),
            date: "2026-05-03".into(),
            description: "x".repeat(400),
            link: "https://b.example/open-day".into(),
            source: "b".into(),
            source_url: "https://b.example/".into(),
        });
        let hash = EventRecord::PageHash(HashRecord {
            page_hash: "0123456789abcdef".into(),
            content_preview: "y".repeat(600),
            source: "c".into(),
            source_url: "https://c.example/".into(),
        });
        let s = summary(
            RunMode::Events,
            vec![
                checked(
                    "b",
                    ChangeSet::Events {
                        status: ChangeStatus::Updated,
                        new_events: vec![event],
                    },
                ),
                checked(
                    "c",
                    ChangeSet::Events {
                        status: ChangeStatus::Updated,
                        new_events: vec![hash],
                    },
                ),
            ],
        );
        let report = ReportBuilder::default().build(&s).unwrap();

        assert!(report.contains("**2** new event(s) across **2** site(s)"));
        assert!(report.contains("### Open Day"));
        assert!(report.contains("- 📅 2026-05-03"));
        assert!(report.contains("[Details](https://b.example/open-day)"));
        assert!(report.contains("fingerprint `0123456789abcdef`"));

        let description = report
            .lines()
            .find_map(|l| l.strip_prefix("- 📝 "))
            .unwrap();
        assert!(char_len(description) <= 300);
        let preview = report.lines().find_map(|l| l.strip_prefix("> ")).unwrap();
        assert!(char_len(preview) <= 150);
    }

    #[test]
    fn test_exact_layout() {
        use chrono::TimeZone;

        let checked_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        let builder = ReportBuilder::default();
        assert_eq!(
            builder.no_updates(checked_at),
            "# ✅ No Updates\n\nChecked at: 2026-03-01 08:30:00 UTC\n\n---\n\n\
             None of the monitored sites reported new updates.\n"
        );

        let mut s = summary(
            RunMode::Signature,
            vec![checked("a", signature(ChangeStatus::Updated, vec!["hello".into()]))],
        );
        s.checked_at = checked_at;
        assert_eq!(
            builder.build(&s).unwrap(),
            "## 📊 Summary\n\n**1** site(s) have updates\n\n---\n\n\
             # 🎯 Site Update Report\n\nChecked at: 2026-03-01 08:30:00 UTC\n\n---\n\n\
             ## 📌 a\n\n**✨ Page content updated**\n\n**Preview:**\n\n1. hello\n\n\
             🔗 [View full page](https://a.example/)\n\n---\n\n"
        );
    }

    #[test]
    fn test_failures_listed() {
        let s = summary(
            RunMode::Signature,
            vec![
                checked("a", signature(ChangeStatus::Updated, vec![])),
                SiteResult {
                    name: "down".into(),
                    url: "https://down.example/".into(),
                    outcome: SiteOutcome::Failed {
                        reason: "HTTP 503".into(),
                    },
                },
            ],
        );
        let report = ReportBuilder::default().build(&s).unwrap();
        assert!(report.contains("- down: HTTP 503"));
        assert!(!report.contains("## 📌 down"));
    }
}
