// src/services/extractor.rs

//! Event extraction service.
//!
//! Reduces a page to structured event records using the site's declarative
//! selector rules. When no structured event survives, the page degrades to a
//! single hash record so changes are still detected at page granularity.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    EventRecord, ExtractionConfig, Field, HashRecord, SelectorRules, SiteConfig,
    StructuredEvent,
};
use crate::utils::resolve_url;
use crate::utils::text::{normalize_whitespace, sha256_hex, truncate, visible_text};

/// Elements considered by the container heuristic.
const CONTAINER_TAGS: [&str; 4] = ["article", "div", "li", "section"];

/// Class name fragments that mark an element as an event container.
const CONTAINER_CLASS_HINTS: [&str; 4] = ["event", "post", "item", "entry"];

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));

/// Selector rules parsed once per page.
struct CompiledRules {
    container: Vec<Selector>,
    title: Vec<Selector>,
    date: Vec<Selector>,
    description: Vec<Selector>,
    link: Vec<Selector>,
}

impl CompiledRules {
    fn compile(site: &str, rules: &SelectorRules) -> Self {
        let field = |f: Field| compile_list(site, f.as_str(), &rules.for_field(f));
        let container: Vec<&str> = rules.container.iter().map(String::as_str).collect();
        Self {
            container: compile_list(site, "container", &container),
            title: field(Field::Title),
            date: field(Field::Date),
            description: field(Field::Description),
            link: field(Field::Link),
        }
    }
}

/// Service for extracting event records from page content.
#[derive(Debug, Clone, Default)]
pub struct EventExtractor {
    config: ExtractionConfig,
}

impl EventExtractor {
    /// Create a new extractor with the given limits.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract records from `content` fetched from `site.url`.
    ///
    /// Always returns at least one record: structured events when any
    /// candidate has a title, otherwise exactly one hash record.
    pub fn extract(&self, content: &str, site: &SiteConfig) -> Vec<EventRecord> {
        let document = Html::parse_document(content);

        if let Some(rules) = &site.selectors {
            let events = self.extract_events(&document, rules, site);
            if !events.is_empty() {
                log::debug!("[{}] extracted {} events", site.name, events.len());
                return events.into_iter().map(EventRecord::from).collect();
            }
            log::info!(
                "[{}] no structured events found, falling back to page hash",
                site.name
            );
        }

        vec![self.fallback_record(&document, site).into()]
    }

    fn extract_events(
        &self,
        document: &Html,
        rules: &SelectorRules,
        site: &SiteConfig,
    ) -> Vec<StructuredEvent> {
        let compiled = CompiledRules::compile(&site.name, rules);
        let base_url = Url::parse(&site.url).ok();

        self.find_containers(document, &compiled.container)
            .into_iter()
            .filter_map(|container| {
                self.parse_container(container, &compiled, site, base_url.as_ref())
            })
            .collect()
    }

    /// Containers matched by any configured selector, or by the class-name
    /// heuristic when none match. Deduplicated, in document order, capped.
    fn find_containers<'a>(
        &self,
        document: &'a Html,
        selectors: &[Selector],
    ) -> Vec<ElementRef<'a>> {
        let matched: HashSet<_> = selectors
            .iter()
            .flat_map(|sel| document.select(sel))
            .map(|el| el.id())
            .collect();

        let in_order = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap);

        let containers: Vec<ElementRef<'a>> = if matched.is_empty() {
            in_order.filter(|el| is_container_like(el)).collect()
        } else {
            in_order.filter(|el| matched.contains(&el.id())).collect()
        };

        containers
            .into_iter()
            .take(self.config.max_containers)
            .collect()
    }

    fn parse_container(
        &self,
        container: ElementRef<'_>,
        rules: &CompiledRules,
        site: &SiteConfig,
        base_url: Option<&Url>,
    ) -> Option<StructuredEvent> {
        let title = first_match(container, &rules.title).map(element_text)?;
        if title.is_empty() {
            return None;
        }

        let date = first_match(container, &rules.date)
            .map(element_text)
            .unwrap_or_default();

        let description = first_match(container, &rules.description)
            .map(|el| truncate(&element_text(el), self.config.description_limit))
            .unwrap_or_default();

        let link = first_match(container, &rules.link)
            .and_then(link_href)
            .map(|href| match base_url {
                Some(base) => resolve_url(base, href),
                None => href.to_string(),
            })
            .unwrap_or_default();

        Some(StructuredEvent {
            title,
            date,
            description,
            link,
            source: site.name.clone(),
            source_url: site.url.clone(),
        })
    }

    /// Whole-page record used when structured extraction yields nothing.
    fn fallback_record(&self, document: &Html, site: &SiteConfig) -> HashRecord {
        let text = normalize_whitespace(&visible_text(document.root_element()));
        let page_hash: String = sha256_hex(&text)
            .chars()
            .take(self.config.hash_prefix_len.max(1))
            .collect();

        HashRecord {
            page_hash,
            content_preview: truncate(&text, self.config.content_preview_limit),
            source: site.name.clone(),
            source_url: site.url.clone(),
        }
    }
}

/// Parse a CSS selector.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Parse every selector, logging and skipping invalid ones.
fn compile_list(site: &str, group: &str, selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match parse_selector(s) {
            Ok(sel) => Some(sel),
            Err(e) => {
                log::warn!("[{site}] skipping {group} selector: {e}");
                None
            }
        })
        .collect()
}

/// First element matched by the first selector that matches anything.
fn first_match<'a>(container: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|sel| container.select(sel).next())
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&visible_text(el))
}

fn link_href(el: ElementRef<'_>) -> Option<&str> {
    el.value()
        .attr("href")
        .or_else(|| el.select(&ANCHOR).next().and_then(|a| a.value().attr("href")))
        .filter(|href| !href.trim().is_empty())
}

fn is_container_like(el: &ElementRef<'_>) -> bool {
    if !CONTAINER_TAGS.contains(&el.value().name()) {
        return false;
    }
    el.value().attr("class").is_some_and(|class| {
        let class = class.to_lowercase();
        CONTAINER_CLASS_HINTS.iter().any(|hint| class.contains(hint))
    })
}
