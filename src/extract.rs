//! Structural extraction of article candidates from a landing page.
//!
//! Applies a [`SiteConfig`]'s compiled selectors against a parsed document:
//! sections are located in document order, cards within each section, and
//! title/link/summary/date within each card. A card missing anything required
//! is *soft-skipped* — dropped with a logged reason, never aborting the
//! section or the site.
//!
//! Extraction is a pure synchronous pass. The one piece of the pipeline that
//! may need a second network round-trip — reading the date off the article's
//! own page — is only *marked* here ([`RawDate::NeedsPageFetch`]); the site
//! scraper performs that fetch after the landing document is dropped, so the
//! non-`Send` parse tree never lives across an await point.

use crate::config::{Selectors, SiteConfig};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Where a candidate's raw date value stands after the landing-page pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    /// The configured attribute was read off a matched node (or the card).
    Value(String),
    /// No value on the page; normalization will fall back to today.
    Missing,
    /// A `date_selector` is configured but matched nothing within the card;
    /// the article's own page should be fetched once and re-queried.
    NeedsPageFetch,
}

/// One card that survived extraction, awaiting date resolution and
/// validation.
#[derive(Debug, Clone)]
pub struct CardCandidate {
    /// Resolved absolute article URL.
    pub url: String,
    /// Raw title text, whitespace-trimmed.
    pub title: String,
    /// Raw summary text, blank when unconfigured or unmatched.
    pub summary: String,
    /// Raw date value, or what to do about its absence.
    pub date: RawDate,
}

/// Extract card candidates from a parsed landing page, in document order.
///
/// Per-card soft-skip rules, applied in order:
/// - no `link_selector` match, or the matched node has no `href`
/// - the href does not resolve against `base_url`
/// - `keyword` is configured and the resolved URL does not contain it
/// - the resolved URL was already seen in this pass (per-site dedup)
/// - no `title_selector` match
///
/// The seen-URL set is scoped to this call; deduplication is per run, never
/// across runs.
pub fn extract_candidates(
    document: &Html,
    config: &SiteConfig,
    selectors: &Selectors,
) -> Vec<CardCandidate> {
    let mut candidates = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for section in document.select(&selectors.section) {
        let cards: Vec<ElementRef> = section.select(&selectors.card).collect();
        debug!(count = cards.len(), "Found cards in section");

        for card in cards {
            let Some(link_node) = card.select(&selectors.link).next() else {
                warn!("No link node in card; skipping");
                continue;
            };
            let Some(href) = link_node.value().attr("href") else {
                warn!("Link node has no href; skipping");
                continue;
            };

            let url = match config.base_url.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(e) => {
                    warn!(href, error = %e, "Unresolvable link; skipping");
                    continue;
                }
            };

            if let Some(keyword) = &config.keyword
                && !url.contains(keyword.as_str())
            {
                debug!(%url, keyword, "Link does not contain keyword; skipping");
                continue;
            }

            if !seen_urls.insert(url.clone()) {
                debug!(%url, "Duplicate link; skipping");
                continue;
            }

            let Some(title_node) = card.select(&selectors.title).next() else {
                warn!(%url, "No title node in card; skipping");
                continue;
            };
            let title = node_text(title_node);

            let summary = selectors
                .summary
                .as_ref()
                .and_then(|sel| card.select(sel).next())
                .map(node_text)
                .unwrap_or_default();

            let date = card_date(card, selectors, &config.date_attribute);

            candidates.push(CardCandidate { url, title, summary, date });
        }
    }

    candidates
}

/// Raw date for one card, per the configured selector.
///
/// With a `date_selector`: attribute of the first match within the card, or
/// [`RawDate::NeedsPageFetch`] when nothing matches. Without one: attribute
/// read directly off the card node.
fn card_date(card: ElementRef, selectors: &Selectors, date_attribute: &str) -> RawDate {
    match &selectors.date {
        Some(date_selector) => match card.select(date_selector).next() {
            Some(node) => attr_or_missing(node, date_attribute),
            None => RawDate::NeedsPageFetch,
        },
        None => attr_or_missing(card, date_attribute),
    }
}

fn attr_or_missing(node: ElementRef, attribute: &str) -> RawDate {
    match node.value().attr(attribute) {
        Some(value) => RawDate::Value(value.to_string()),
        None => RawDate::Missing,
    }
}

/// Re-apply a date selector against an article's own page.
///
/// This backs the one-shot fallback fetch: the whole page is queried (not
/// just a card subtree) and the first match's attribute wins. `None` when
/// nothing matches or the attribute is absent — the caller keeps the "today"
/// fallback and never recurses further.
pub fn date_from_article_page(
    html: &str,
    date_selector: &Selector,
    date_attribute: &str,
) -> Option<String> {
    let document = Html::parse_document(html);
    let node = document.select(date_selector).next()?;
    node.value().attr(date_attribute).map(str::to_string)
}

fn node_text(node: ElementRef) -> String {
    node.text().collect::<Vec<_>>().join(" ").trim().to_string()
}
