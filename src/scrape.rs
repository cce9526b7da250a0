//! The scraping pipeline: one site end to end, and the multi-site fan-out.
//!
//! [`SiteScraper`] orchestrates fetch → extract → date normalization →
//! validation for a single [`SiteConfig`]. Only a landing-page fetch failure
//! (or an uncompilable selector) aborts a site; everything below that level
//! is a soft condition handled card by card.
//!
//! [`scrape_all`] fans the site scraper out across many configurations as
//! bounded concurrent tasks. Per-site failures are recorded and isolated: a
//! multi-site run always completes and always yields a report entry for every
//! configured site.

use crate::config::{SelectorError, Selectors, SiteConfig};
use crate::dates;
use crate::extract::{self, CardCandidate, RawDate};
use crate::fetch::{Fetch, FetchError};
use crate::models::{Article, ArticleDraft, ScrapeReport, SiteReport};
use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, error, info, instrument, warn};

/// A failure that aborts one site's scrape.
///
/// Caught by [`scrape_all`], which records an empty failed report for the
/// site and moves on; a single site can never take down the run.
#[derive(Debug, thiserror::Error)]
pub enum SiteScrapeError {
    #[error("landing page fetch failed: {0}")]
    LandingFetch(#[from] FetchError),
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
}

/// Scrapes one configured site into an ordered list of [`Article`]s.
///
/// All mutable pipeline state — the seen-links set, the growing article
/// list — is local to a single [`SiteScraper::scrape`] call, so site
/// pipelines can run concurrently without sharing anything.
pub struct SiteScraper<'a, F> {
    config: &'a SiteConfig,
    fetcher: &'a F,
}

impl<'a, F: Fetch> SiteScraper<'a, F> {
    pub fn new(config: &'a SiteConfig, fetcher: &'a F) -> Self {
        Self { config, fetcher }
    }

    /// Scrape the configured site.
    ///
    /// Fetches the landing page (`news_url`, else `base_url`), extracts card
    /// candidates, resolves each candidate's date — fetching the article's
    /// own page at most once when the landing page lacks the date node — and
    /// validates. Returned articles follow document order of sections and
    /// cards, minus soft-skipped and dropped entries.
    ///
    /// # Errors
    ///
    /// [`SiteScrapeError`] when a configured selector does not compile or the
    /// landing-page fetch fails. Nothing else escalates: invalid candidates
    /// and date problems are logged and handled locally.
    #[instrument(level = "info", skip_all, fields(site = %self.config.site_name()))]
    pub async fn scrape(&self) -> Result<Vec<Article>, SiteScrapeError> {
        let selectors = self.config.compile()?;
        let landing_url = self.config.landing_url().to_string();

        info!(url = %landing_url, "Starting site scrape");
        let body = self.fetcher.fetch(&landing_url).await?;

        // Parse and extract in one sync block so the document never lives
        // across an await point.
        let candidates = {
            let document = Html::parse_document(&body);
            extract::extract_candidates(&document, self.config, &selectors)
        };
        debug!(count = candidates.len(), "Extracted card candidates");

        let site_name = self.config.site_name();
        let mut articles = Vec::new();
        for candidate in candidates {
            let normalized = self.resolve_date(&candidate, &selectors).await;
            let draft = ArticleDraft {
                site_name: site_name.clone(),
                title: candidate.title,
                url: candidate.url,
                published_date: normalized.date,
                date_defaulted: normalized.defaulted,
                summary: candidate.summary,
            };
            match draft.validate() {
                Ok(article) => {
                    debug!(title = %article.title, url = %article.url, "Added article");
                    articles.push(article);
                }
                Err(e) => warn!(error = %e, "Dropping invalid candidate"),
            }
        }

        info!(count = articles.len(), "Site scrape complete");
        Ok(articles)
    }

    /// Resolve a candidate's raw date, then normalize it.
    ///
    /// [`RawDate::NeedsPageFetch`] triggers the pipeline's only nested
    /// network operation: one fetch of the article's own page, re-applying
    /// the same date selector. A failed fetch, or a page that also lacks the
    /// date node, keeps the "today" fallback; there is no second attempt and
    /// no recursion.
    async fn resolve_date(
        &self,
        candidate: &CardCandidate,
        selectors: &Selectors,
    ) -> dates::NormalizedDate {
        let raw = match &candidate.date {
            RawDate::Value(value) => Some(value.clone()),
            RawDate::Missing => None,
            RawDate::NeedsPageFetch => self.fetch_date_from_article(&candidate.url, selectors).await,
        };
        dates::normalize(raw.as_deref())
    }

    async fn fetch_date_from_article(&self, url: &str, selectors: &Selectors) -> Option<String> {
        // NeedsPageFetch is only produced when a date selector is configured.
        let date_selector = selectors.date.as_ref()?;
        match self.fetcher.fetch(url).await {
            Ok(body) => {
                let value =
                    extract::date_from_article_page(&body, date_selector, &self.config.date_attribute);
                if value.is_none() {
                    warn!(%url, "Article page also lacks the date node; keeping fallback");
                }
                value
            }
            Err(e) => {
                warn!(%url, error = %e, "Date fallback fetch failed; keeping fallback");
                None
            }
        }
    }
}

/// Scrape every configured site and aggregate the results per site.
///
/// Sites run as concurrent tasks, at most `parallelism` in flight (values
/// below 1 are treated as 1, which reproduces fully sequential behavior).
/// Each site's pipeline state stays local to its task; each writes only its
/// own slot of the report.
///
/// A site that fails with [`SiteScrapeError`] is recorded as an empty failed
/// entry and the remaining sites proceed untouched — the run never raises
/// and every configured site appears in the returned report.
#[instrument(level = "info", skip_all, fields(sites = configs.len()))]
pub async fn scrape_all<F: Fetch + Sync>(
    fetcher: &F,
    configs: &[SiteConfig],
    parallelism: usize,
) -> ScrapeReport {
    let results: Vec<(String, SiteReport)> = stream::iter(configs)
        .map(|config| async move {
            let site_name = config.site_name();
            match SiteScraper::new(config, fetcher).scrape().await {
                Ok(articles) => (site_name, SiteReport::scraped(articles)),
                Err(e) => {
                    error!(site = %site_name, error = %e, "Site scrape failed");
                    (site_name, SiteReport::failed(e.to_string()))
                }
            }
        })
        .buffer_unordered(parallelism.max(1))
        .collect()
        .await;

    let mut report = ScrapeReport::default();
    for (site_name, site_report) in results {
        report.sites.insert(site_name, site_report);
    }

    for (site_name, site_report) in &report.sites {
        debug!(
            site = %site_name,
            count = site_report.articles.len(),
            failed = site_report.is_failed(),
            "Site result"
        );
    }
    info!(
        sites = report.sites.len(),
        articles = report.article_count(),
        failed_sites = report.failed_sites().len(),
        "All sites scraped"
    );
    report
}
