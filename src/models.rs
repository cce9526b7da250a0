//! Data models for scraped articles and the multi-site aggregate report.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`Article`]: A validated news article, immutable once constructed
//! - [`ArticleDraft`]: An extracted candidate awaiting validation
//! - [`SiteReport`] / [`ScrapeReport`]: Per-site and aggregate results
//!
//! Drafts become articles only through [`ArticleDraft::validate`], so every
//! `Article` a caller ever sees satisfies the schema constraints: non-empty
//! trimmed title, well-formed absolute URL, and a calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// A validated news article produced by one scrape run.
///
/// Articles are transient: produced, handed to the caller, and discarded.
/// They carry no persistent identity and are never mutated after validation.
///
/// # Fields
///
/// * `site_name` - Host of the configured `base_url` the article came from
/// * `title` - Non-empty, trimmed headline text
/// * `url` - Absolute article URL, unique within one site's run
/// * `published_date` - Publication date; today's date when the raw value
///   could not be parsed (see `date_defaulted`)
/// * `date_defaulted` - `true` when `published_date` is the fallback rather
///   than a value parsed from the page
/// * `summary` - Trimmed summary text, blank when the site offers none
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub site_name: String,
    pub title: String,
    pub url: Url,
    pub published_date: NaiveDate,
    #[serde(default)]
    pub date_defaulted: bool,
    #[serde(default)]
    pub summary: String,
}

/// An extracted candidate that has not yet passed validation.
///
/// Built by the site scraper from raw extraction output; the only way to
/// turn one into an [`Article`] is [`ArticleDraft::validate`].
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub site_name: String,
    pub title: String,
    pub url: String,
    pub published_date: NaiveDate,
    pub date_defaulted: bool,
    pub summary: String,
}

impl ArticleDraft {
    /// Enforce the article schema constraints.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::EmptyTitle`] - title is empty after trimming
    /// * [`ValidationError::InvalidUrl`] - URL is not a well-formed absolute URL
    ///
    /// The date needs no check here: normalization guarantees a valid
    /// calendar date.
    pub fn validate(self) -> Result<Article, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle { url: self.url });
        }
        let url = Url::parse(&self.url).map_err(|source| ValidationError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        Ok(Article {
            site_name: self.site_name,
            title: title.to_string(),
            url,
            published_date: self.published_date,
            date_defaulted: self.date_defaulted,
            summary: self.summary,
        })
    }
}

/// A candidate article that failed schema validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("article at {url} has an empty title")]
    EmptyTitle { url: String },
    #[error("article URL {url:?} is not a well-formed absolute URL")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The outcome of scraping one site.
///
/// Distinguishes a site that failed outright (`failure` is set, `articles`
/// empty) from a site that legitimately found nothing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteReport {
    pub articles: Vec<Article>,
    #[serde(default)]
    pub failure: Option<String>,
}

impl SiteReport {
    pub(crate) fn scraped(articles: Vec<Article>) -> Self {
        Self { articles, failure: None }
    }

    pub(crate) fn failed(reason: String) -> Self {
        Self { articles: Vec::new(), failure: Some(reason) }
    }

    /// Whether this site's scrape failed outright.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Aggregate result of a multi-site run, keyed by site name.
///
/// Every configured site gets an entry, even when its scrape failed; the
/// `BTreeMap` keeps iteration order deterministic regardless of which site
/// finished first.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ScrapeReport {
    pub sites: BTreeMap<String, SiteReport>,
}

impl ScrapeReport {
    /// Total number of articles across all sites.
    pub fn article_count(&self) -> usize {
        self.sites.values().map(|r| r.articles.len()).sum()
    }

    /// All articles in site-key order, flattened.
    pub fn all_articles(&self) -> impl Iterator<Item = &Article> {
        self.sites.values().flat_map(|r| r.articles.iter())
    }

    /// Names of the sites whose scrape failed outright.
    pub fn failed_sites(&self) -> Vec<&str> {
        self.sites
            .iter()
            .filter(|(_, r)| r.is_failed())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ArticleDraft {
        ArticleDraft {
            site_name: "example.com".to_string(),
            title: "  Story One  ".to_string(),
            url: "https://example.com/articles/1".to_string(),
            published_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            date_defaulted: false,
            summary: "A short summary".to_string(),
        }
    }

    #[test]
    fn test_validate_trims_title() {
        let article = draft().validate().unwrap();
        assert_eq!(article.title, "Story One");
        assert_eq!(article.url.as_str(), "https://example.com/articles/1");
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::EmptyTitle { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let mut d = draft();
        d.url = "/articles/1".to_string();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_article_serialization_round_trip() {
        let article = draft().validate().unwrap();
        let json = serde_json::to_string(&article).unwrap();
        assert!(json.contains("\"2024-01-02\""));
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn test_report_distinguishes_failed_from_empty() {
        let mut report = ScrapeReport::default();
        report
            .sites
            .insert("a.example".to_string(), SiteReport::failed("boom".to_string()));
        report
            .sites
            .insert("b.example".to_string(), SiteReport::scraped(Vec::new()));

        assert_eq!(report.failed_sites(), vec!["a.example"]);
        assert!(!report.sites["b.example"].is_failed());
        assert_eq!(report.article_count(), 0);
    }

    #[test]
    fn test_report_flattens_in_key_order() {
        let mut report = ScrapeReport::default();
        let mut first = draft();
        first.title = "From B".to_string();
        report.sites.insert(
            "b.example".to_string(),
            SiteReport::scraped(vec![first.validate().unwrap()]),
        );
        let mut second = draft();
        second.title = "From A".to_string();
        report.sites.insert(
            "a.example".to_string(),
            SiteReport::scraped(vec![second.validate().unwrap()]),
        );

        let titles: Vec<_> = report.all_articles().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["From A", "From B"]);
        assert_eq!(report.article_count(), 2);
    }
}
