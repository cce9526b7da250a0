//! Declarative per-site scraping configuration.
//!
//! A [`SiteConfig`] describes where articles live on one site's landing page:
//! which subtrees group article cards, where each card's title, link, summary,
//! and date are found, and how to read the raw date value. Configurations are
//! data, not code — the same pipeline scrapes any site whose markup can be
//! described with CSS selectors.
//!
//! Selector strings are compiled once per scrape via [`SiteConfig::compile`];
//! the resulting [`Selectors`] value is what the extractor actually queries
//! with.

use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

/// Extraction rules for a single news site.
///
/// Immutable once constructed. One `SiteConfig` produces zero or more
/// articles per scrape invocation.
///
/// # Fields
///
/// * `base_url` - Absolute root URL of the site; relative links resolve
///   against it and its host names the site in the aggregate report
/// * `news_url` - Optional direct URL of the news landing page; when absent,
///   `base_url` itself is fetched
/// * `section_selector` - Matches the subtrees grouping article cards
/// * `card_selector` - Matches one article teaser within a section
/// * `title_selector` - Matches the title node within a card
/// * `link_selector` - Matches the anchor node within a card
/// * `keyword` - Optional substring a resolved link must contain
/// * `summary_selector` - Optional; matches the summary node within a card
/// * `date_selector` - Optional; matches the date node within a card. When
///   absent the date attribute is read off the card node itself
/// * `date_attribute` - Attribute holding the raw date value (e.g. `datetime`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub base_url: Url,
    #[serde(default)]
    pub news_url: Option<Url>,
    pub section_selector: String,
    pub card_selector: String,
    pub title_selector: String,
    pub link_selector: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub summary_selector: Option<String>,
    #[serde(default)]
    pub date_selector: Option<String>,
    pub date_attribute: String,
}

impl SiteConfig {
    /// The page sections and cards are extracted from: `news_url` when
    /// configured, otherwise `base_url`.
    pub fn landing_url(&self) -> &Url {
        self.news_url.as_ref().unwrap_or(&self.base_url)
    }

    /// Site identifier used as the aggregate report key: the host component
    /// of `base_url`, or the full URL string for hostless URLs.
    pub fn site_name(&self) -> String {
        self.base_url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| self.base_url.to_string())
    }

    /// Compile every configured selector string.
    ///
    /// Called once at the start of a scrape so malformed selectors surface
    /// before any network traffic.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] naming the offending selector string if any
    /// configured selector is empty or fails to parse as a CSS selector.
    pub fn compile(&self) -> Result<Selectors, SelectorError> {
        Ok(Selectors {
            section: compile_one(&self.section_selector)?,
            card: compile_one(&self.card_selector)?,
            title: compile_one(&self.title_selector)?,
            link: compile_one(&self.link_selector)?,
            summary: self
                .summary_selector
                .as_deref()
                .map(compile_one)
                .transpose()?,
            date: self.date_selector.as_deref().map(compile_one).transpose()?,
        })
    }
}

fn compile_one(raw: &str) -> Result<Selector, SelectorError> {
    Selector::parse(raw).map_err(|e| SelectorError {
        selector: raw.to_string(),
        message: e.to_string(),
    })
}

/// The compiled form of a [`SiteConfig`]'s selector strings.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub section: Selector,
    pub card: Selector,
    pub title: Selector,
    pub link: Selector,
    pub summary: Option<Selector>,
    pub date: Option<Selector>,
}

/// A configured selector string that is not valid CSS.
#[derive(Debug, thiserror::Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Failure deserializing a site configuration list.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse site configuration: {0}")]
pub struct ConfigError(#[from] serde_yaml::Error);

/// Deserialize a YAML list of site configurations.
///
/// The crate takes no position on where configuration lives; callers that
/// keep theirs in YAML can hand the raw document here.
///
/// # Errors
///
/// Returns [`ConfigError`] if the document is not a valid list of
/// [`SiteConfig`] values.
pub fn sites_from_yaml(yaml: &str) -> Result<Vec<SiteConfig>, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SiteConfig {
        SiteConfig {
            base_url: Url::parse("https://example.com").unwrap(),
            news_url: None,
            section_selector: "section".to_string(),
            card_selector: "div.card".to_string(),
            title_selector: "h2".to_string(),
            link_selector: "a".to_string(),
            keyword: None,
            summary_selector: Some("p.summary".to_string()),
            date_selector: Some("time".to_string()),
            date_attribute: "datetime".to_string(),
        }
    }

    #[test]
    fn test_landing_url_defaults_to_base() {
        let cfg = config();
        assert_eq!(cfg.landing_url().as_str(), "https://example.com/");
    }

    #[test]
    fn test_landing_url_prefers_news_url() {
        let mut cfg = config();
        cfg.news_url = Some(Url::parse("https://example.com/news").unwrap());
        assert_eq!(cfg.landing_url().as_str(), "https://example.com/news");
    }

    #[test]
    fn test_site_name_is_host() {
        assert_eq!(config().site_name(), "example.com");
    }

    #[test]
    fn test_compile_valid_selectors() {
        let selectors = config().compile().unwrap();
        assert!(selectors.summary.is_some());
        assert!(selectors.date.is_some());
    }

    #[test]
    fn test_compile_rejects_invalid_selector() {
        let mut cfg = config();
        cfg.card_selector = "div..card".to_string();
        let err = cfg.compile().unwrap_err();
        assert_eq!(err.selector, "div..card");
    }

    #[test]
    fn test_compile_rejects_empty_selector() {
        let mut cfg = config();
        cfg.section_selector = String::new();
        assert!(cfg.compile().is_err());
    }

    #[test]
    fn test_sites_from_yaml() {
        let yaml = r#"
- base_url: "https://www.bbc.com"
  news_url: "https://www.bbc.com/news"
  section_selector: 'section[data-analytics-group="true"]'
  card_selector: 'div[data-testid="anchor-inner-wrapper"]'
  title_selector: "h2"
  link_selector: "a"
  keyword: "article"
  summary_selector: "p[data-testid='card-description']"
  date_selector: "time"
  date_attribute: "datetime"
- base_url: "https://apnews.com/"
  section_selector: "div.FourColumnContainer-column"
  card_selector: "div.PagePromo"
  title_selector: "span.PagePromoContentIcons-text"
  link_selector: "a"
  date_attribute: "data-posted-date-timestamp"
"#;
        let configs = sites_from_yaml(yaml).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].site_name(), "www.bbc.com");
        assert_eq!(configs[0].keyword.as_deref(), Some("article"));
        assert!(configs[1].news_url.is_none());
        assert!(configs[1].date_selector.is_none());
        assert_eq!(configs[1].date_attribute, "data-posted-date-timestamp");
    }

    #[test]
    fn test_sites_from_yaml_rejects_missing_required_field() {
        let yaml = r#"
- base_url: "https://example.com"
  section_selector: "section"
"#;
        assert!(sites_from_yaml(yaml).is_err());
    }
}
