//! # News Harvester
//!
//! A configurable multi-site news scraper. Instead of one hand-written
//! scraper per outlet, each site is described declaratively by a
//! [`SiteConfig`]: CSS selectors naming where the sections, article cards,
//! titles, links, summaries, and dates live on its landing page. The same
//! pipeline then scrapes any number of such sites and aggregates the results.
//!
//! ## Pipeline
//!
//! For each configured site:
//! 1. **Fetch**: Download the landing page (`news_url`, or `base_url`)
//! 2. **Extract**: Locate sections, then cards, then each card's fields;
//!    resolve relative links, filter by keyword, deduplicate within the run
//! 3. **Normalize**: Turn heterogeneous raw date values (epoch milliseconds,
//!    ISO 8601, natural-language forms) into calendar dates, defaulting to
//!    today when unparsable
//! 4. **Validate**: Drop candidates with empty titles or malformed URLs
//!
//! Cards with missing pieces are soft-skipped; only a landing-page fetch
//! failure aborts a site, and [`scrape_all`] isolates even that — a failed
//! site is recorded as an empty entry and every other site proceeds.
//!
//! ## Example
//!
//! ```no_run
//! use news_harvester::{HttpFetcher, SiteConfig, scrape_all, sites_from_yaml};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let configs: Vec<SiteConfig> = sites_from_yaml(&std::fs::read_to_string("sites.yaml")?)?;
//! let fetcher = HttpFetcher::new()?;
//! let report = scrape_all(&fetcher, &configs, 4).await;
//! for (site, result) in &report.sites {
//!     println!("{site}: {} articles", result.articles.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The crate ends at the report: persisting or uploading articles, loading
//! configuration from disk, and installing a `tracing` subscriber are the
//! caller's concern.

pub mod config;
pub mod dates;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod scrape;

pub use config::{ConfigError, SelectorError, SiteConfig, sites_from_yaml};
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use models::{Article, ScrapeReport, SiteReport, ValidationError};
pub use scrape::{SiteScraper, SiteScrapeError, scrape_all};
