//! Site-specific recipe sources.
//!
//! Each source knows how to page through one site's listing and how to turn
//! one of its detail pages into a [`Recipe`]. The harvester only talks to the
//! [`RecipeSource`] trait.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::error::ExtractError;
use crate::extractors::ParsingContext;
use crate::fetchers::Fetcher;
use crate::model::Recipe;
use crate::period::YearMonth;
use crate::tags::TagVocabulary;

mod budgetbytes;
mod food_com;
mod food_network;

pub use budgetbytes::BudgetBytes;
pub use food_com::FoodCom;
pub use food_network::FoodNetwork;

/// Extra candidates discovered and parsed on top of the requested count, to
/// make up for detail pages that end up discarded. Results are trimmed back to
/// the requested count after parsing.
pub const DISCOVERY_BUFFER: usize = 10;

/// The two operations every site supports.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Candidate detail-page URLs, enough to cover `target_count` plus
    /// [`DISCOVERY_BUFFER`]. May return more. Failed listing pages are skipped.
    async fn discover_urls(&self, target_count: usize) -> Vec<String>;

    /// Fetch and parse one detail page. `None` means the recipe is discarded.
    async fn parse_detail(&self, url: &str) -> Option<Recipe>;
}

/// Sources whose listing is a month-by-month archive.
#[async_trait]
pub trait ArchiveSource: RecipeSource {
    /// First month the archive has content for.
    fn oldest_period(&self) -> YearMonth;

    /// Candidate URLs published between `from` and `to` (inclusive), newest first.
    async fn discover_in_range(&self, from: YearMonth, to: YearMonth) -> Vec<String>;
}

/// Everything a source needs from the outside world.
#[derive(Clone)]
pub struct SourceContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub tags: Arc<TagVocabulary>,
    /// Listing pages fetched at the same time
    pub concurrency: usize,
    /// Politeness pause some sources take before a detail request
    pub detail_delay: Duration,
    /// Overrides the current month, for deterministic runs
    pub today: Option<YearMonth>,
}

impl SourceContext {
    pub fn new(fetcher: Arc<dyn Fetcher>, tags: Arc<TagVocabulary>) -> Self {
        Self {
            fetcher,
            tags,
            concurrency: 4,
            detail_delay: Duration::ZERO,
            today: None,
        }
    }

    pub fn today(&self) -> YearMonth {
        self.today.unwrap_or_else(YearMonth::current)
    }

    /// Fetch listing pages concurrently and collect the links each one yields,
    /// keeping page order. A page that fails to load or parse adds nothing.
    pub(crate) async fn collect_links<F>(&self, pages: Vec<String>, extract: F) -> Vec<String>
    where
        F: Fn(&ParsingContext) -> Result<Vec<String>, ExtractError> + Send + Sync,
    {
        let extract = &extract;
        stream::iter(pages)
            .map(|page| async move {
                match self.fetcher.fetch(&page).await {
                    Ok(html) => links_from_page(&page, &html, extract),
                    Err(e) => {
                        warn!("Skipping listing page {}: {}", page, e);
                        Vec::new()
                    }
                }
            })
            .buffered(self.concurrency.max(1))
            .concat()
            .await
    }

    /// Fetch a detail page body, logging failures.
    pub(crate) async fn fetch_detail(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("Discarding {}: {}", url, e);
                None
            }
        }
    }
}

fn links_from_page<F>(page: &str, html: &str, extract: &F) -> Vec<String>
where
    F: Fn(&ParsingContext) -> Result<Vec<String>, ExtractError>,
{
    let context = ParsingContext::new(page, html);
    match extract(&context) {
        Ok(links) => {
            debug!("{} links on {}", links.len(), page);
            links
        }
        Err(e) => {
            warn!("Could not read listing page {}: {}", page, e);
            Vec::new()
        }
    }
}

/// Number of listing pages expected to hold `wanted` records.
pub(crate) fn pages_needed(wanted: usize, per_page: usize) -> usize {
    wanted.div_ceil(per_page.max(1))
}

/// Join a site-relative link onto a base URL; absolute links pass through.
pub(crate) fn absolute_url(base: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else if let Some(rest) = link.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}

/// The supported sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    BudgetBytes,
    FoodCom,
    FoodNetwork,
}

impl Site {
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::BudgetBytes => "budgetbytes",
            Site::FoodCom => "food.com",
            Site::FoodNetwork => "foodnetwork",
        }
    }

    /// Build the source for this site on its live base URL.
    pub fn source(&self, context: SourceContext) -> Box<dyn RecipeSource> {
        match self {
            Site::BudgetBytes => Box::new(BudgetBytes::new(context)),
            Site::FoodCom => Box::new(FoodCom::new(context)),
            Site::FoodNetwork => Box::new(FoodNetwork::new(context)),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "budgetbytes" | "budget_bytes" => Ok(Site::BudgetBytes),
            "food.com" | "food_com" | "foodcom" => Ok(Site::FoodCom),
            "foodnetwork" | "food_network" => Ok(Site::FoodNetwork),
            other => Err(format!("Unknown site: {other}")),
        }
    }
}
