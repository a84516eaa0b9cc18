//! Drives a source from discovery to a bounded list of recipes.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, info};

use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::fetchers::{Fetcher, RequestFetcher, ThrottledFetcher};
use crate::model::Recipe;
use crate::period::{DateRange, YearMonth};
use crate::sources::{
    ArchiveSource, BudgetBytes, RecipeSource, Site, SourceContext, DISCOVERY_BUFFER,
};
use crate::tags::TagVocabulary;

/// Runs harvests against any [`RecipeSource`].
pub struct Harvester {
    context: SourceContext,
}

impl Harvester {
    pub fn builder() -> HarvesterBuilder {
        HarvesterBuilder::default()
    }

    /// Shared context to build sources with.
    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    /// The source for `site`, wired to this harvester's fetcher and tags.
    pub fn source(&self, site: Site) -> Box<dyn RecipeSource> {
        site.source(self.context.clone())
    }

    pub fn budget_bytes(&self) -> BudgetBytes {
        BudgetBytes::new(self.context.clone())
    }

    /// Harvest up to `requested` recipes from the source's latest listing.
    pub async fn harvest<S>(&self, source: &S, requested: usize) -> Vec<Recipe>
    where
        S: RecipeSource + ?Sized,
    {
        if requested == 0 {
            return Vec::new();
        }

        let candidates = source.discover_urls(requested).await;
        self.collect(source, candidates, requested).await
    }

    /// Harvest up to `requested` recipes published within `range`.
    ///
    /// The range is checked against the source's archive before anything is
    /// fetched; an end month in the future is clamped to the current month.
    pub async fn harvest_range<S>(
        &self,
        source: &S,
        requested: usize,
        range: DateRange,
    ) -> Result<Vec<Recipe>, HarvestError>
    where
        S: ArchiveSource + ?Sized,
    {
        let range = range.resolve(source.oldest_period(), self.context.today())?;
        debug!(
            "{}: harvesting {} to {}",
            source.name(),
            range.from,
            range.to
        );

        if requested == 0 {
            return Ok(Vec::new());
        }

        let candidates = source.discover_in_range(range.from, range.to).await;
        Ok(self.collect(source, candidates, requested).await)
    }

    /// Parse the first `requested + DISCOVERY_BUFFER` distinct candidates
    /// concurrently and keep the first `requested` survivors, in candidate
    /// order. The extra candidates stand in for discarded pages.
    async fn collect<S>(&self, source: &S, candidates: Vec<String>, requested: usize) -> Vec<Recipe>
    where
        S: RecipeSource + ?Sized,
    {
        let found = candidates.len();
        let urls = dedup_truncate(candidates, requested.saturating_add(DISCOVERY_BUFFER));
        debug!(
            "{}: parsing {} of {} candidate links",
            source.name(),
            urls.len(),
            found
        );

        let mut recipes: Vec<Recipe> = stream::iter(urls)
            .map(|url| async move { source.parse_detail(&url).await })
            .buffered(self.context.concurrency.max(1))
            .filter_map(|recipe| async move { recipe })
            .collect()
            .await;
        recipes.truncate(requested);

        info!("{}: harvested {} recipes", source.name(), recipes.len());
        recipes
    }
}

/// Drop repeated URLs, keeping first occurrences, and cap the list.
fn dedup_truncate(candidates: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .take(limit)
        .collect()
}

/// Builder for configuring a [`Harvester`]
#[derive(Default)]
pub struct HarvesterBuilder {
    config: Option<HarvestConfig>,
    fetcher: Option<Arc<dyn Fetcher>>,
    tags: Option<TagVocabulary>,
    today: Option<YearMonth>,
}

impl HarvesterBuilder {
    /// Use this configuration instead of loading `harvest.toml` and the
    /// environment.
    pub fn config(mut self, config: HarvestConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the HTTP client, e.g. with a fixture-backed fake.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn tags(mut self, tags: TagVocabulary) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Treat `today` as the current month when checking date ranges.
    pub fn today(mut self, today: YearMonth) -> Self {
        self.today = Some(today);
        self
    }

    pub fn build(self) -> Result<Harvester, HarvestError> {
        let config = match self.config {
            Some(config) => config,
            None => HarvestConfig::load()?,
        };

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let client = RequestFetcher::new(Some(config.timeout()), &config.user_agent)?;
                Arc::new(ThrottledFetcher::new(client, config.request_delay())) as Arc<dyn Fetcher>
            }
        };

        let tags = match (self.tags, &config.tags_path) {
            (Some(tags), _) => tags,
            (None, Some(path)) => TagVocabulary::load(path)?,
            (None, None) => TagVocabulary::builtin(),
        };

        let mut context = SourceContext::new(fetcher, Arc::new(tags));
        context.concurrency = config.concurrency();
        context.detail_delay = config.detail_delay();
        context.today = self.today;

        Ok(Harvester { context })
    }
}
