pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod harvest;
pub mod ingredient;
pub mod model;
pub mod period;
pub mod sources;
pub mod tags;

pub use config::HarvestConfig;
pub use error::{ExtractError, FetchError, HarvestError};
pub use harvest::{Harvester, HarvesterBuilder};
pub use model::{Ingredient, Recipe};
pub use period::{DateRange, YearMonth};
pub use sources::{ArchiveSource, RecipeSource, Site, SourceContext};
pub use tags::TagVocabulary;

/// Harvest up to `max_count` of the latest recipes from one site.
///
/// Uses the configuration from `harvest.toml` and `RECIPE_HARVEST__*`
/// environment variables.
///
/// # Example
/// ```no_run
/// use recipe_harvest::{harvest_site, Site};
///
/// # async fn run() -> Result<(), recipe_harvest::HarvestError> {
/// let recipes = harvest_site(Site::FoodCom, 20).await?;
/// for recipe in recipes {
///     println!("{} ({:?} min)", recipe.name, recipe.total_time_minutes);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn harvest_site(site: Site, max_count: usize) -> Result<Vec<Recipe>, HarvestError> {
    let harvester = Harvester::builder().build()?;
    let source = harvester.source(site);
    Ok(harvester.harvest(source.as_ref(), max_count).await)
}

/// Harvest up to `max_count` Budget Bytes recipes published between two
/// months (inclusive).
///
/// Fails without making any request when the range starts before the archive
/// does, starts in the future, or is empty. An end month in the future is
/// clamped to the current month.
pub async fn harvest_archive(
    max_count: usize,
    from_year: i32,
    from_month: u32,
    to_year: i32,
    to_month: u32,
) -> Result<Vec<Recipe>, HarvestError> {
    let range = DateRange::new(from_year, from_month, to_year, to_month)?;
    let harvester = Harvester::builder().build()?;
    let source = harvester.budget_bytes();
    harvester.harvest_range(&source, max_count, range).await
}
