use async_trait::async_trait;
use log::{debug, info};
use scraper::ElementRef;

use super::{ArchiveSource, RecipeSource, SourceContext, DISCOVERY_BUFFER};
use crate::duration;
use crate::error::ExtractError;
use crate::extractors::{self, ParsingContext};
use crate::ingredient;
use crate::model::{Ingredient, Recipe};
use crate::period::YearMonth;
use crate::tags::TagVocabulary;

const BASE_URL: &str = "https://www.budgetbytes.com";
const OLDEST_PERIOD: YearMonth = YearMonth::known(2009, 5);

/// budgetbytes.com: a WordPress blog with a monthly archive and WP Recipe
/// Maker cards on every recipe post.
pub struct BudgetBytes {
    context: SourceContext,
    base_url: String,
}

impl BudgetBytes {
    pub fn new(context: SourceContext) -> Self {
        Self {
            context,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn archive_url(&self, month: YearMonth) -> String {
        format!(
            "{}/archive/{}/{}",
            self.base_url.trim_end_matches('/'),
            month.year(),
            month.month()
        )
    }

    async fn collect_months(&self, months: &[YearMonth]) -> Vec<String> {
        let pages = months.iter().map(|m| self.archive_url(*m)).collect();
        self.context.collect_links(pages, archive_links).await
    }
}

#[async_trait]
impl RecipeSource for BudgetBytes {
    fn name(&self) -> &'static str {
        "budgetbytes"
    }

    /// Walks the archive backwards from the current month, a batch of months
    /// at a time, until enough links are found or the archive runs out.
    async fn discover_urls(&self, target_count: usize) -> Vec<String> {
        let wanted = target_count + DISCOVERY_BUFFER;
        let months: Vec<YearMonth> =
            YearMonth::months_back(self.context.today(), OLDEST_PERIOD).collect();

        let mut urls = Vec::new();
        for batch in months.chunks(self.context.concurrency.max(1)) {
            if urls.len() >= wanted {
                break;
            }
            urls.extend(self.collect_months(batch).await);
        }

        info!("{}: discovered {} recipe links", self.name(), urls.len());
        urls
    }

    async fn parse_detail(&self, url: &str) -> Option<Recipe> {
        let html = self.context.fetch_detail(url).await?;
        Some(parse_recipe(url, &html, &self.context.tags))
    }
}

#[async_trait]
impl ArchiveSource for BudgetBytes {
    fn oldest_period(&self) -> YearMonth {
        OLDEST_PERIOD
    }

    async fn discover_in_range(&self, from: YearMonth, to: YearMonth) -> Vec<String> {
        let months: Vec<YearMonth> = YearMonth::months_back(to, from).collect();
        debug!("{}: fetching {} archive months", self.name(), months.len());
        self.collect_months(&months).await
    }
}

fn archive_links(page: &ParsingContext) -> Result<Vec<String>, ExtractError> {
    let link = extractors::selector(".archive-post > a")?;
    Ok(page
        .root()
        .select(&link)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Posts without a recipe card (roundups, meal prep guides) still yield a
/// record; the card fields are then looked up across the whole page.
fn parse_recipe(url: &str, html: &str, tags: &TagVocabulary) -> Recipe {
    let page = ParsingContext::new(url, html);
    let card = match extractors::first(page.root(), ".wprm-recipe-container > .wprm-recipe") {
        Ok(card) => card,
        Err(e) => {
            debug!("{}: no recipe card ({}), reading the whole page", url, e);
            page.root()
        }
    };

    let mut recipe = Recipe::new(
        url,
        page.field_or_default("name", extractors::first_text(card, ".wprm-recipe-name")),
    );
    recipe.total_time_minutes = total_time(card);
    recipe.picture_url = page.optional_field(
        "picture",
        extractors::noscript_image(page.root(), ".post > p > noscript"),
    );
    recipe.ingredients = page.field_or_default("ingredients", ingredients(card));
    recipe.instructions =
        page.field_or_default("instructions", extractors::steps(card, "li.wprm-recipe-instruction"));
    recipe.tags = page.field_or_default(
        "tags",
        extractors::first_text(page.root(), "#breadcrumbs").map(|trail| tags.filter([trail])),
    );

    recipe
}

/// Hours and minutes sit in separate fields; either may be missing.
fn total_time(card: ElementRef<'_>) -> Option<u32> {
    duration::from_parts(
        extractors::first_number(card, ".wprm-recipe-total_time-hours").ok(),
        extractors::first_number(card, ".wprm-recipe-total_time-minutes").ok(),
    )
}

fn ingredients(card: ElementRef<'_>) -> Result<Vec<Ingredient>, ExtractError> {
    let item = extractors::selector("li.wprm-recipe-ingredient")?;
    Ok(card.select(&item).map(ingredient_from_item).collect())
}

fn ingredient_from_item(item: ElementRef<'_>) -> Ingredient {
    let Ok(name) = extractors::first_text(item, ".wprm-recipe-ingredient-name") else {
        return ingredient::parse_line(&extractors::element_text(item));
    };
    let amount = extractors::first_text(item, ".wprm-recipe-ingredient-amount").unwrap_or_default();
    let unit = extractors::first_text(item, ".wprm-recipe-ingredient-unit").ok();

    Ingredient::new(name, ingredient::normalize_line(&amount), unit)
}
