use async_trait::async_trait;
use log::{debug, info, warn};
use scraper::ElementRef;
use serde::Deserialize;

use super::{absolute_url, pages_needed, RecipeSource, SourceContext, DISCOVERY_BUFFER};
use crate::duration;
use crate::error::ExtractError;
use crate::extractors::{self, ParsingContext};
use crate::ingredient;
use crate::model::{Ingredient, Recipe};
use crate::tags::TagVocabulary;

const BASE_URL: &str = "https://www.foodnetwork.ca";
const CATEGORY: &str = "/everyday-cooking/recipes";
const RECIPES_PER_PAGE: usize = 24;

/// The listing is rendered client-side from this script variable.
const VIEW_MODEL_SCRIPT: &str = "#wrapper section > script";
const VIEW_MODEL_MARKER: &str = "var viewModel =";

#[derive(Debug, Deserialize)]
struct ViewModel {
    #[serde(rename = "Records", default)]
    records: Vec<ViewRecord>,
}

#[derive(Debug, Deserialize)]
struct ViewRecord {
    #[serde(rename = "LinkURL")]
    link_url: String,
}

/// foodnetwork.ca: listing pages embed their records as JSON in an inline
/// script; recipe pages use schema.org microdata for the total time.
pub struct FoodNetwork {
    context: SourceContext,
    base_url: String,
}

impl FoodNetwork {
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

    /// Page 1 is the bare category; later pages add `?fspn=N`.
    fn listing_url(&self, page: usize) -> String {
        let base = self.base_url.trim_end_matches('/');
        if page <= 1 {
            format!("{base}{CATEGORY}")
        } else {
            format!("{base}{CATEGORY}/?fspn={page}")
        }
    }
}

#[async_trait]
impl RecipeSource for FoodNetwork {
    fn name(&self) -> &'static str {
        "foodnetwork"
    }

    async fn discover_urls(&self, target_count: usize) -> Vec<String> {
        let pages = pages_needed(target_count + DISCOVERY_BUFFER, RECIPES_PER_PAGE);
        let listing = (1..=pages).map(|page| self.listing_url(page)).collect();

        let base = self.base_url.as_str();
        let urls = self
            .context
            .collect_links(listing, |page| listing_links(page, base))
            .await;

        info!("{}: discovered {} recipe links", self.name(), urls.len());
        urls
    }

    async fn parse_detail(&self, url: &str) -> Option<Recipe> {
        let delay = self.context.detail_delay;
        if !delay.is_zero() {
            debug!("Waiting {:?} before {}", delay, url);
            tokio::time::sleep(delay).await;
        }

        let html = self.context.fetch_detail(url).await?;
        parse_recipe(url, &html, &self.context.tags, &self.base_url)
    }
}

fn listing_links(page: &ParsingContext, base: &str) -> Result<Vec<String>, ExtractError> {
    let model: ViewModel =
        extractors::script_payload(page.root(), VIEW_MODEL_SCRIPT, VIEW_MODEL_MARKER)?;
    Ok(model
        .records
        .into_iter()
        .map(|record| absolute_url(base, &record.link_url))
        .collect())
}

fn parse_recipe(url: &str, html: &str, tags: &TagVocabulary, base: &str) -> Option<Recipe> {
    let page = ParsingContext::new(url, html);
    let root = page.root();

    // A few recipes ship without a total time; those are dropped.
    let Some(minutes) = page.optional_field("time", total_time(root)) else {
        warn!("Discarding {}: no total time", url);
        return None;
    };

    let mut recipe = Recipe::new(
        url,
        page.field_or_default("name", extractors::first_text(root, ".recipeTitle")),
    );
    recipe.total_time_minutes = Some(minutes);
    recipe.picture_url = page.optional_field(
        "picture",
        extractors::first_attr(root, ".recipe-photo", "src").map(|src| absolute_url(base, &src)),
    );
    recipe.ingredients = page.field_or_default("ingredients", ingredients(root));
    recipe.instructions = page.field_or_default("instructions", instructions(root));
    recipe.tags = page.field_or_default(
        "tags",
        extractors::all_text(root, ".see-more .category a").map(|labels| tags.filter(labels)),
    );

    Some(recipe)
}

/// Visible text is plain minutes; the `content` attribute may hold an
/// ISO 8601 duration instead.
fn total_time(root: ElementRef<'_>) -> Result<u32, ExtractError> {
    let element = extractors::first(root, "[itemprop='totalTime']")?;
    let text = extractors::element_text(element);

    duration::parse_minutes(&text)
        .or_else(|| element.value().attr("content").and_then(duration::parse_minutes))
        .ok_or(ExtractError::Unparseable {
            field: "total time",
            value: text,
        })
}

fn ingredients(root: ElementRef<'_>) -> Result<Vec<Ingredient>, ExtractError> {
    Ok(extractors::all_text(root, ".recipe-ingredients p")?
        .iter()
        .map(|line| ingredient::parse_line(line))
        .collect())
}

fn instructions(root: ElementRef<'_>) -> Result<Vec<String>, ExtractError> {
    Ok(extractors::steps(root, ".recipeInstructions p")?
        .iter()
        .map(|step| strip_step_number(step).to_string())
        .filter(|step| !step.is_empty())
        .collect())
}

/// Steps are written as "1. Whisk the eggs."
fn strip_step_number(step: &str) -> &str {
    let rest = step.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < step.len() {
        if let Some(rest) = rest.strip_prefix('.') {
            return rest.trim_start();
        }
    }
    step
}
