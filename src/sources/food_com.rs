use async_trait::async_trait;
use log::{info, warn};
use scraper::ElementRef;

use super::{absolute_url, pages_needed, RecipeSource, SourceContext, DISCOVERY_BUFFER};
use crate::duration;
use crate::error::ExtractError;
use crate::extractors::{self, ParsingContext};
use crate::ingredient;
use crate::model::{Ingredient, Recipe};
use crate::tags::TagVocabulary;

const BASE_URL: &str = "https://www.food.com";
const RECIPES_PER_PAGE: usize = 8;

/// food.com: a paged "latest recipes" listing with a combined free-text
/// total time on each recipe.
pub struct FoodCom {
    context: SourceContext,
    base_url: String,
}

impl FoodCom {
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

    /// Page 1 carries no page number.
    fn listing_url(&self, page: usize) -> String {
        let base = self.base_url.trim_end_matches('/');
        if page <= 1 {
            format!("{base}/recipes/?ref=nav")
        } else {
            format!("{base}/recipes/?ref=nav&pn={page}")
        }
    }
}

#[async_trait]
impl RecipeSource for FoodCom {
    fn name(&self) -> &'static str {
        "food.com"
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
        let html = self.context.fetch_detail(url).await?;
        parse_recipe(url, &html, &self.context.tags, &self.base_url)
    }
}

/// Recipe cards link to recipes as well as to cook profiles; only
/// `/recipe/` links are kept.
fn listing_links(page: &ParsingContext, base: &str) -> Result<Vec<String>, ExtractError> {
    let link = extractors::selector(".fixed-recipe-card__h3 a[href]")?;
    let recipe_prefix = absolute_url(base, "/recipe/");

    Ok(page
        .root()
        .select(&link)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| absolute_url(base, href))
        .filter(|href| href.starts_with(&recipe_prefix))
        .collect())
}

fn parse_recipe(url: &str, html: &str, tags: &TagVocabulary, base: &str) -> Option<Recipe> {
    let page = ParsingContext::new(url, html);
    let root = page.root();

    // Recipes without a total time are not usable downstream.
    let Some(minutes) = page.optional_field("time", total_time(root)) else {
        warn!("Discarding {}: no total time", url);
        return None;
    };

    let mut recipe = Recipe::new(
        url,
        page.field_or_default("name", extractors::first_text(root, ".recipe-title h1")),
    );
    recipe.total_time_minutes = Some(minutes);
    recipe.picture_url = page.optional_field("picture", picture(root, base));
    recipe.ingredients = page.field_or_default("ingredients", ingredients(root));
    recipe.instructions = page.field_or_default(
        "instructions",
        extractors::steps(root, "li.recipe-directions__step"),
    );
    recipe.tags = page.field_or_default(
        "tags",
        extractors::all_text(root, ".toggle-similar__title").map(|labels| tags.filter(labels)),
    );

    Some(recipe)
}

/// "1 hr 35 mins" style text next to a "Ready In:" label.
fn total_time(root: ElementRef<'_>) -> Result<u32, ExtractError> {
    let facts = extractors::first(root, ".recipe-facts__details.recipe-facts__time")?;
    let mut text = extractors::element_text(facts);
    if let Ok(label) = extractors::first_text(facts, ".recipe-facts__title") {
        text = text.replacen(&label, "", 1);
    }

    duration::parse_minutes(&text).ok_or(ExtractError::Unparseable {
        field: "total time",
        value: text,
    })
}

/// The hero image is lazy-loaded: the real URL lives in `data-src` and `src`
/// only holds an inline placeholder.
fn picture(root: ElementRef<'_>, base: &str) -> Result<String, ExtractError> {
    let src = extractors::first_attr(root, ".recipe-hero__item", "data-src")?;
    if src.is_empty() || src.starts_with("data:") {
        return Err(ExtractError::Unparseable {
            field: "picture",
            value: src,
        });
    }
    Ok(absolute_url(base, &src))
}

fn ingredients(root: ElementRef<'_>) -> Result<Vec<Ingredient>, ExtractError> {
    let item = extractors::selector(".recipe-ingredients__ingredient")?;
    Ok(root
        .select(&item)
        .map(ingredient_from_item)
        .filter(|ingredient| !ingredient.name.is_empty())
        .collect())
}

fn ingredient_from_item(item: ElementRef<'_>) -> Ingredient {
    let quantity = extractors::first_text(item, ".recipe-ingredients__ingredient-quantity");
    let parts = extractors::first_text(item, ".recipe-ingredients__ingredient-parts");

    match (quantity, parts) {
        (Ok(quantity), Ok(parts)) => {
            let (unit, name) = ingredient::split_unit(&parts);
            Ingredient::new(name, ingredient::normalize_line(&quantity), unit)
        }
        _ => ingredient::parse_line(&extractors::element_text(item)),
    }
}
