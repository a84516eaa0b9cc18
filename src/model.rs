use serde::{Deserialize, Serialize};

/// Difficulty assigned to every harvested recipe. None of the supported sites
/// publish a difficulty rating, so the middle of the 1-5 scale is used.
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// One harvested dish, normalized across all sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Page the recipe was scraped from. Unique within a harvest batch.
    pub source_url: String,
    /// Recipe title, empty when the page had no recognizable title.
    pub name: String,
    pub picture_url: Option<String>,
    pub total_time_minutes: Option<u32>,
    pub difficulty: u8,
    /// Ingredients in on-page order
    pub ingredients: Vec<Ingredient>,
    /// Steps in execution order
    pub instructions: Vec<String>,
    /// Members of the tag vocabulary, deduplicated
    pub tags: Vec<String>,
}

impl Recipe {
    pub fn new(source_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            name: name.into(),
            picture_url: None,
            total_time_minutes: None,
            difficulty: DEFAULT_DIFFICULTY,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// One ingredient line.
///
/// `quantity` stays as raw text because sites write ranges ("1-2") and
/// fraction glyphs ("½") that do not survive conversion to a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    pub unit: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, unit: Option<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit,
        }
    }

    /// An unparsed line stored whole as the ingredient name.
    pub fn raw(line: impl Into<String>) -> Self {
        Self::new(line, String::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_uses_neutral_difficulty() {
        let recipe = Recipe::new("https://example.com/r/1", "Soup");
        assert_eq!(recipe.difficulty, DEFAULT_DIFFICULTY);
        assert!(recipe.picture_url.is_none());
        assert!(recipe.total_time_minutes.is_none());
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let mut recipe = Recipe::new("https://example.com/r/1", "Soup");
        recipe.total_time_minutes = Some(20);
        recipe.ingredients.push(Ingredient::new("water", "2", Some("cups".to_string())));

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["sourceUrl"], "https://example.com/r/1");
        assert_eq!(json["totalTimeMinutes"], 20);
        assert!(json["pictureUrl"].is_null());
        assert_eq!(json["ingredients"][0]["unit"], "cups");
    }

    #[test]
    fn test_raw_ingredient_has_no_quantity_or_unit() {
        let ingredient = Ingredient::raw("salt to taste");
        assert_eq!(ingredient.name, "salt to taste");
        assert!(ingredient.quantity.is_empty());
        assert!(ingredient.unit.is_none());
    }
}
