//! Ingredient line normalization and best-effort splitting.

use std::sync::LazyLock;

use crate::model::Ingredient;

/// Unit words, longest first so "tablespoons" wins over "tbs".
static UNITS_SORTED: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut units = UNITS_RAW.to_vec();
    units.sort_by(|a, b| b.len().cmp(&a.len()));
    units
});

const UNITS_RAW: &[&str] = &[
    "fluid ounces",
    "fluid ounce",
    "tablespoons",
    "tablespoon",
    "teaspoons",
    "teaspoon",
    "quarts",
    "quart",
    "pints",
    "pint",
    "cups",
    "cup",
    "tbsp",
    "tbs",
    "tsp",
    "fl oz",
    "qt",
    "pt",
    "milliliters",
    "milliliter",
    "liters",
    "liter",
    "litres",
    "litre",
    "ml",
    "l",
    "ounces",
    "ounce",
    "pounds",
    "pound",
    "lbs",
    "lb",
    "oz",
    "kilograms",
    "kilogram",
    "grams",
    "gram",
    "kg",
    "g",
    "packages",
    "package",
    "pinches",
    "pinch",
    "dashes",
    "dash",
    "cloves",
    "clove",
    "slices",
    "slice",
    "sprigs",
    "sprig",
    "stalks",
    "stalk",
    "cans",
    "can",
    "jars",
    "jar",
    "sticks",
    "stick",
    "bunches",
    "bunch",
    "heads",
    "head",
];

const FRACTION_GLYPHS: &[char] = &['¼', '½', '¾', '⅓', '⅔', '⅛', '⅜', '⅝', '⅞', '⅕', '⅙'];

/// Collapse whitespace runs and glue range hyphens to their first number.
///
/// `"1   -2  cups flour"` becomes `"1-2 cups flour"`. Hyphens that do not
/// follow a number keep their space.
pub fn normalize_line(line: &str) -> String {
    let mut normalized = String::with_capacity(line.len());
    for word in line.split_whitespace() {
        let glue = word.starts_with('-') && normalized.chars().last().is_some_and(char::is_numeric);
        if !normalized.is_empty() && !glue {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}

/// Split a normalized line into quantity, unit and name.
///
/// Falls back to the whole line as the name when neither a quantity nor a
/// unit can be recognized.
pub fn parse_line(line: &str) -> Ingredient {
    let line = normalize_line(line);
    if line.is_empty() {
        return Ingredient::raw(line);
    }

    let (quantity, rest) = extract_quantity(&line);
    let (unit, rest) = extract_unit(rest);
    let name = rest.trim();

    if name.is_empty() || (quantity.is_none() && unit.is_none()) {
        return Ingredient::raw(line);
    }

    Ingredient::new(name, quantity.unwrap_or_default(), unit)
}

/// Split a leading unit word off text that carries no quantity, as in the
/// name part of an ingredient whose amount sits in its own element.
pub fn split_unit(text: &str) -> (Option<String>, String) {
    let text = normalize_line(text);
    let (unit, rest) = extract_unit(&text);
    if unit.is_some() && rest.is_empty() {
        return (None, text.clone());
    }
    (unit, rest.to_string())
}

/// Leading amount: integer, decimal, fraction, mixed number or range.
fn extract_quantity(s: &str) -> (Option<String>, &str) {
    let mut words = s.split(' ');
    let Some(first) = words.next() else {
        return (None, s);
    };
    if !is_amount(first) {
        return (None, s);
    }

    let mut end = first.len();
    // mixed number: "1 1/2"
    if let Some(second) = words.next() {
        if first.chars().all(|c| c.is_ascii_digit()) && is_fraction(second) {
            end += 1 + second.len();
        }
    }

    (Some(s[..end].to_string()), s[end..].trim_start())
}

fn is_amount(word: &str) -> bool {
    !word.is_empty()
        && word.chars().any(|c| c.is_ascii_digit() || FRACTION_GLYPHS.contains(&c))
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-') || FRACTION_GLYPHS.contains(&c))
}

fn is_fraction(word: &str) -> bool {
    if word.chars().count() == 1 && word.chars().all(|c| FRACTION_GLYPHS.contains(&c)) {
        return true;
    }
    match word.split_once('/') {
        Some((numerator, denominator)) => {
            !numerator.is_empty()
                && !denominator.is_empty()
                && numerator.chars().all(|c| c.is_ascii_digit())
                && denominator.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn extract_unit(s: &str) -> (Option<String>, &str) {
    let lower = s.to_lowercase();

    for &unit in UNITS_SORTED.iter() {
        if !lower.starts_with(unit) || !s.is_char_boundary(unit.len()) {
            continue;
        }
        let after = &s[unit.len()..];
        if after.is_empty() || after.starts_with(|c: char| c.is_whitespace() || c == '.' || c == ',') {
            let rest = after.trim_start_matches(['.', ',']).trim_start();
            return (Some(unit.to_string()), rest);
        }
    }

    (None, s)
}
