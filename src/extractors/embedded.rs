//! Data that sits inside a page rather than in its element tree: JSON
//! assigned in inline scripts and markup hidden in `<noscript>` fallbacks.

use scraper::{ElementRef, Html};
use serde::de::DeserializeOwned;

use super::{first, selector};
use crate::error::ExtractError;

/// Deserialize the JSON value assigned after `marker` in the first script
/// matching `css`, e.g. `var viewModel = {...};`.
pub fn script_payload<T: DeserializeOwned>(
    root: ElementRef<'_>,
    css: &'static str,
    marker: &'static str,
) -> Result<T, ExtractError> {
    let script = first(root, css)?.text().collect::<String>();
    let start = script
        .find(marker)
        .ok_or(ExtractError::MissingElement(marker))?;

    // Only the first complete JSON value is read; the trailing `;` and any
    // following statements are ignored.
    let mut values = serde_json::Deserializer::from_str(&script[start + marker.len()..]).into_iter::<T>();
    match values.next() {
        Some(value) => Ok(value?),
        None => Err(ExtractError::MissingElement(marker)),
    }
}

/// `src` of the image inside the first `<noscript>` matching `css`.
///
/// Lazy-loading plugins keep the real `<img>` only in the noscript fallback,
/// where the parser stores it as raw text that has to be parsed again.
pub fn noscript_image(root: ElementRef<'_>, css: &'static str) -> Result<String, ExtractError> {
    let noscript = first(root, css)?;
    let img = selector("img[src]")?;

    if let Some(src) = noscript
        .select(&img)
        .next()
        .and_then(|element| element.value().attr("src"))
    {
        return Ok(src.to_string());
    }

    let inner = noscript.text().collect::<String>();
    let fragment = Html::parse_fragment(&inner);
    fragment
        .select(&img)
        .next()
        .and_then(|element| element.value().attr("src"))
        .map(str::to_string)
        .ok_or(ExtractError::MissingElement("noscript img[src]"))
}
