//! Field extractors shared by the source adapters.
//!
//! Every adapter parses a page once into a [`ParsingContext`] and then runs one
//! extractor per recipe field. Extractors return `Result` so a missing or
//! malformed element only costs that one field; the context then logs the
//! miss against its URL and falls back.

use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

mod embedded;

pub use embedded::{noscript_image, script_payload};

/// A fetched page, parsed once and shared by all field extractors.
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Unwrap a non-mandatory field, logging and defaulting on failure.
    pub fn field_or_default<T: Default>(&self, field: &str, result: Result<T, ExtractError>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                debug!("{}: no {} ({}), using default", self.url, field, e);
                T::default()
            }
        }
    }

    /// Like [`ParsingContext::field_or_default`] for fields that are absent
    /// rather than empty.
    pub fn optional_field<T>(&self, field: &str, result: Result<T, ExtractError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("{}: no {} ({})", self.url, field, e);
                None
            }
        }
    }
}

pub fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector(format!("{css}: {e}")))
}

/// Text content of an element with whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First element under `root` matching `css`.
pub fn first<'a>(root: ElementRef<'a>, css: &'static str) -> Result<ElementRef<'a>, ExtractError> {
    let selector = selector(css)?;
    root.select(&selector)
        .next()
        .ok_or(ExtractError::MissingElement(css))
}

/// Text of the first match, which must exist but may be empty.
pub fn first_text(root: ElementRef<'_>, css: &'static str) -> Result<String, ExtractError> {
    first(root, css).map(element_text)
}

/// Text of every match in document order, empty entries removed.
pub fn all_text(root: ElementRef<'_>, css: &'static str) -> Result<Vec<String>, ExtractError> {
    let selector = selector(css)?;
    Ok(root
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect())
}

/// Attribute of the first match.
pub fn first_attr(
    root: ElementRef<'_>,
    css: &'static str,
    attr: &'static str,
) -> Result<String, ExtractError> {
    first(root, css)?
        .value()
        .attr(attr)
        .map(str::to_string)
        .ok_or(ExtractError::MissingElement(attr))
}

/// Parse a whole number out of the first match, e.g. an hours field.
pub fn first_number(root: ElementRef<'_>, css: &'static str) -> Result<u32, ExtractError> {
    let text = first_text(root, css)?;
    text.parse().map_err(|_| ExtractError::Unparseable {
        field: css,
        value: text,
    })
}

/// Instruction steps in page order.
///
/// Sites reuse the step class for trailing credits and hidden footers, so
/// entries that link elsewhere or hold no text are dropped.
pub fn steps(root: ElementRef<'_>, css: &'static str) -> Result<Vec<String>, ExtractError> {
    let link = selector("a[href]")?;
    let step = selector(css)?;

    Ok(root
        .select(&step)
        .filter(|step| step.select(&link).next().is_none())
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect())
}
