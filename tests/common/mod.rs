#![allow(dead_code)]

use async_trait::async_trait;
use recipe_harvest::fetchers::Fetcher;
use recipe_harvest::{FetchError, HarvestConfig, Harvester, TagVocabulary, YearMonth};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory transport: serves canned pages, fails everything else, and
/// records every URL it was asked for.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Unavailable(url.to_string()))
    }
}

/// Configuration without any throttling or politeness delays.
pub fn fast_config() -> HarvestConfig {
    HarvestConfig {
        request_delay_ms: 0,
        detail_delay_ms: 0,
        ..HarvestConfig::default()
    }
}

pub fn vocabulary() -> TagVocabulary {
    TagVocabulary::from_tokens([
        "dinner", "pasta", "vegetarian", "chicken", "soup", "easy", "bbq", "pork", "breakfast", "eggs",
    ])
}

pub fn today() -> YearMonth {
    YearMonth::new(2024, 3).unwrap()
}

/// Harvester backed by the fixture transport.
pub fn fixture_harvester(fetcher: Arc<FixtureFetcher>) -> Harvester {
    Harvester::builder()
        .config(fast_config())
        .fetcher(fetcher)
        .tags(vocabulary())
        .today(today())
        .build()
        .unwrap()
}

/// Harvester using the real HTTP client, for mockito servers.
pub fn http_harvester() -> Harvester {
    Harvester::builder()
        .config(fast_config())
        .tags(vocabulary())
        .today(today())
        .build()
        .unwrap()
}

pub fn budgetbytes_archive(links: &[String]) -> String {
    let posts: String = links
        .iter()
        .map(|link| format!(r#"<div class="archive-post"><a href="{link}">Post</a></div>"#))
        .collect();
    format!("<html><body><main>{posts}</main></body></html>")
}

pub fn budgetbytes_recipe(name: &str, minutes: u32) -> String {
    format!(
        r#"
        <html><body>
        <div id="breadcrumbs">Home » Recipes » Pasta » Dinner</div>
        <div class="post">
            <div class="wprm-recipe-container"><div class="wprm-recipe">
                <h2 class="wprm-recipe-name">{name}</h2>
                <span class="wprm-recipe-total_time-minutes">{minutes}</span>
                <ul>
                    <li class="wprm-recipe-ingredient">
                        <span class="wprm-recipe-ingredient-amount">8</span>
                        <span class="wprm-recipe-ingredient-unit">oz</span>
                        <span class="wprm-recipe-ingredient-name">spaghetti</span>
                    </li>
                </ul>
                <ol><li class="wprm-recipe-instruction">Cook the spaghetti.</li></ol>
            </div></div>
        </div>
        </body></html>
        "#
    )
}
