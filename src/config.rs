use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Harvester configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HarvestConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum number of pages fetched at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Minimum spacing between two requests in milliseconds (0 disables throttling)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Extra pause before each Food Network detail page in milliseconds
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,
    /// Alternative tag vocabulary document; the built-in list is used when unset
    #[serde(default)]
    pub tags_path: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            max_concurrency: default_max_concurrency(),
            request_delay_ms: default_request_delay_ms(),
            detail_delay_ms: default_detail_delay_ms(),
            tags_path: None,
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeHarvest/0.3)".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_detail_delay_ms() -> u64 {
    500
}

impl HarvestConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_HARVEST__ prefix
    /// 2. harvest.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_HARVEST__MAX_CONCURRENCY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    /// Concurrency never drops below one in-flight request.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

/// Load configuration from file and environment variables
///
/// See [`HarvestConfig::load`] for the lookup order.
pub fn load_config() -> Result<HarvestConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("harvest").required(false))
        // Use double underscore for nested: RECIPE_HARVEST__REQUEST_DELAY_MS
        .add_source(
            Environment::with_prefix("RECIPE_HARVEST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
