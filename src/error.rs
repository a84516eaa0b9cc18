use thiserror::Error;

/// Errors raised while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request itself failed (DNS, TLS, timeout, body decoding)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The transport could not serve the URL at all
    #[error("Page unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a single field extractor.
///
/// These never leave an adapter: the field falls back to its default, or the
/// recipe is discarded when the field is mandatory.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No element matched {0}")]
    MissingElement(&'static str),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Could not parse {field} from {value:?}")]
    Unparseable { field: &'static str, value: String },

    #[error("Invalid embedded payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Errors surfaced to callers of the harvester
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The requested date range was rejected before any request was made
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The tag vocabulary document could not be read
    #[error("Invalid tag vocabulary: {0}")]
    Tags(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
