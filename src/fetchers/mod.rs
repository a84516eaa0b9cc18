//! Outbound HTTP used by every source adapter.

use async_trait::async_trait;

use crate::error::FetchError;

mod request;
mod throttle;

pub use request::RequestFetcher;
pub use throttle::ThrottledFetcher;

/// Fetches a page body. Implemented by the real HTTP client and by test fakes.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}
