use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use super::Fetcher;
use crate::error::FetchError;

/// Spaces out requests so that a concurrent fan-out never hits a site in a
/// single burst.
pub struct ThrottledFetcher<F> {
    inner: F,
    /// Minimum delay between the start of two requests.
    min_delay: Duration,
    /// Start time handed to the most recent request.
    last_start: Mutex<Option<Instant>>,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    pub fn new(inner: F, min_delay: Duration) -> Self {
        Self {
            inner,
            min_delay,
            last_start: Mutex::new(None),
        }
    }

    /// Reserve the next start slot and wait for it.
    async fn wait_turn(&self) {
        if self.min_delay.is_zero() {
            return;
        }

        let start = {
            let mut last = self.last_start.lock().await;
            let now = Instant::now();
            let start = match *last {
                Some(previous) if previous + self.min_delay > now => previous + self.min_delay,
                _ => now,
            };
            *last = Some(start);
            start
        };

        sleep_until(start).await;
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.wait_turn().await;
        self.inner.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct RecordingFetcher {
        started: StdMutex<Vec<Instant>>,
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.started.lock().unwrap().push(Instant::now());
            Ok(url.to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_spaced() {
        let fetcher = ThrottledFetcher::new(
            RecordingFetcher {
                started: StdMutex::new(Vec::new()),
            },
            Duration::from_millis(100),
        );

        let (a, b, c) = tokio::join!(fetcher.fetch("a"), fetcher.fetch("b"), fetcher.fetch("c"));
        assert_eq!(a.unwrap(), "a");
        assert_eq!(b.unwrap(), "b");
        assert_eq!(c.unwrap(), "c");

        let mut started = fetcher.inner.started.lock().unwrap().clone();
        started.sort();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100));
        }
    }

    #[tokio::test]
    async fn test_zero_delay_passes_through() {
        let fetcher = ThrottledFetcher::new(
            RecordingFetcher {
                started: StdMutex::new(Vec::new()),
            },
            Duration::ZERO,
        );
        assert_eq!(fetcher.fetch("x").await.unwrap(), "x");
        assert!(fetcher.last_start.lock().await.is_none());
    }
}
