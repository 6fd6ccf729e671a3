//! The shared scraping HTTP session.
//!
//! One `PacedClient` exists per process and every scraper and resolver
//! fetch goes through it, so the politeness delay serializes requests
//! across all sites. There is no backoff schedule: a request is attempted
//! at most `retries` times and a timeout is a hard failure for that
//! lookup.

use crate::error::SiteError;
use rand::Rng;
use reel_match_config::ClientConfig;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct PacedClient {
    http: reqwest::Client,
    delay: Duration,
    jitter_ms: u64,
    retries: u32,
    last_request: Mutex<Option<Instant>>,
}

impl PacedClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            delay: Duration::from_millis(config.delay_ms),
            jitter_ms: config.jitter_ms,
            retries: config.retries.max(1),
            last_request: Mutex::new(None),
        })
    }

    /// Fetch a page body, waiting out the politeness delay first.
    /// 4xx responses fail immediately; request errors and 5xx responses
    /// are retried up to the configured attempt count.
    pub async fn fetch_text(&self, url: &str) -> Result<String, SiteError> {
        let mut last_error = None;
        for attempt in 1..=self.retries {
            self.pace().await;
            debug!(url, attempt, "fetching");

            match self.http.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(|source| SiteError::Fetch {
                            url: url.to_string(),
                            source,
                        });
                    }
                    let error = SiteError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    };
                    if error.is_permanent() {
                        return Err(error);
                    }
                    warn!(url, status = status.as_u16(), attempt, "retryable HTTP status");
                    last_error = Some(error);
                }
                Err(source) => {
                    warn!(url, attempt, error = %source, "request failed");
                    last_error = Some(SiteError::Fetch {
                        url: url.to_string(),
                        source,
                    });
                }
            }
        }
        Err(last_error.expect("at least one attempt was made"))
    }

    /// Sleep until the configured delay (plus random jitter) has passed
    /// since the previous request
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let jitter = if self.jitter_ms > 0 {
                rand::thread_rng().gen_range(0..=self.jitter_ms)
            } else {
                0
            };
            let wait = self.delay + Duration::from_millis(jitter);
            let elapsed = previous.elapsed();
            if elapsed < wait {
                tokio::time::sleep(wait - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
