//! Signal retrieval with live/fixture fallback and unbiased sampling.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use ideaforge_core::{AppConfig, RawSignal};

use crate::client::RedditClient;
use crate::error::RedditError;
use crate::fixture::load_fixture_signals;

/// Signal source over a set of channels.
///
/// Holds an optional live client: when credentials are absent the source
/// serves fixture data directly. When live retrieval is configured but
/// yields nothing (every channel failed), the fixture is the fallback.
pub struct RedditSource {
    client: Option<RedditClient>,
    channels: Vec<String>,
    per_channel_limit: u32,
    fixture_path: PathBuf,
    inter_request_delay: Duration,
}

impl RedditSource {
    pub fn new(
        client: Option<RedditClient>,
        channels: Vec<String>,
        per_channel_limit: u32,
        fixture_path: PathBuf,
        inter_request_delay: Duration,
    ) -> Self {
        Self {
            client,
            channels,
            per_channel_limit,
            fixture_path,
            inter_request_delay,
        }
    }

    /// Builds a source from application config, constructing the live
    /// client only when both credentials are present. No credentials at
    /// all means fixture-only mode, which is fine; exactly one of the two
    /// is a misconfiguration worth surfacing.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::MissingCredentials`] when only one of the
    /// two credentials is set, or [`RedditError::Http`] if the HTTP
    /// client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, RedditError> {
        let client = match (&config.reddit_client_id, &config.reddit_client_secret) {
            (Some(id), Some(secret)) => Some(RedditClient::new(
                id,
                secret,
                &config.user_agent,
                config.request_timeout_secs,
            )?),
            (None, None) => None,
            _ => return Err(RedditError::MissingCredentials),
        };

        Ok(Self::new(
            client,
            config.subreddits.clone(),
            config.fetch_limit,
            config.fixture_path.clone(),
            Duration::from_millis(config.inter_request_delay_ms),
        ))
    }

    /// Collects signals across all configured channels.
    ///
    /// Channel failures are isolated and logged; the aggregate of the
    /// surviving channels is returned as long as it is non-empty. An empty
    /// aggregate (credentials absent, or every channel failed) falls back
    /// to the fixture dataset. Never returns an error.
    pub async fn fetch(&self) -> Vec<RawSignal> {
        let Some(client) = &self.client else {
            tracing::info!("Reddit credentials not configured, serving fixture data");
            return load_fixture_signals(&self.fixture_path);
        };

        let live = self.fetch_live(client).await;
        if live.is_empty() {
            tracing::warn!("no live signals collected, falling back to fixture data");
            return load_fixture_signals(&self.fixture_path);
        }

        live
    }

    /// Sequential per-channel retrieval with an inter-request politeness
    /// delay. Continues past individual channel failures, logging warnings.
    async fn fetch_live(&self, client: &RedditClient) -> Vec<RawSignal> {
        let mut signals = Vec::new();

        for (i, channel) in self.channels.iter().enumerate() {
            if i > 0 && !self.inter_request_delay.is_zero() {
                tokio::time::sleep(self.inter_request_delay).await;
            }

            match client.fetch_hot(channel, self.per_channel_limit).await {
                Ok(batch) => {
                    tracing::debug!(
                        channel = %channel,
                        count = batch.len(),
                        "collected channel signals"
                    );
                    signals.extend(batch);
                }
                Err(e) => {
                    tracing::warn!(channel = %channel, error = %e, "channel fetch failed");
                }
            }
        }

        signals
    }
}

/// Samples up to `count` signals without replacement via a partial
/// in-place Fisher-Yates shuffle.
///
/// `count >= signals.len()` returns every signal exactly once in shuffled
/// order; `count == 0` returns an empty vec.
#[must_use]
pub fn sample_signals(mut signals: Vec<RawSignal>, count: usize) -> Vec<RawSignal> {
    if count == 0 || signals.is_empty() {
        return Vec::new();
    }

    let take = count.min(signals.len());
    let mut rng = rand::rng();
    for i in 0..take {
        let j = rng.random_range(i..signals.len());
        signals.swap(i, j);
    }
    signals.truncate(take);
    signals
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn signal(id: &str) -> RawSignal {
        RawSignal {
            id: id.to_string(),
            subreddit: "startups".to_string(),
            title: format!("title {id}"),
            body: "body".to_string(),
            upvotes: 1,
            num_comments: 0,
            created_utc: 1_700_000_000.0,
        }
    }

    #[test]
    fn sample_zero_returns_empty() {
        let signals = vec![signal("a"), signal("b")];
        assert!(sample_signals(signals, 0).is_empty());
    }

    #[test]
    fn sample_count_at_least_len_returns_each_exactly_once() {
        let signals: Vec<RawSignal> = (0..10).map(|i| signal(&i.to_string())).collect();
        let sampled = sample_signals(signals, 50);

        assert_eq!(sampled.len(), 10);
        let ids: HashSet<&str> = sampled.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 10, "no signal may repeat");
    }

    #[test]
    fn sample_smaller_count_has_no_duplicates() {
        let signals: Vec<RawSignal> = (0..20).map(|i| signal(&i.to_string())).collect();
        let sampled = sample_signals(signals, 5);

        assert_eq!(sampled.len(), 5);
        let ids: HashSet<&str> = sampled.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }
}
