//! Reddit API client (client-credentials OAuth) with a cached access token.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use ideaforge_core::RawSignal;

use crate::error::RedditError;

const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Refresh the cached token this far ahead of its stated expiry so an
/// in-flight request never rides a token that dies mid-request.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Reddit hot listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

/// Raw post payload. Every field is optional so one malformed post drops
/// individually instead of failing the whole listing decode.
#[derive(Debug, Deserialize)]
struct PostData {
    id: Option<String>,
    subreddit: Option<String>,
    title: Option<String>,
    selftext: Option<String>,
    ups: Option<i64>,
    num_comments: Option<i64>,
    created_utc: Option<f64>,
}

impl PostData {
    fn into_signal(self) -> Option<RawSignal> {
        Some(RawSignal {
            id: self.id?,
            subreddit: self.subreddit?,
            title: self.title?,
            body: self.selftext?,
            upvotes: self.ups?,
            num_comments: self.num_comments?,
            created_utc: self.created_utc?,
        })
    }
}

/// Access token plus the deadline after which it must not be reused.
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_usable(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Reddit API client holding credentials and a lazily acquired token.
///
/// The token lives behind an async mutex on the client instance, so a
/// single client shared across tasks performs one token exchange per
/// expiry window. Use [`RedditClient::new`] for production or
/// [`RedditClient::with_base_urls`] to point at a mock server in tests.
pub struct RedditClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    auth_base: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// Creates a client pointed at the public Reddit endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        client_id: &str,
        client_secret: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, RedditError> {
        Self::with_base_urls(
            client_id,
            client_secret,
            user_agent,
            timeout_secs,
            DEFAULT_AUTH_BASE,
            DEFAULT_API_BASE,
        )
    }

    /// Creates a client with custom token-exchange and API base URLs
    /// (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_urls(
        client_id: &str,
        client_secret: &str,
        user_agent: &str,
        timeout_secs: u64,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, RedditError> {
        // oauth.reddit.com sometimes blocks rustls via TLS fingerprinting.
        // If rejected, enable `native-tls` on reqwest and call `.use_native_tls()`.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            user_agent: user_agent.to_owned(),
            auth_base: auth_base.trim_end_matches('/').to_owned(),
            api_base: api_base.trim_end_matches('/').to_owned(),
            token: Mutex::new(None),
        })
    }

    /// Returns a usable bearer token, exchanging credentials only when the
    /// cached one is absent or inside the expiry margin.
    async fn bearer_token(&self) -> Result<String, RedditError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.is_usable() {
                return Ok(cached.token.clone());
            }
        }

        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .header("User-Agent", &self.user_agent)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RedditError::Api(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| RedditError::Api(format!("token parse error: {e}")))?;

        let token = token_resp.access_token.clone();
        *guard = Some(CachedToken {
            token: token_resp.access_token,
            expires_at: Instant::now() + Duration::from_secs(token_resp.expires_in),
        });

        Ok(token)
    }

    /// Fetches the hot listing for one channel, mapped into [`RawSignal`]s.
    ///
    /// Accepts the channel name with or without a leading `r/`. Posts that
    /// fail structural decode are dropped individually.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Api`] on a non-success status or undecodable
    /// listing body, [`RedditError::Http`] on transport failure.
    pub async fn fetch_hot(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RawSignal>, RedditError> {
        let token = self.bearer_token().await?;
        let name = subreddit.trim_start_matches("r/");

        let response = self
            .client
            .get(format!("{}/r/{name}/hot.json", self.api_base))
            .header("Authorization", format!("Bearer {token}"))
            .header("User-Agent", &self.user_agent)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RedditError::Api(format!(
                "hot listing for r/{name} failed with status {}",
                response.status()
            )));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| RedditError::Api(format!("listing parse error for r/{name}: {e}")))?;

        let signals: Vec<RawSignal> = listing
            .data
            .children
            .into_iter()
            .filter_map(|post| post.data.into_signal())
            .collect();

        tracing::debug!(
            subreddit = name,
            count = signals.len(),
            "fetched hot listing"
        );

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_data_missing_required_field_drops() {
        let complete = PostData {
            id: Some("abc".to_string()),
            subreddit: Some("startups".to_string()),
            title: Some("t".to_string()),
            selftext: Some(String::new()),
            ups: Some(3),
            num_comments: Some(1),
            created_utc: Some(1_700_000_000.0),
        };
        assert!(complete.into_signal().is_some());

        let missing_id = PostData {
            id: None,
            subreddit: Some("startups".to_string()),
            title: Some("t".to_string()),
            selftext: Some(String::new()),
            ups: Some(3),
            num_comments: Some(1),
            created_utc: Some(1_700_000_000.0),
        };
        assert!(missing_id.into_signal().is_none());
    }

    #[test]
    fn cached_token_inside_margin_is_stale() {
        let fresh = CachedToken {
            token: "t".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3600),
        };
        assert!(fresh.is_usable());

        let nearly_expired = CachedToken {
            token: "t".to_string(),
            expires_at: Instant::now() + Duration::from_secs(30),
        };
        assert!(!nearly_expired.is_usable(), "30s left is inside the 60s margin");
    }
}
