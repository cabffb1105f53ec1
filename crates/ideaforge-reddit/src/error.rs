use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit credentials are incomplete: client id and secret must both be set")]
    MissingCredentials,

    #[error("Reddit API error: {0}")]
    Api(String),
}
