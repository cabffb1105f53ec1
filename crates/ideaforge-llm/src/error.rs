use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set; inference calls cannot be made")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("inference response missing message content")]
    MissingContent,
}
