//! Shared domain types and configuration for ideaforge.
//!
//! Holds the signal and idea records that flow through the pipeline, the
//! closed topic taxonomy, the read-time freshness projection, and the
//! env-driven application config. Everything here is pure — no I/O except
//! the env lookups behind [`load_app_config`].

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod freshness;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use freshness::{annotate_freshness, is_idea_new, FRESHNESS_WINDOW_HOURS};
pub use types::{clamp_score, normalized_title, Idea, IdeaSource, RawSignal, Topic};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
