//! Inference gateway for the idea pipeline.
//!
//! One concern: take a prompt, return the model's JSON answer, and absorb
//! the flakiness of a remote inference endpoint behind bounded retries.
//! Deterministic fallbacks for failed inference live with the callers in
//! `ideaforge-pipeline`, not here.

pub mod client;
pub mod error;
mod retry;

pub use client::LlmClient;
pub use error::LlmError;
