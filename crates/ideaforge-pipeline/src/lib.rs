//! The idea-mining pipeline: relevance filtering, idea extraction,
//! deduplication, and the orchestration that chains them between the
//! signal source and the store.
//!
//! Every inference-backed stage carries a deterministic fallback, so the
//! pipeline keeps producing (rougher) output when the model misbehaves.
//! Only persistence failures surface as errors.

pub mod dedupe;
pub mod error;
pub mod extract;
pub mod filter;
pub mod generate;
mod prompts;

pub use dedupe::dedupe_ideas;
pub use error::PipelineError;
pub use extract::extract_ideas;
pub use filter::{filter_relevant, FALLBACK_KEEP_COUNT};
pub use generate::{run_generate, GenerateOptions, GenerateOutcome};
