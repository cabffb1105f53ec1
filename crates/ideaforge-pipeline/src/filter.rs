//! Relevance filtering with a deterministic popularity fallback.

use std::collections::HashSet;

use ideaforge_core::RawSignal;
use ideaforge_llm::LlmClient;

use crate::prompts::{build_filter_prompt, parse_keep_ids};

/// How many signals the popularity fallback keeps when inference gives
/// back no usable keep list.
pub const FALLBACK_KEEP_COUNT: usize = 15;

/// Keeps the signals the model judges worth mining, by id.
///
/// At most `cap` signals are serialized into the prompt; the returned
/// records are the original ones, untouched. An empty keep list — whether
/// from inference failure, a malformed answer, or a genuinely empty
/// answer — falls back to the top [`FALLBACK_KEEP_COUNT`] signals by
/// upvotes. A non-empty keep list is honored verbatim, even when it
/// matches nothing.
pub async fn filter_relevant(
    llm: &LlmClient,
    signals: Vec<RawSignal>,
    cap: usize,
) -> Vec<RawSignal> {
    if signals.is_empty() {
        return signals;
    }

    let keep_ids = request_keep_ids(llm, &signals, cap).await;

    if keep_ids.is_empty() {
        tracing::warn!(
            keep = FALLBACK_KEEP_COUNT.min(signals.len()),
            "no keep ids from inference, keeping top signals by upvotes"
        );
        return top_by_upvotes(signals, FALLBACK_KEEP_COUNT);
    }

    let id_set: HashSet<&str> = keep_ids.iter().map(String::as_str).collect();
    signals
        .into_iter()
        .filter(|signal| id_set.contains(signal.id.as_str()))
        .collect()
}

async fn request_keep_ids(llm: &LlmClient, signals: &[RawSignal], cap: usize) -> Vec<String> {
    let prompt = match build_filter_prompt(signals, cap) {
        Ok(prompt) => prompt,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize signals for the filter prompt");
            return Vec::new();
        }
    };

    match llm.infer(&prompt).await {
        Ok(answer) => parse_keep_ids(&answer),
        Err(e) => {
            tracing::warn!(error = %e, "relevance inference failed");
            Vec::new()
        }
    }
}

fn top_by_upvotes(mut signals: Vec<RawSignal>, count: usize) -> Vec<RawSignal> {
    signals.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
    signals.truncate(count);
    signals
}
