//! Idea extraction with a heuristic fallback when inference yields nothing.

use chrono::{DateTime, Utc};
use serde_json::Value;

use ideaforge_core::{clamp_score, Idea, IdeaSource, RawSignal, Topic};
use ideaforge_llm::LlmClient;

use crate::prompts::{build_extract_prompt, parse_idea_candidates, IdeaCandidate};

/// How many signals the heuristic fallback turns into one idea each.
const HEURISTIC_FALLBACK_MAX: usize = 10;
/// How much of the signal body the fallback elevator pitch quotes.
const HEURISTIC_SNIPPET_CHARS: usize = 140;

/// Turns filtered signals into structured ideas via the extraction prompt.
///
/// Each candidate in the answer validates independently: string fields must
/// be non-empty after trimming and the score must be numeric; invalid
/// candidates drop without aborting the batch. Out-of-taxonomy topics
/// coerce to [`Topic::Other`], scores round then clamp to 0..=100, and
/// accepted ideas are stamped `created_at = now`.
///
/// Zero survivors — including total inference failure — trigger the
/// heuristic fallback: up to [`HEURISTIC_FALLBACK_MAX`] signals synthesize
/// one idea each straight from their title and body.
pub async fn extract_ideas(
    llm: &LlmClient,
    signals: &[RawSignal],
    now: DateTime<Utc>,
) -> Vec<Idea> {
    if signals.is_empty() {
        return Vec::new();
    }

    let candidates = request_candidates(llm, signals).await;
    let ideas: Vec<Idea> = candidates
        .into_iter()
        .filter_map(|candidate| candidate_into_idea(candidate, now))
        .collect();

    if ideas.is_empty() {
        tracing::warn!(
            signals = signals.len(),
            "inference yielded no usable ideas, synthesizing heuristic fallback"
        );
        return heuristic_ideas(signals, now);
    }

    ideas
}

async fn request_candidates(llm: &LlmClient, signals: &[RawSignal]) -> Vec<IdeaCandidate> {
    let prompt = match build_extract_prompt(signals) {
        Ok(prompt) => prompt,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize signals for the extraction prompt");
            return Vec::new();
        }
    };

    match llm.infer(&prompt).await {
        Ok(answer) => parse_idea_candidates(&answer),
        Err(e) => {
            tracing::warn!(error = %e, "idea extraction inference failed");
            Vec::new()
        }
    }
}

fn candidate_into_idea(candidate: IdeaCandidate, now: DateTime<Utc>) -> Option<Idea> {
    let title = non_empty_trimmed(&candidate.title)?;
    let elevator_pitch = non_empty_trimmed(&candidate.elevator_pitch)?;
    let pain_point = non_empty_trimmed(&candidate.pain_point)?;
    let subreddit = non_empty_trimmed(&candidate.source.subreddit)?;

    let topic = candidate
        .topic
        .as_ref()
        .and_then(Value::as_str)
        .map_or(Topic::Other, Topic::parse_lenient);

    let url = candidate
        .source
        .url
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned);

    Some(Idea {
        title,
        elevator_pitch,
        pain_point,
        topic,
        score: clamp_score(candidate.score),
        source: IdeaSource { subreddit, url },
        created_at: Some(now),
        is_new: false,
    })
}

fn non_empty_trimmed(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Synthesizes one idea per signal from its title and body: topic
/// [`Topic::Other`], score `clamp(round(upvotes / 10), 10, 90)`.
fn heuristic_ideas(signals: &[RawSignal], now: DateTime<Utc>) -> Vec<Idea> {
    signals
        .iter()
        .take(HEURISTIC_FALLBACK_MAX)
        .map(|signal| {
            let snippet: String = signal.body.chars().take(HEURISTIC_SNIPPET_CHARS).collect();
            Idea {
                title: signal.title.trim().to_string(),
                elevator_pitch: format!("A solution addressing: {snippet}..."),
                pain_point: signal.body.clone(),
                topic: Topic::Other,
                score: heuristic_score(signal.upvotes),
                source: IdeaSource {
                    subreddit: signal.subreddit.clone(),
                    url: None,
                },
                created_at: Some(now),
                is_new: false,
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn heuristic_score(upvotes: i64) -> i16 {
    (upvotes as f64 / 10.0).round().clamp(10.0, 90.0) as i16
}
