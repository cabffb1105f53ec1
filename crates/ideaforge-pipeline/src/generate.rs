//! One-shot pipeline orchestration: fetch, filter, extract, dedupe, save.

use chrono::Utc;

use ideaforge_llm::LlmClient;
use ideaforge_reddit::RedditSource;
use ideaforge_store::IdeaStore;

use crate::dedupe::dedupe_ideas;
use crate::error::PipelineError;
use crate::extract::extract_ideas;
use crate::filter::filter_relevant;

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Upper bound on signals serialized into the relevance prompt.
    pub filter_cap: usize,
    /// `false` runs every stage except the final save (dry run).
    pub persist: bool,
}

/// Per-stage counts from one generate run.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOutcome {
    pub fetched: usize,
    pub filtered: usize,
    pub extracted: usize,
    /// Ideas actually accepted into the store this run.
    pub generated: usize,
    /// Store size after the run: prior ideas plus `generated`.
    pub total: usize,
}

/// Runs the pipeline once.
///
/// Inference failures degrade to the deterministic fallbacks inside the
/// filter and extractor, so a flaky model yields fewer or rougher ideas
/// rather than an error. An empty outcome is success with zero counts.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] only when persisting the surviving
/// ideas fails on the terminal backend.
pub async fn run_generate(
    source: &RedditSource,
    llm: &LlmClient,
    store: &IdeaStore,
    options: GenerateOptions,
) -> Result<GenerateOutcome, PipelineError> {
    let signals = source.fetch().await;
    let fetched = signals.len();

    let relevant = filter_relevant(llm, signals, options.filter_cap).await;
    let filtered = relevant.len();

    let ideas = extract_ideas(llm, &relevant, Utc::now()).await;
    let extracted = ideas.len();

    let existing = store.load().await;
    let unique = dedupe_ideas(&existing, ideas);

    let generated = if options.persist {
        store.save(unique).await?
    } else {
        unique.len()
    };
    let total = existing.len() + generated;

    tracing::info!(
        fetched,
        filtered,
        extracted,
        generated,
        total,
        persist = options.persist,
        "generate run complete"
    );

    Ok(GenerateOutcome {
        fetched,
        filtered,
        extracted,
        generated,
        total,
    })
}
