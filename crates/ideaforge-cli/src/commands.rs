//! Command handlers, called from `main` after config is loaded.
//!
//! Each handler builds only the pieces its command touches. Store
//! construction mirrors the server: a configured database is attached
//! lazily and migrations are best-effort, so every command still works
//! against the snapshot file alone.

use chrono::Utc;

use ideaforge_core::{annotate_freshness, AppConfig, FRESHNESS_WINDOW_HOURS};
use ideaforge_llm::LlmClient;
use ideaforge_pipeline::GenerateOptions;
use ideaforge_reddit::{sample_signals, RedditSource};
use ideaforge_store::{IdeaStore, PoolConfig};

async fn build_store(config: &AppConfig) -> anyhow::Result<IdeaStore> {
    let pool = match &config.database_url {
        Some(url) => {
            let pool = ideaforge_store::connect_pool_lazy(url, PoolConfig::from_app_config(config))?;
            if let Err(e) = ideaforge_store::run_migrations(&pool).await {
                tracing::warn!(error = %e, "migrations failed; saves will fall back to the snapshot");
            }
            Some(pool)
        }
        None => None,
    };
    Ok(IdeaStore::new(pool, config.snapshot_path.clone()))
}

/// Run the pipeline once and report per-stage counts.
///
/// With `dry_run` every stage runs except the final save, so the counts
/// show what a real run would have accepted.
pub(crate) async fn run_generate(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let source = RedditSource::from_config(config)?;
    let llm = LlmClient::from_config(config)?;
    let store = build_store(config).await?;

    if dry_run {
        println!("dry-run: nothing will be saved");
    }

    let outcome = ideaforge_pipeline::run_generate(
        &source,
        &llm,
        &store,
        GenerateOptions {
            filter_cap: config.filter_cap,
            persist: !dry_run,
        },
    )
    .await?;

    println!(
        "fetched {} signals, kept {}, extracted {}, accepted {} new ideas ({} total)",
        outcome.fetched, outcome.filtered, outcome.extracted, outcome.generated, outcome.total
    );
    Ok(())
}

/// Print stored ideas with their read-time freshness marker.
pub(crate) async fn run_ideas(config: &AppConfig, fresh: bool) -> anyhow::Result<()> {
    let store = build_store(config).await?;
    let ideas = if fresh {
        store
            .load_recent(chrono::Duration::hours(FRESHNESS_WINDOW_HOURS))
            .await
    } else {
        store.load().await
    };
    let ideas = annotate_freshness(ideas, Utc::now());

    if ideas.is_empty() {
        println!("no ideas stored yet; run `ideaforge-cli generate` first");
        return Ok(());
    }

    for idea in &ideas {
        let marker = if idea.is_new { "*" } else { " " };
        let when = idea.created_at.map_or_else(
            || "unknown".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );
        println!(
            "{marker} [{:>3}] {} ({}, r/{}, {when})",
            idea.score, idea.title, idea.topic, idea.source.subreddit
        );
        println!("        {}", idea.elevator_pitch);
    }

    let new_count = ideas.iter().filter(|i| i.is_new).count();
    println!("{} ideas ({new_count} new)", ideas.len());
    Ok(())
}

/// Print a random sample of the current signal batch.
pub(crate) async fn run_signals(config: &AppConfig, count: Option<usize>) -> anyhow::Result<()> {
    let source = RedditSource::from_config(config)?;
    // Same 1..=100 bound the HTTP surface applies.
    let requested = count.unwrap_or(config.sample_count).clamp(1, 100);

    let signals = source.fetch().await;
    let fetched = signals.len();
    let sample = sample_signals(signals, requested);

    println!("sampled {} of {fetched} signals:", sample.len());
    for signal in &sample {
        println!(
            "[{:>5} up, {:>4} comments] r/{}: {}",
            signal.upvotes, signal.num_comments, signal.subreddit, signal.title
        );
    }
    Ok(())
}
