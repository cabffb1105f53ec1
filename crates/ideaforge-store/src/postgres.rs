//! Database operations for the `ideas` and `sources` tables.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ideaforge_core::{normalized_title, Idea, IdeaSource, Topic};

use crate::StoreError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `ideas` table, joined with its `sources` dimension row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdeaRow {
    pub id: i64,
    pub title: String,
    pub elevator_pitch: String,
    pub pain_point: String,
    /// Stored as free text; unknown values coerce to the catch-all on read.
    pub topic: String,
    pub score: i16,
    /// Nullable foreign key to `sources`. NULL when dimension resolution
    /// failed at save time.
    pub source_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Joined from `sources`; NULL when `source_id` is NULL.
    pub source_subreddit: Option<String>,
    pub source_url: Option<String>,
}

impl IdeaRow {
    /// Converts a joined row into the domain record.
    ///
    /// Provenance-less rows get the placeholder channel name so every idea
    /// keeps a renderable source.
    #[must_use]
    pub fn into_idea(self) -> Idea {
        Idea {
            title: self.title,
            elevator_pitch: self.elevator_pitch,
            pain_point: self.pain_point,
            topic: Topic::parse_lenient(&self.topic),
            score: self.score,
            source: IdeaSource {
                subreddit: self
                    .source_subreddit
                    .unwrap_or_else(|| "unknown".to_string()),
                url: self.source_url,
            },
            created_at: Some(self.created_at),
            is_new: false,
        }
    }
}

// ---------------------------------------------------------------------------
// sources operations
// ---------------------------------------------------------------------------

const SELECT_SOURCE_ID: &str =
    "SELECT id FROM sources WHERE subreddit = $1 AND url IS NOT DISTINCT FROM $2";

/// Returns the id of the `sources` row for `(subreddit, url)`, inserting it
/// if absent.
///
/// Concurrent savers can race past the lookup and collide on the unique
/// constraint; the loser re-selects the row the winner created.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the lookup or insert fails for any
/// reason other than the unique-violation race.
pub async fn resolve_source(
    pool: &PgPool,
    subreddit: &str,
    url: Option<&str>,
) -> Result<i64, StoreError> {
    let existing: Option<i64> = sqlx::query_scalar::<_, i64>(SELECT_SOURCE_ID)
        .bind(subreddit)
        .bind(url)
        .fetch_optional(pool)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO sources (subreddit, url) VALUES ($1, $2) RETURNING id",
    )
    .bind(subreddit)
    .bind(url)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            // Lost the insert race; the row exists now.
            let id = sqlx::query_scalar::<_, i64>(SELECT_SOURCE_ID)
                .bind(subreddit)
                .bind(url)
                .fetch_optional(pool)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            Ok(id)
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// ideas operations
// ---------------------------------------------------------------------------

/// Inserts the given ideas, skipping any whose normalized title already
/// exists.
///
/// The title re-check runs here regardless of caller-side dedup, so the
/// primary stays duplicate-free even when two generation runs interleave
/// between a caller's load and its save. A failed dimension resolution
/// degrades the affected ideas to `source_id = NULL` instead of failing the
/// batch.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the title scan or the insert fails.
pub async fn save_ideas(pool: &PgPool, ideas: &[Idea]) -> Result<usize, StoreError> {
    if ideas.is_empty() {
        return Ok(0);
    }

    let stored_titles: Vec<String> = sqlx::query_scalar::<_, String>("SELECT title FROM ideas")
        .fetch_all(pool)
        .await?;
    let stored_titles: HashSet<String> = stored_titles
        .iter()
        .map(|title| normalized_title(title))
        .collect();

    let fresh: Vec<&Idea> = ideas
        .iter()
        .filter(|idea| !stored_titles.contains(&normalized_title(&idea.title)))
        .collect();
    if fresh.is_empty() {
        return Ok(0);
    }

    // One dimension row per distinct (subreddit, url) pair in the batch.
    let mut resolved: HashMap<(String, Option<String>), Option<i64>> = HashMap::new();
    for idea in &fresh {
        let key = (idea.source.subreddit.clone(), idea.source.url.clone());
        if resolved.contains_key(&key) {
            continue;
        }
        let source_id = match resolve_source(pool, &key.0, key.1.as_deref()).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    subreddit = %key.0,
                    error = %e,
                    "source resolution failed, saving idea without provenance"
                );
                None
            }
        };
        resolved.insert(key, source_id);
    }

    let mut titles = Vec::with_capacity(fresh.len());
    let mut pitches = Vec::with_capacity(fresh.len());
    let mut pains = Vec::with_capacity(fresh.len());
    let mut topics = Vec::with_capacity(fresh.len());
    let mut scores = Vec::with_capacity(fresh.len());
    let mut source_ids = Vec::with_capacity(fresh.len());
    let mut created = Vec::with_capacity(fresh.len());
    for idea in &fresh {
        titles.push(idea.title.clone());
        pitches.push(idea.elevator_pitch.clone());
        pains.push(idea.pain_point.clone());
        topics.push(idea.topic.as_str().to_string());
        scores.push(idea.score);
        source_ids.push(
            resolved
                .get(&(idea.source.subreddit.clone(), idea.source.url.clone()))
                .copied()
                .flatten(),
        );
        created.push(idea.created_at.unwrap_or_else(Utc::now));
    }

    let inserted = sqlx::query(
        "INSERT INTO ideas \
             (title, elevator_pitch, pain_point, topic, score, source_id, created_at) \
         SELECT * FROM UNNEST \
             ($1::text[], $2::text[], $3::text[], $4::text[], \
              $5::smallint[], $6::bigint[], $7::timestamptz[])",
    )
    .bind(&titles)
    .bind(&pitches)
    .bind(&pains)
    .bind(&topics)
    .bind(&scores)
    .bind(&source_ids)
    .bind(&created)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(usize::try_from(inserted).unwrap_or(0))
}

/// Returns every stored idea, newest first.
///
/// Ordered by `created_at DESC, id DESC` so ties on the timestamp still
/// produce a stable order.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the query fails.
pub async fn load_ideas(pool: &PgPool) -> Result<Vec<Idea>, StoreError> {
    let rows = sqlx::query_as::<_, IdeaRow>(
        "SELECT i.id, i.title, i.elevator_pitch, i.pain_point, i.topic, \
                i.score, i.source_id, i.created_at, \
                s.subreddit AS source_subreddit, s.url AS source_url \
         FROM ideas i \
         LEFT JOIN sources s ON s.id = i.source_id \
         ORDER BY i.created_at DESC, i.id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(IdeaRow::into_idea).collect())
}

/// Returns ideas created at or after `since`, newest first.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the query fails.
pub async fn load_recent_ideas(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<Idea>, StoreError> {
    let rows = sqlx::query_as::<_, IdeaRow>(
        "SELECT i.id, i.title, i.elevator_pitch, i.pain_point, i.topic, \
                i.score, i.source_id, i.created_at, \
                s.subreddit AS source_subreddit, s.url AS source_url \
         FROM ideas i \
         LEFT JOIN sources s ON s.id = i.source_id \
         WHERE i.created_at >= $1 \
         ORDER BY i.created_at DESC, i.id DESC",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(IdeaRow::into_idea).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> IdeaRow {
        IdeaRow {
            id: 7,
            title: "Compliance copilot".to_string(),
            elevator_pitch: "Automates SOC2 evidence collection.".to_string(),
            pain_point: "Audits eat entire engineering sprints.".to_string(),
            topic: "business".to_string(),
            score: 82,
            source_id: Some(3),
            created_at: Utc::now(),
            source_subreddit: Some("startups".to_string()),
            source_url: Some("https://reddit.com/r/startups/abc".to_string()),
        }
    }

    #[test]
    fn row_maps_to_idea_with_provenance() {
        let row = sample_row();
        let created_at = row.created_at;

        let idea = row.into_idea();

        assert_eq!(idea.title, "Compliance copilot");
        assert_eq!(idea.topic, Topic::Business);
        assert_eq!(idea.score, 82);
        assert_eq!(idea.source.subreddit, "startups");
        assert_eq!(
            idea.source.url.as_deref(),
            Some("https://reddit.com/r/startups/abc")
        );
        assert_eq!(idea.created_at, Some(created_at));
        assert!(!idea.is_new, "freshness is projected later, never stored");
    }

    #[test]
    fn row_without_source_join_falls_back_to_unknown_channel() {
        let mut row = sample_row();
        row.source_id = None;
        row.source_subreddit = None;
        row.source_url = None;

        let idea = row.into_idea();

        assert_eq!(idea.source.subreddit, "unknown");
        assert!(idea.source.url.is_none());
    }

    #[test]
    fn unrecognized_stored_topic_coerces_to_other() {
        let mut row = sample_row();
        row.topic = "blockchain".to_string();

        assert_eq!(row.into_idea().topic, Topic::Other);
    }
}
