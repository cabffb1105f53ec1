//! Read routes over persisted ideas.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use ideaforge_core::{annotate_freshness, Idea, Topic, FRESHNESS_WINDOW_HOURS};

use super::{ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Wire item for an idea: flattened provenance, snake_case, and the
/// read-time `is_new` flag that the persisted form deliberately omits.
#[derive(Debug, Serialize)]
pub struct IdeaItem {
    pub title: String,
    pub elevator_pitch: String,
    pub pain_point: String,
    pub topic: Topic,
    pub score: i16,
    pub source_subreddit: String,
    pub source_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub is_new: bool,
}

impl From<Idea> for IdeaItem {
    fn from(idea: Idea) -> Self {
        Self {
            title: idea.title,
            elevator_pitch: idea.elevator_pitch,
            pain_point: idea.pain_point,
            topic: idea.topic,
            score: idea.score,
            source_subreddit: idea.source.subreddit,
            source_url: idea.source.url,
            created_at: idea.created_at,
            is_new: idea.is_new,
        }
    }
}

fn into_items(ideas: Vec<Idea>) -> Vec<IdeaItem> {
    annotate_freshness(ideas, Utc::now())
        .into_iter()
        .map(IdeaItem::from)
        .collect()
}

/// `GET /api/v1/ideas`
///
/// Every stored idea, newest first, freshness-annotated at read time.
/// Store reads never raise, so neither does this handler.
pub async fn list_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<IdeaItem>>> {
    let ideas = state.store.load().await;
    tracing::debug!(count = ideas.len(), "listing ideas");

    Json(ApiResponse {
        data: into_items(ideas),
        meta: ResponseMeta::new(req_id.0),
    })
}

/// `GET /api/v1/ideas/fresh`
///
/// Only ideas created inside the freshness window.
pub async fn list_fresh_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<IdeaItem>>> {
    let ideas = state
        .store
        .load_recent(Duration::hours(FRESHNESS_WINDOW_HOURS))
        .await;
    tracing::debug!(count = ideas.len(), "listing fresh ideas");

    Json(ApiResponse {
        data: into_items(ideas),
        meta: ResponseMeta::new(req_id.0),
    })
}
