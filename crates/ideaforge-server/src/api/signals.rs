//! Raw-signal sampling route.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use ideaforge_core::RawSignal;
use ideaforge_reddit::sample_signals;

use super::{normalize_count, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct SignalsQuery {
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SignalItem {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub body: String,
    pub upvotes: i64,
    pub num_comments: i64,
    pub created_utc: f64,
}

impl From<RawSignal> for SignalItem {
    fn from(signal: RawSignal) -> Self {
        Self {
            id: signal.id,
            subreddit: signal.subreddit,
            title: signal.title,
            body: signal.body,
            upvotes: signal.upvotes,
            num_comments: signal.num_comments,
            created_utc: signal.created_utc,
        }
    }
}

/// `GET /api/v1/signals?count=N`
///
/// Fetches the aggregate signal batch and returns a random sample of at
/// most `count` (default from config, bounded to `1..=100`). The fetch
/// itself never errors: source failures degrade to the fixture inside
/// the source layer, so this handler is infallible.
pub async fn list_signals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SignalsQuery>,
) -> Json<ApiResponse<Vec<SignalItem>>> {
    let count = normalize_count(query.count, state.sample_count);
    let signals = state.source.fetch().await;
    tracing::debug!(fetched = signals.len(), count, "sampling signals");

    let sample: Vec<SignalItem> = sample_signals(signals, count)
        .into_iter()
        .map(SignalItem::from)
        .collect();

    Json(ApiResponse {
        data: sample,
        meta: ResponseMeta::new(req_id.0),
    })
}
