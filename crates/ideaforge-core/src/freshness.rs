//! Read-time freshness projection over stored ideas.
//!
//! `is_new` is derived on every read and never written back to storage; the
//! persistence layer strips it on the way in, this module recomputes it on
//! the way out.

use chrono::{DateTime, Duration, Utc};

use crate::types::Idea;

/// An idea counts as new while it is at most this many hours old.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// How many leading ideas to flag when no record in the batch carries a
/// timestamp, so consumers are never shown a batch devoid of novelty signal.
const FALLBACK_NEW_COUNT: usize = 3;

/// Returns whether a single creation timestamp falls inside the freshness
/// window. Missing timestamps are never new.
#[must_use]
pub fn is_idea_new(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match created_at {
        Some(created) => now.signed_duration_since(created) <= Duration::hours(FRESHNESS_WINDOW_HOURS),
        None => false,
    }
}

/// Recomputes `is_new` for a batch of ideas.
///
/// Each idea with a timestamp is flagged by the 24-hour window. Ideas
/// without one default to not-new — unless the whole batch lacks
/// timestamps, in which case the first [`FALLBACK_NEW_COUNT`] are marked
/// new. Order is preserved; nothing else about the ideas changes.
#[must_use]
pub fn annotate_freshness(mut ideas: Vec<Idea>, now: DateTime<Utc>) -> Vec<Idea> {
    if ideas.is_empty() {
        return ideas;
    }

    let mut any_timestamp = false;
    for idea in &mut ideas {
        idea.is_new = is_idea_new(idea.created_at, now);
        any_timestamp |= idea.created_at.is_some();
    }

    if !any_timestamp {
        for idea in ideas.iter_mut().take(FALLBACK_NEW_COUNT) {
            idea.is_new = true;
        }
    }

    ideas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IdeaSource, Topic};

    fn idea(title: &str, created_at: Option<DateTime<Utc>>) -> Idea {
        Idea {
            title: title.to_string(),
            elevator_pitch: "pitch".to_string(),
            pain_point: "pain".to_string(),
            topic: Topic::Other,
            score: 50,
            source: IdeaSource {
                subreddit: "startups".to_string(),
                url: None,
            },
            created_at,
            is_new: false,
        }
    }

    #[test]
    fn ideas_created_one_hour_ago_are_all_new() {
        let now = Utc::now();
        let batch = vec![
            idea("a", Some(now - Duration::hours(1))),
            idea("b", Some(now - Duration::hours(1))),
        ];

        let annotated = annotate_freshness(batch, now);
        assert!(annotated.iter().all(|i| i.is_new));
    }

    #[test]
    fn ideas_created_two_days_ago_are_not_new() {
        let now = Utc::now();
        let batch = vec![
            idea("a", Some(now - Duration::hours(48))),
            idea("b", Some(now - Duration::hours(48))),
        ];

        let annotated = annotate_freshness(batch, now);
        assert!(annotated.iter().all(|i| !i.is_new));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(is_idea_new(Some(now - Duration::hours(24)), now));
        assert!(!is_idea_new(
            Some(now - Duration::hours(24) - Duration::seconds(1)),
            now
        ));
    }

    #[test]
    fn timestampless_batch_marks_exactly_first_three() {
        let now = Utc::now();
        let batch = vec![
            idea("a", None),
            idea("b", None),
            idea("c", None),
            idea("d", None),
            idea("e", None),
        ];

        let annotated = annotate_freshness(batch, now);
        let flags: Vec<bool> = annotated.iter().map(|i| i.is_new).collect();
        assert_eq!(flags, vec![true, true, true, false, false]);
    }

    #[test]
    fn fallback_handles_batches_smaller_than_three() {
        let now = Utc::now();
        let annotated = annotate_freshness(vec![idea("only", None)], now);
        assert!(annotated[0].is_new);
    }

    #[test]
    fn single_timestamp_disables_the_fallback() {
        let now = Utc::now();
        let batch = vec![
            idea("stale", Some(now - Duration::hours(72))),
            idea("no-ts-1", None),
            idea("no-ts-2", None),
            idea("no-ts-3", None),
        ];

        let annotated = annotate_freshness(batch, now);
        assert!(
            annotated.iter().all(|i| !i.is_new),
            "one parseable timestamp means missing ones stay not-new"
        );
    }

    #[test]
    fn empty_batch_stays_empty() {
        assert!(annotate_freshness(Vec::new(), Utc::now()).is_empty());
    }
}
