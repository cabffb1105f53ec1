//! Title-based deduplication against previously stored ideas.

use std::collections::HashSet;

use ideaforge_core::{normalized_title, Idea};

/// Returns the subset of `incoming` whose normalized title (lower-cased,
/// trimmed) does not already appear in `existing`. Pure and
/// order-preserving; applying it twice against the same `existing` set
/// changes nothing.
#[must_use]
pub fn dedupe_ideas(existing: &[Idea], incoming: Vec<Idea>) -> Vec<Idea> {
    let existing_titles: HashSet<String> = existing
        .iter()
        .map(|idea| normalized_title(&idea.title))
        .collect();

    incoming
        .into_iter()
        .filter(|idea| !existing_titles.contains(&normalized_title(&idea.title)))
        .collect()
}

#[cfg(test)]
mod tests {
    use ideaforge_core::{IdeaSource, Topic};

    use super::*;

    fn idea(title: &str) -> Idea {
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
            created_at: None,
            is_new: false,
        }
    }

    #[test]
    fn titles_collide_case_insensitively_and_ignore_whitespace() {
        let existing = vec![idea("Build a CRM")];
        let incoming = vec![idea("  build a crm "), idea("Something else")];

        let unique = dedupe_ideas(&existing, incoming);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].title, "Something else");
    }

    #[test]
    fn preserves_incoming_order() {
        let existing = vec![idea("taken")];
        let incoming = vec![idea("c"), idea("taken"), idea("a"), idea("b")];

        let unique = dedupe_ideas(&existing, incoming);
        let titles: Vec<&str> = unique.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[test]
    fn is_idempotent() {
        let existing = vec![idea("A"), idea("B")];
        let incoming = vec![idea("a "), idea("C"), idea("D")];

        let once = dedupe_ideas(&existing, incoming);
        let twice = dedupe_ideas(&existing, once.clone());

        let once_titles: Vec<&str> = once.iter().map(|i| i.title.as_str()).collect();
        let twice_titles: Vec<&str> = twice.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(once_titles, twice_titles);
    }

    #[test]
    fn empty_existing_keeps_everything() {
        let incoming = vec![idea("x"), idea("y")];
        assert_eq!(dedupe_ideas(&[], incoming).len(), 2);
    }
}
