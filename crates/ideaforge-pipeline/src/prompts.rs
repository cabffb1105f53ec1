//! Prompt construction and answer parsing for the two inference calls.
//!
//! Each builder has a paired parse function so the request shape and the
//! expected answer shape live side by side. Parsing is lenient the way the
//! pipeline needs it: malformed answers yield empty collections and
//! malformed candidates drop individually, leaving fallback decisions to
//! the callers.

use serde::Deserialize;
use serde_json::Value;

use ideaforge_core::RawSignal;

/// Upper bound on signals serialized into the extraction prompt.
pub(crate) const EXTRACT_PROMPT_MAX_SIGNALS: usize = 30;

const FILTER_PROMPT_HEADER: &str = "\
You will receive a list of Reddit posts as JSON array.
Return a JSON object with a single key \"keepIds\" containing an array of post ids to keep.
Focus on high-signal pain points that could inspire products in devtools, health, education, finance, or business.

Posts JSON:";

const EXTRACT_PROMPT_HEADER: &str = r#"You are categorizing product ideas from Reddit posts. Extract concrete product ideas and categorize them accurately.

CATEGORY DEFINITIONS:

1. "devtools" - Tools, frameworks, libraries, or software that developers use to build, test, deploy, or maintain code.
   Examples: Code editors, testing frameworks, deployment tools, API clients, database tools, version control, CI/CD, monitoring tools, debugging tools, development frameworks.
   Keywords: coding, development, programming, software tools, technical, APIs, frameworks, libraries, infrastructure.

2. "health" - Products focused on physical or mental wellbeing, fitness, wellness, productivity habits, personal development, or lifestyle optimization.
   Examples: Fitness apps, habit trackers, meditation apps, sleep trackers, nutrition planners, stress management, mental health, energy management, work-life balance, burnout prevention.
   Keywords: health, fitness, wellness, habits, routines, productivity, focus, mental health, physical, meditation, sleep, energy, burnout.

3. "education" - Products that teach, train, or help people learn skills, knowledge, or best practices. Includes guides, courses, tutorials, frameworks, templates, and learning platforms.
   Examples: Online courses, tutorials, guides, how-to resources, educational content, training platforms, knowledge bases, educational frameworks, templates, checklists.
   Keywords: learn, teach, guide, tutorial, course, training, framework, template, how-to, best practices, knowledge, education.

4. "finance" - Products focused on money management, financial planning, investment, budgeting, fundraising, pricing, or financial decision-making.
   Examples: Budgeting apps, financial calculators, investment tools, fundraising platforms, pricing calculators, financial planning tools, expense trackers, ROI calculators, bootstrapping vs fundraising tools, equity calculators.
   Keywords: finance, money, budget, pricing, investment, fundraising, bootstrapping, revenue, financial, cost, pricing strategy, equity, salary, CAC, payback.

5. "business" - Products focused on business operations, sales, marketing, customer management, growth, or business strategy (non-financial).
   Examples: CRM tools, marketing automation, sales tools, lead generation, business analytics, customer acquisition tools, growth platforms, marketing calculators, business strategy tools, sales playbooks.
   Keywords: business, sales, marketing, CRM, customer acquisition, growth, lead generation, business strategy, customer management, B2B, SaaS, conversion.

6. "other" - Products that don't fit the above categories, or are too vague/generic to categorize clearly.
   Examples: Generic tools, undefined products, vague concepts without clear category.

CATEGORIZATION RULES:
- If it's a tool developers use to write/manage code -> "devtools"
- If it's about personal wellbeing, habits, or productivity optimization -> "health"
- If it's about teaching/learning/sharing knowledge -> "education"
- If it's about money, pricing, financial decisions, or financial planning -> "finance"
- If it's about business operations, sales, marketing, or customer management -> "business"
- When in doubt, prefer more specific categories over "other"

TASK:
From the following posts, extract concrete product ideas.
Return JSON with key "ideas" as an array of items with fields: title, elevatorPitch, painPoint, topic (one of devtools|health|education|finance|business|other), score (0-100), source { subreddit }.

Keep titles concise, elevatorPitch under 2 sentences. Score higher for actionable, focused concepts.
Be accurate with categorization - use the definitions above to assign the correct topic.

Posts JSON:"#;

/// Builds the relevance-filter prompt over at most `cap` signals.
///
/// # Errors
///
/// Returns a `serde_json::Error` if the signals cannot be serialized.
pub(crate) fn build_filter_prompt(
    signals: &[RawSignal],
    cap: usize,
) -> Result<String, serde_json::Error> {
    let take = signals.len().min(cap);
    let serialized = serde_json::to_string(&signals[..take])?;
    Ok(format!("{FILTER_PROMPT_HEADER}\n{serialized}"))
}

/// Builds the idea-extraction prompt carrying the topic taxonomy and at
/// most [`EXTRACT_PROMPT_MAX_SIGNALS`] signals.
///
/// # Errors
///
/// Returns a `serde_json::Error` if the signals cannot be serialized.
pub(crate) fn build_extract_prompt(signals: &[RawSignal]) -> Result<String, serde_json::Error> {
    let take = signals.len().min(EXTRACT_PROMPT_MAX_SIGNALS);
    let serialized = serde_json::to_string(&signals[..take])?;
    Ok(format!("{EXTRACT_PROMPT_HEADER}\n{serialized}"))
}

/// Extracts the `keepIds` list from a filter answer, keeping only string
/// entries. Any other shape yields an empty list.
pub(crate) fn parse_keep_ids(value: &Value) -> Vec<String> {
    let Some(ids) = value.get("keepIds").and_then(Value::as_array) else {
        return Vec::new();
    };
    ids.iter()
        .filter_map(Value::as_str)
        .map(ToOwned::to_owned)
        .collect()
}

/// One structurally valid entry from the extraction answer's `ideas` array.
///
/// `topic` and `url` stay untyped: a wrong-typed value there degrades to a
/// default instead of dropping the candidate. Every other field is strict,
/// so a candidate missing or mistyping one fails deserialization and drops
/// on its own.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdeaCandidate {
    pub(crate) title: String,
    pub(crate) elevator_pitch: String,
    pub(crate) pain_point: String,
    #[serde(default)]
    pub(crate) topic: Option<Value>,
    pub(crate) score: f64,
    pub(crate) source: CandidateSource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateSource {
    pub(crate) subreddit: String,
    #[serde(default)]
    pub(crate) url: Option<Value>,
}

/// Extracts candidates from an extraction answer, dropping malformed
/// entries individually. Any other top-level shape yields an empty list.
pub(crate) fn parse_idea_candidates(value: &Value) -> Vec<IdeaCandidate> {
    let Some(items) = value.get("ideas").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}
