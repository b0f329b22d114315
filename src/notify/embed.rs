//! Webhook payload model and digest builder
//!
//! One cycle produces one embed: a headline, then a field for the popular
//! list and a field for the trending list. Field values are truncated to the
//! sink's budget with a `...` marker.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::summary::summarize;
use crate::discovery::Candidate;
use crate::ranking::{ClassificationMode, Timeframe};

/// Maximum characters in an embed field value
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Maximum characters of a per-candidate summary line
pub const SUMMARY_LIMIT: usize = 120;

const ELLIPSIS: &str = "...";
const TOPICAL_COLOR: u32 = 5_814_783;
const COMMERCIAL_COLOR: u32 = 3_447_003;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into(),
            value: truncate_with_ellipsis(value, FIELD_VALUE_LIMIT),
            inline: false,
        }
    }
}

/// Cut `text` so the result, including the ellipsis, is at most `max_chars`
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// `1234567` → `1,234,567`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One ranked line for a candidate
pub fn format_entry(candidate: &Candidate, rank: usize) -> String {
    let summary = truncate_with_ellipsis(&summarize(candidate), SUMMARY_LIMIT);

    format!(
        "{}. **{}** - ⭐{} 🍴{} 📝{}\n   💡 {}\n   [🔗 View project]({})",
        rank,
        candidate.name,
        format_count(candidate.stars),
        format_count(candidate.forks),
        candidate.language_or_unknown(),
        summary,
        candidate.url
    )
}

fn format_list(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format_entry(c, i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn headline(mode: ClassificationMode, timeframe: Timeframe) -> &'static str {
    match (mode, timeframe) {
        (ClassificationMode::Topical, Timeframe::Lifetime) => {
            "Most noteworthy open-source AI projects"
        }
        (ClassificationMode::Topical, Timeframe::Days30) => {
            "Fastest-rising AI projects of the last 30 days"
        }
        (ClassificationMode::Topical, Timeframe::Days7) => {
            "Fastest-rising AI projects of the last 7 days"
        }
        (ClassificationMode::Commercial, Timeframe::Lifetime) => {
            "Open-source AI projects with the most commercial value"
        }
        (ClassificationMode::Commercial, Timeframe::Days30) => {
            "Commercial AI projects trending over the last 30 days"
        }
        (ClassificationMode::Commercial, Timeframe::Days7) => {
            "Commercial AI projects taking off over the last 7 days"
        }
    }
}

fn trending_field_name(mode: ClassificationMode, timeframe: Timeframe) -> &'static str {
    match (mode, timeframe) {
        (ClassificationMode::Topical, Timeframe::Lifetime) => "📈 Fastest-trending AI projects",
        (ClassificationMode::Topical, Timeframe::Days30) => {
            "📈 Fastest-rising AI projects (30 days)"
        }
        (ClassificationMode::Topical, Timeframe::Days7) => "🚀 Fastest-rising AI projects (7 days)",
        (ClassificationMode::Commercial, Timeframe::Lifetime) => {
            "💼 Fastest-trending commercial AI projects"
        }
        (ClassificationMode::Commercial, Timeframe::Days30) => {
            "💼 Commercial AI projects trending (30 days)"
        }
        (ClassificationMode::Commercial, Timeframe::Days7) => {
            "🚀 Commercial AI projects taking off (7 days)"
        }
    }
}

/// Build the digest for one cycle
///
/// Empty lists produce no field.
pub fn build_digest(
    mode: ClassificationMode,
    timeframe: Timeframe,
    popular: &[Candidate],
    trending: &[Candidate],
    now: DateTime<Utc>,
) -> WebhookPayload {
    let (title, color, popular_field) = match mode {
        ClassificationMode::Topical => (
            "🤖 AI Project Daily",
            TOPICAL_COLOR,
            "⭐ Most-starred AI projects",
        ),
        ClassificationMode::Commercial => (
            "💼 Commercial AI Project Daily",
            COMMERCIAL_COLOR,
            "🏆 Most-starred commercial AI projects",
        ),
    };

    let mut fields = Vec::new();
    if !popular.is_empty() {
        fields.push(EmbedField::new(popular_field, &format_list(popular)));
    }
    if !trending.is_empty() {
        fields.push(EmbedField::new(
            trending_field_name(mode, timeframe),
            &format_list(trending),
        ));
    }
    if mode == ClassificationMode::Commercial {
        fields.push(EmbedField::new(
            "💡 Why these projects",
            "These projects share:\n\
             • 🛠️ Ready-to-use tooling\n\
             • 💰 Clear business use cases\n\
             • 🔧 Mature deployment and integration\n\
             • 📈 Active community and maintainers",
        ));
    }

    WebhookPayload {
        embeds: vec![Embed {
            title: title.to_string(),
            description: format!("{} {}", now.format("%Y-%m-%d"), headline(mode, timeframe)),
            color,
            fields,
            timestamp: now.to_rfc3339(),
        }],
    }
}
