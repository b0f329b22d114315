//! One-line technical highlight per candidate

use crate::discovery::Candidate;

const DESCRIPTION_LIMIT: usize = 70;

/// Ordered highlight rules: first rule with any matching keyword wins
const HIGHLIGHT_RULES: &[(&[&str], &str)] = &[
    (&["tensorflow"], "End-to-end ML platform covering the full train-to-deploy workflow"),
    (
        &["pytorch"],
        "Dynamic-graph deep learning framework with flexible model building and debugging",
    ),
    (
        &["transformers", "huggingface", "🤗"],
        "Pretrained model hub with BERT, GPT and other modern NLP models",
    ),
    (
        &["llm", "inference", "vllm", "serving"],
        "High-throughput LLM inference engine tuned for memory and latency",
    ),
    (
        &["gpt", "chatgpt", "chat", "conversation"],
        "Conversational AI toolkit for high-quality human-machine interaction",
    ),
    (
        &["opencv", "yolo", "detection", "vision"],
        "Computer vision toolkit for image processing and object detection",
    ),
    (&["scikit", "sklearn"], "Classic ML library with classification, regression and clustering"),
    (
        &["pandas", "numpy", "jupyter", "data"],
        "Data analysis toolchain that simplifies processing and visualisation",
    ),
    (
        &["tutorial", "learning", "course", "beginner"],
        "AI learning guide from core concepts to hands-on projects",
    ),
    (
        &["automation", "tool", "assistant", "productivity"],
        "AI automation tool that streamlines developer workflows",
    ),
    (&["awesome"], "Curated collection of the field's best practices and tools"),
];

/// Pick a short highlight for `candidate`
///
/// Falls back to the (shortened) description, then to a language-based line.
pub fn summarize(candidate: &Candidate) -> String {
    let blob = candidate.text_blob();

    if let Some((_, highlight)) = HIGHLIGHT_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| blob.contains(k)))
    {
        return highlight.to_string();
    }

    let description = candidate.description_or_empty();
    if description.chars().count() > 10 {
        shorten(description, DESCRIPTION_LIMIT)
    } else {
        format!("{} AI tool focused on solving practical problems", candidate.language_or_unknown())
    }
}

/// First `limit` characters followed by `...` when longer
fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::RawRepository;

    fn candidate(name: &str, description: Option<&str>, language: Option<&str>) -> Candidate {
        Candidate::from(RawRepository {
            id: 1,
            name: Some(name.to_string()),
            full_name: None,
            description: description.map(str::to_string),
            topics: None,
            language: language.map(str::to_string),
            stargazers_count: None,
            forks_count: None,
            created_at: None,
            updated_at: None,
            html_url: None,
        })
    }

    #[test]
    fn test_first_rule_wins() {
        // Mentions both tensorflow and pytorch; tensorflow rule comes first
        let c = candidate("bridge", Some("Convert PyTorch models to TensorFlow"), None);
        assert!(summarize(&c).starts_with("End-to-end ML platform"));
    }

    #[test]
    fn test_description_fallback_is_shortened() {
        let long = "Q".repeat(90);
        let c = candidate("qqq", Some(&long), None);

        let summary = summarize(&c);
        assert_eq!(summary.chars().count(), DESCRIPTION_LIMIT + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_language_fallback() {
        let c = candidate("zzz", Some("short"), Some("Rust"));
        assert_eq!(summarize(&c), "Rust AI tool focused on solving practical problems");

        let unknown = candidate("zzz", None, None);
        assert!(summarize(&unknown).starts_with("Unknown AI tool"));
    }
}
