//! Text tokenizer (C2): lowercase, extract alphabetic runs above a length
//! threshold, drop a fixed stop-word set, return a deduplicated set.
//! Pure and deterministic — no locale awareness, no stemming.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WORD_RE_MIN3: Regex = Regex::new(r"\b[a-z]{3,}\b").unwrap();
    static ref WORD_RE_MIN4: Regex = Regex::new(r"\b[a-z]{4,}\b").unwrap();

    /// Stop words for relevance/semantic-similarity tokenization (3+ chars).
    static ref RELEVANCE_STOP_WORDS: HashSet<&'static str> = [
        "the", "and", "for", "are", "but", "not", "you", "all", "can",
        "had", "her", "was", "one", "our", "out", "has", "have", "been",
        "will", "with", "this", "that", "from", "they", "which", "their",
        "would", "there", "could", "other", "into", "more", "some", "such",
        "than", "them", "then", "these", "only", "over", "also", "after",
        "services", "service", "shall", "must", "may", "contractor",
    ].into_iter().collect();

    /// Stop words for win-probability capability-keyword extraction (4+ chars).
    static ref CAPABILITY_STOP_WORDS: HashSet<&'static str> = [
        "the", "and", "for", "are", "but", "not", "you", "all", "can",
        "had", "her", "was", "one", "our", "out", "has", "have", "been",
        "will", "with", "this", "that", "from", "they", "which", "their",
        "would", "there", "could", "other", "into", "more", "some", "such",
        "than", "them", "then", "these", "only", "over", "also", "after",
        "services", "service", "shall", "must", "provide", "including",
        "company", "organization", "team", "experience", "years",
    ].into_iter().collect();
}

/// Tokenize for semantic/relevance overlap: alphabetic runs of length >= 3,
/// minus the relevance stop-word set.
pub fn tokenize_relevance(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD_RE_MIN3
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|w| !RELEVANCE_STOP_WORDS.contains(w.as_str()))
        .collect()
}

/// Jaccard similarity between two token sets; 0 if both are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Extract capability keywords for win-probability matching: alphabetic
/// runs of length >= 4, minus the capability stop-word set, deduplicated
/// and capped at 50 entries (mirrors the source's `[:50]` truncation on an
/// unordered keyword set).
pub fn extract_capability_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut unique: HashSet<String> = WORD_RE_MIN4
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|w| !CAPABILITY_STOP_WORDS.contains(w.as_str()))
        .collect();

    let mut keywords: Vec<String> = unique.drain().collect();
    keywords.truncate(50);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_drops_stop_words_and_short_tokens() {
        let tokens = tokenize_relevance("The cloud migration services for a federal agency");
        assert!(tokens.contains("cloud"));
        assert!(tokens.contains("migration"));
        assert!(tokens.contains("federal"));
        assert!(tokens.contains("agency"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("for"));
        assert!(!tokens.contains("services"));
        assert!(!tokens.contains("a"));
    }

    #[test]
    fn tokenizer_is_stable_under_whitespace_variation() {
        let a = tokenize_relevance("cloud   migration\nservices");
        let b = tokenize_relevance("cloud migration services");
        assert_eq!(a, b);
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a: HashSet<String> = ["cloud".to_string()].into_iter().collect();
        let b: HashSet<String> = ["network".to_string()].into_iter().collect();
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn capability_keywords_use_four_letter_threshold() {
        let kws = extract_capability_keywords("we run a team to provide cloud migration");
        assert!(kws.iter().any(|k| k == "cloud"));
        assert!(kws.iter().any(|k| k == "migration"));
        assert!(!kws.iter().any(|k| k == "team"));
        assert!(!kws.iter().any(|k| k == "provide"));
    }
}
