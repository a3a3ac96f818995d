//! Answer faithfulness scoring: claim extraction and support checks

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::citation::strip_inline_citations;
use crate::domain::retrieval::RetrievedPassage;

use super::config::FaithfulnessConfig;
use super::metrics::AnswerFaithfulness;

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(according to|based on|the document|it|this)\b").unwrap()
});

static CAPITALIZED_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)+\b").unwrap());

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+(?:[.,]\d+)*\b").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "was", "were", "with", "that", "this", "from", "has", "have",
        "had", "not", "but", "its", "his", "her", "their", "they", "them", "which", "who", "whom",
        "into", "onto", "than", "then", "there", "these", "those", "been", "being", "also", "such",
        "can", "could", "would", "should", "will", "shall", "may", "might", "all", "any", "some",
        "our", "out", "about", "after", "before", "over", "under", "between", "upon", "what",
        "when", "where", "why", "how", "you", "your", "did", "does", "very", "more", "most",
    ]
    .into_iter()
    .collect()
});

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split on runs of terminal punctuation, keeping each run with its sentence.
/// A period between two digits is part of a number, not a sentence end.
fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if !is_terminal(c) {
            current.push(c);
            i += 1;
            continue;
        }

        let decimal_point = c == '.'
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if decimal_point {
            current.push(c);
            i += 1;
            continue;
        }

        while i < chars.len() && is_terminal(chars[i]) {
            current.push(chars[i]);
            i += 1;
        }
        sentences.push(std::mem::take(&mut current));
    }

    if !current.trim().is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Lowercase alphanumeric words, in order
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Words joined by single spaces and padded so matches land on word edges
fn normalized(text: &str) -> String {
    format!(" {} ", words(text).join(" "))
}

/// A passage prepared once for repeated support checks
struct PassageProfile {
    normalized: String,
    tokens: HashSet<String>,
}

/// Extracts claims from answers and checks them against passages
#[derive(Debug, Clone, Default)]
pub struct FaithfulnessScorer {
    config: FaithfulnessConfig,
}

impl FaithfulnessScorer {
    pub fn new(config: FaithfulnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FaithfulnessConfig {
        &self.config
    }

    fn long_enough(&self, sentence: &str) -> bool {
        sentence.chars().count() > self.config.min_claim_chars
    }

    /// Factual assertions in the answer, with citation markers removed
    pub fn extract_claims(&self, answer: &str) -> Vec<String> {
        let cleaned = strip_inline_citations(answer);

        split_sentences(&cleaned)
            .iter()
            .filter_map(|sentence| {
                let sentence = sentence.trim();
                if sentence.ends_with('?') {
                    return None;
                }

                let sentence = sentence.trim_end_matches(is_terminal).trim();
                if !self.long_enough(sentence) {
                    return None;
                }

                let claim = LEADING_MARKER
                    .replace(sentence, "")
                    .trim_start()
                    .trim_start_matches([',', ':'])
                    .trim()
                    .to_string();
                self.long_enough(&claim).then_some(claim)
            })
            .collect()
    }

    /// Distinct significant words of a text
    pub fn tokens(&self, text: &str) -> HashSet<String> {
        words(text)
            .into_iter()
            .filter(|w| w.chars().count() >= self.config.min_token_chars)
            .filter(|w| !STOP_WORDS.contains(w.as_str()))
            .collect()
    }

    fn profile(&self, passage: &RetrievedPassage) -> PassageProfile {
        PassageProfile {
            normalized: normalized(&passage.text),
            tokens: self.tokens(&passage.text),
        }
    }

    fn shares_phrase(&self, claim_words: &[String], passage: &PassageProfile) -> bool {
        claim_words
            .windows(self.config.phrase_words.max(1))
            .any(|phrase| passage.normalized.contains(&format!(" {} ", phrase.join(" "))))
    }

    fn overlap_ratio(claim_tokens: &HashSet<String>, passage: &PassageProfile) -> f64 {
        if claim_tokens.is_empty() {
            return 0.0;
        }

        let shared = claim_tokens.intersection(&passage.tokens).count();
        shared as f64 / claim_tokens.len() as f64
    }

    fn shares_anchor(anchors: &[String], passage: &PassageProfile) -> bool {
        anchors.iter().any(|anchor| passage.normalized.contains(anchor))
    }

    /// Named-entity-like terms and numbers, normalized for matching
    fn anchors(claim: &str) -> Vec<String> {
        CAPITALIZED_TERM
            .find_iter(claim)
            .chain(NUMBER.find_iter(claim))
            .map(|m| normalized(m.as_str()))
            .filter(|anchor| !anchor.trim().is_empty())
            .collect()
    }

    fn supported_by_any(&self, claim: &str, passages: &[PassageProfile]) -> bool {
        let claim_words = words(claim);
        let claim_tokens = self.tokens(claim);
        let anchors = Self::anchors(claim);

        passages.iter().any(|passage| {
            self.shares_phrase(&claim_words, passage)
                || Self::overlap_ratio(&claim_tokens, passage) >= self.config.overlap_threshold
                || Self::shares_anchor(&anchors, passage)
        })
    }

    /// Whether any single passage supports the claim
    pub fn is_supported(&self, claim: &str, passages: &[RetrievedPassage]) -> bool {
        let profiles: Vec<PassageProfile> = passages.iter().map(|p| self.profile(p)).collect();
        self.supported_by_any(claim, &profiles)
    }

    /// Score the answer's claims against the passages
    pub fn score(&self, answer: &str, passages: &[RetrievedPassage]) -> AnswerFaithfulness {
        let claims = self.extract_claims(answer);
        if claims.is_empty() {
            return AnswerFaithfulness {
                faithfulness_score: 0.0,
                supported_claims: 0,
                total_claims: 0,
                unsupported_claims: Vec::new(),
            };
        }

        let profiles: Vec<PassageProfile> = passages.iter().map(|p| self.profile(p)).collect();
        let (supported, unsupported): (Vec<String>, Vec<String>) = claims
            .into_iter()
            .partition(|claim| self.supported_by_any(claim, &profiles));

        let total_claims = supported.len() + unsupported.len();

        AnswerFaithfulness {
            faithfulness_score: supported.len() as f64 / total_claims as f64,
            supported_claims: supported.len(),
            total_claims,
            unsupported_claims: unsupported
                .into_iter()
                .take(self.config.max_reported_unsupported)
                .collect(),
        }
    }
}
