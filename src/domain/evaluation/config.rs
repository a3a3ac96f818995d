//! Grounding evaluation configuration types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Weights combining the three scorers into the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_citation_weight")]
    pub citation: f64,
    #[serde(default = "default_relevance_weight")]
    pub relevance: f64,
    /// Dominant weight; faithfulness most directly measures hallucination
    #[serde(default = "default_faithfulness_weight")]
    pub faithfulness: f64,
}

fn default_citation_weight() -> f64 {
    0.3
}

fn default_relevance_weight() -> f64 {
    0.2
}

fn default_faithfulness_weight() -> f64 {
    0.5
}

impl ScoreWeights {
    pub fn new(citation: f64, relevance: f64, faithfulness: f64) -> Self {
        Self {
            citation,
            relevance,
            faithfulness,
        }
    }

    /// Weights must be non-negative and sum to 1
    pub fn validate(&self) -> Result<(), DomainError> {
        let weights = [self.citation, self.relevance, self.faithfulness];

        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DomainError::validation(
                "Evaluation weights must be non-negative numbers",
            ));
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(DomainError::validation(format!(
                "Evaluation weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            citation: default_citation_weight(),
            relevance: default_relevance_weight(),
            faithfulness: default_faithfulness_weight(),
        }
    }
}

/// Settings for claim extraction and support checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaithfulnessConfig {
    /// Sentences must be strictly longer than this to count as claims
    #[serde(default = "default_min_claim_chars")]
    pub min_claim_chars: usize,
    /// Fraction of a claim's distinct tokens a passage must contain
    #[serde(default = "default_overlap_threshold")]
    pub overlap_threshold: f64,
    /// Length in words of phrases matched verbatim
    #[serde(default = "default_phrase_words")]
    pub phrase_words: usize,
    /// Shortest word counted as a token
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
    /// Number of unsupported claims kept for reporting
    #[serde(default = "default_max_reported_unsupported")]
    pub max_reported_unsupported: usize,
}

fn default_min_claim_chars() -> usize {
    20
}

fn default_overlap_threshold() -> f64 {
    0.4
}

fn default_phrase_words() -> usize {
    3
}

fn default_min_token_chars() -> usize {
    3
}

fn default_max_reported_unsupported() -> usize {
    5
}

impl Default for FaithfulnessConfig {
    fn default() -> Self {
        Self {
            min_claim_chars: default_min_claim_chars(),
            overlap_threshold: default_overlap_threshold(),
            phrase_words: default_phrase_words(),
            min_token_chars: default_min_token_chars(),
            max_reported_unsupported: default_max_reported_unsupported(),
        }
    }
}

/// Thresholds gating each recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    #[serde(default = "default_min_citation_accuracy")]
    pub min_citation_accuracy: f64,
    /// Below this average similarity retrieval is flagged as poor
    #[serde(default = "default_low_similarity")]
    pub low_similarity: f64,
    /// Below this (and above `low_similarity`) retrieval is flagged as moderate
    #[serde(default = "default_moderate_similarity")]
    pub moderate_similarity: f64,
    #[serde(default = "default_min_faithfulness")]
    pub min_faithfulness: f64,
    #[serde(default = "default_critical_overall")]
    pub critical_overall: f64,
    #[serde(default = "default_acceptable_overall")]
    pub acceptable_overall: f64,
    #[serde(default = "default_excellent_overall")]
    pub excellent_overall: f64,
}

fn default_min_citation_accuracy() -> f64 {
    0.8
}

fn default_low_similarity() -> f64 {
    0.5
}

fn default_moderate_similarity() -> f64 {
    0.6
}

fn default_min_faithfulness() -> f64 {
    0.7
}

fn default_critical_overall() -> f64 {
    0.6
}

fn default_acceptable_overall() -> f64 {
    0.7
}

fn default_excellent_overall() -> f64 {
    0.9
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            min_citation_accuracy: default_min_citation_accuracy(),
            low_similarity: default_low_similarity(),
            moderate_similarity: default_moderate_similarity(),
            min_faithfulness: default_min_faithfulness(),
            critical_overall: default_critical_overall(),
            acceptable_overall: default_acceptable_overall(),
            excellent_overall: default_excellent_overall(),
        }
    }
}

/// Configuration for grounding evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Passages scoring at or above this count as relevant
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f64,
    #[serde(default)]
    pub faithfulness: FaithfulnessConfig,
    #[serde(default)]
    pub recommendations: RecommendationThresholds,
}

fn default_relevance_threshold() -> f64 {
    0.5
}

impl EvaluationConfig {
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = threshold;
        self
    }

    pub fn with_faithfulness(mut self, faithfulness: FaithfulnessConfig) -> Self {
        self.faithfulness = faithfulness;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.weights.validate()?;

        if !(0.0..=1.0).contains(&self.relevance_threshold) {
            return Err(DomainError::validation(
                "relevance_threshold must be between 0.0 and 1.0",
            ));
        }

        if !(0.0..=1.0).contains(&self.faithfulness.overlap_threshold) {
            return Err(DomainError::validation(
                "overlap_threshold must be between 0.0 and 1.0",
            ));
        }

        if self.faithfulness.phrase_words == 0 {
            return Err(DomainError::validation(
                "phrase_words must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            relevance_threshold: default_relevance_threshold(),
            faithfulness: FaithfulnessConfig::default(),
            recommendations: RecommendationThresholds::default(),
        }
    }
}
