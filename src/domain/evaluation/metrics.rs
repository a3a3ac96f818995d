//! Evaluation result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::retrieval::RetrievedPassage;

/// How well the answer's citations match the retrieved sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationAccuracy {
    pub total_citations: usize,
    pub valid_citations: usize,
    pub citation_accuracy: f64,
    /// Sources in the context that were never cited
    #[serde(default)]
    pub missing_sources: Vec<String>,
    /// Citations that match no retrieved source or page
    #[serde(default)]
    pub invalid_citations: Vec<String>,
}

/// Similarity statistics over the retrieved passages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRelevance {
    pub average_similarity: f64,
    pub min_similarity: f64,
    pub max_similarity: f64,
    pub relevant_chunks: usize,
    pub total_chunks: usize,
}

impl ContextRelevance {
    /// Relevance for a retrieval that carried no usable scores
    pub fn unscored(total_chunks: usize) -> Self {
        Self {
            average_similarity: 0.0,
            min_similarity: 0.0,
            max_similarity: 0.0,
            relevant_chunks: 0,
            total_chunks,
        }
    }
}

/// How many of the answer's claims the context supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFaithfulness {
    pub faithfulness_score: f64,
    pub supported_claims: usize,
    pub total_claims: usize,
    #[serde(default)]
    pub unsupported_claims: Vec<String>,
}

/// Combined grounding metrics for one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub citation_accuracy: CitationAccuracy,
    pub context_relevance: ContextRelevance,
    pub answer_faithfulness: AnswerFaithfulness,
    /// Weighted score in [0, 1], rounded to 3 decimals
    pub overall_score: f64,
    pub evaluation_timestamp: DateTime<Utc>,
}

/// Input for an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub query: String,
    pub answer: String,
    pub context_chunks: Vec<RetrievedPassage>,
    /// Cited sources such as `"a.pdf (Page 5)"`; empty means parse the answer
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Output of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub query: String,
    pub answer: String,
    pub metrics: EvaluationMetrics,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
