//! Grounding evaluator combining the three scorers

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::retrieval::RetrievedPassage;
use crate::domain::DomainError;

use super::citation_accuracy::score_citations;
use super::config::EvaluationConfig;
use super::faithfulness::FaithfulnessScorer;
use super::metrics::{
    AnswerFaithfulness, CitationAccuracy, ContextRelevance, EvaluationMetrics,
    EvaluationRequest, EvaluationResponse,
};
use super::recommendations::recommend;
use super::relevance::score_relevance;

/// Round to 3 decimals
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Scores how well an answer is grounded in its retrieved passages
#[derive(Debug, Clone, Default)]
pub struct GroundingEvaluator {
    config: EvaluationConfig,
    faithfulness: FaithfulnessScorer,
}

impl GroundingEvaluator {
    pub fn new(config: EvaluationConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            faithfulness: FaithfulnessScorer::new(config.faithfulness),
            config,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Weighted overall score, rounded to 3 decimals and clamped to [0, 1]
    pub fn overall_score(
        &self,
        citation: &CitationAccuracy,
        relevance: &ContextRelevance,
        faithfulness: &AnswerFaithfulness,
    ) -> f64 {
        let weights = &self.config.weights;
        let overall = weights.citation * citation.citation_accuracy
            + weights.relevance * relevance.average_similarity
            + weights.faithfulness * faithfulness.faithfulness_score;

        round3(overall).clamp(0.0, 1.0)
    }

    /// Compute metrics with an explicit timestamp
    pub fn metrics_at(
        &self,
        answer: &str,
        passages: &[RetrievedPassage],
        sources: Option<&[String]>,
        timestamp: DateTime<Utc>,
    ) -> EvaluationMetrics {
        let citation_accuracy = score_citations(answer, passages, sources);
        let context_relevance = score_relevance(passages, self.config.relevance_threshold);
        let answer_faithfulness = self.faithfulness.score(answer, passages);
        let overall_score =
            self.overall_score(&citation_accuracy, &context_relevance, &answer_faithfulness);

        EvaluationMetrics {
            citation_accuracy,
            context_relevance,
            answer_faithfulness,
            overall_score,
            evaluation_timestamp: timestamp,
        }
    }

    /// Evaluate an answer against the passages it was generated from.
    ///
    /// A non-empty `sources` list is scored as the answer's citations;
    /// otherwise inline citation markers are parsed from the answer.
    pub fn evaluate(
        &self,
        query: &str,
        answer: &str,
        passages: &[RetrievedPassage],
        sources: Option<&[String]>,
    ) -> EvaluationResponse {
        let metrics = self.metrics_at(answer, passages, sources, Utc::now());
        let recommendations = recommend(&metrics, &self.config.recommendations);

        debug!(
            overall_score = metrics.overall_score,
            citation_accuracy = metrics.citation_accuracy.citation_accuracy,
            faithfulness = metrics.answer_faithfulness.faithfulness_score,
            passages = passages.len(),
            "Evaluated answer grounding"
        );

        EvaluationResponse {
            query: query.to_string(),
            answer: answer.to_string(),
            metrics,
            recommendations,
        }
    }

    /// Evaluate a deserialized request
    pub fn evaluate_request(&self, request: &EvaluationRequest) -> EvaluationResponse {
        self.evaluate(
            &request.query,
            &request.answer,
            &request.context_chunks,
            Some(&request.sources),
        )
    }
}
