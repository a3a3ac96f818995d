//! Grounding evaluation
//!
//! Scores a generated answer on three independent axes and combines them:
//! - citation accuracy against the retrieved sources
//! - relevance of the retrieved context
//! - faithfulness of the answer's claims to that context

mod citation_accuracy;
mod config;
mod evaluator;
mod faithfulness;
mod metrics;
mod recommendations;
mod relevance;

pub use citation_accuracy::{available_sources, is_valid_citation, score_citations, AvailableSources};
pub use config::{EvaluationConfig, FaithfulnessConfig, RecommendationThresholds, ScoreWeights};
pub use evaluator::GroundingEvaluator;
pub use faithfulness::FaithfulnessScorer;
pub use metrics::{
    AnswerFaithfulness, CitationAccuracy, ContextRelevance, EvaluationMetrics, EvaluationRequest,
    EvaluationResponse,
};
pub use recommendations::{recommend, NO_RECOMMENDATIONS};
pub use relevance::score_relevance;
