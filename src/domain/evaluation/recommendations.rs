//! Rule table turning metrics into improvement guidance

use super::config::RecommendationThresholds;
use super::metrics::EvaluationMetrics;

/// Emitted when no rule fires
pub const NO_RECOMMENDATIONS: &str = "No specific recommendations. Factual grounding is good.";

/// Guidance for the given metrics, in a fixed rule order
pub fn recommend(metrics: &EvaluationMetrics, thresholds: &RecommendationThresholds) -> Vec<String> {
    let mut recommendations = Vec::new();

    let citation = &metrics.citation_accuracy;
    if citation.citation_accuracy < thresholds.min_citation_accuracy {
        recommendations.push(format!(
            "Improve citation accuracy: {} invalid citations found. \
             Ensure all citations match sources in the retrieved context.",
            citation.invalid_citations.len()
        ));
    }

    if !citation.missing_sources.is_empty() {
        recommendations.push(format!(
            "Cite all relevant sources: {} sources in context are not cited ({}).",
            citation.missing_sources.len(),
            citation.missing_sources.join(", ")
        ));
    }

    let similarity = metrics.context_relevance.average_similarity;
    if similarity < thresholds.low_similarity {
        recommendations.push(
            "Improve context retrieval: retrieved chunks have low relevance. \
             Consider adjusting retrieval parameters or reformulating the query."
                .to_string(),
        );
    } else if similarity < thresholds.moderate_similarity {
        recommendations.push(
            "Context relevance is moderate: consider retrieving more chunks \
             or refining the query for closer matches."
                .to_string(),
        );
    }

    let faithfulness = &metrics.answer_faithfulness;
    if faithfulness.faithfulness_score < thresholds.min_faithfulness {
        recommendations.push(format!(
            "Improve answer grounding: {} of {} claims cannot be verified. \
             Ensure all factual claims are supported by the retrieved context.",
            faithfulness.total_claims - faithfulness.supported_claims,
            faithfulness.total_claims
        ));
    }

    let overall = metrics.overall_score;
    if overall < thresholds.critical_overall {
        recommendations.push(
            "Factual grounding is critically low. Answers should be based strictly \
             on retrieved context and every claim should be cited."
                .to_string(),
        );
    } else if overall < thresholds.acceptable_overall {
        recommendations.push(
            "Overall factual grounding needs improvement. Focus on keeping answers \
             within the retrieved context and citing all claims."
                .to_string(),
        );
    } else if overall >= thresholds.excellent_overall {
        recommendations.push(
            "Excellent factual grounding! The answer is well-grounded in the provided context."
                .to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push(NO_RECOMMENDATIONS.to_string());
    }

    recommendations
}
