//! Context relevance scoring

use crate::domain::retrieval::RetrievedPassage;

use super::metrics::ContextRelevance;

/// Summarize the similarity of the retrieved passages.
///
/// Passages without a similarity or distance are skipped; if none carry a
/// score the retrieval is reported as unscored rather than guessed.
pub fn score_relevance(passages: &[RetrievedPassage], threshold: f64) -> ContextRelevance {
    let scores: Vec<f64> = passages
        .iter()
        .filter_map(RetrievedPassage::relevance_score)
        .collect();

    if scores.is_empty() {
        return ContextRelevance::unscored(passages.len());
    }

    let average_similarity = scores.iter().sum::<f64>() / scores.len() as f64;
    let min_similarity = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max_similarity = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let relevant_chunks = scores.iter().filter(|s| **s >= threshold).count();

    ContextRelevance {
        average_similarity,
        min_similarity,
        max_similarity,
        relevant_chunks,
        total_chunks: passages.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::ChunkMetadata;

    fn scored(similarity: f64) -> RetrievedPassage {
        RetrievedPassage::new("id", "text", ChunkMetadata::new("a.pdf")).with_similarity(similarity)
    }

    #[test]
    fn test_relevance_statistics() {
        let passages = vec![scored(0.9), scored(0.4), scored(0.7)];
        let relevance = score_relevance(&passages, 0.5);

        assert!((relevance.average_similarity - 0.667).abs() < 5e-4);
        assert_eq!(relevance.min_similarity, 0.4);
        assert_eq!(relevance.max_similarity, 0.9);
        assert_eq!(relevance.relevant_chunks, 2);
        assert_eq!(relevance.total_chunks, 3);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let relevance = score_relevance(&[scored(0.5)], 0.5);
        assert_eq!(relevance.relevant_chunks, 1);
    }

    #[test]
    fn test_distance_fallback() {
        let passage =
            RetrievedPassage::new("id", "text", ChunkMetadata::new("a.pdf")).with_distance(0.25);
        let relevance = score_relevance(&[passage], 0.5);

        assert_eq!(relevance.average_similarity, 0.75);
        assert_eq!(relevance.relevant_chunks, 1);
    }

    #[test]
    fn test_unscored_passages() {
        let passages = vec![
            RetrievedPassage::new("a", "text", ChunkMetadata::new("a.pdf")),
            RetrievedPassage::new("b", "text", ChunkMetadata::new("b.pdf")),
        ];
        let relevance = score_relevance(&passages, 0.5);

        assert_eq!(relevance, ContextRelevance::unscored(2));
    }

    #[test]
    fn test_no_passages() {
        assert_eq!(score_relevance(&[], 0.5), ContextRelevance::unscored(0));
    }
}
