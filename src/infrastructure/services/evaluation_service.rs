//! Evaluation service - grounding scores for given or freshly generated answers

use std::sync::Arc;

use tracing::info;

use super::RagService;
use crate::domain::{DomainError, EvaluationRequest, EvaluationResponse, GroundingEvaluator};

/// Scores answers for factual grounding
#[derive(Debug)]
pub struct EvaluationService {
    evaluator: GroundingEvaluator,
    rag: Arc<RagService>,
}

impl EvaluationService {
    pub fn new(evaluator: GroundingEvaluator, rag: Arc<RagService>) -> Self {
        Self { evaluator, rag }
    }

    /// Evaluate a caller-supplied answer and context
    pub fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResponse {
        let response = self.evaluator.evaluate_request(request);
        log_result(&response);
        response
    }

    /// Run the chat pipeline for `query` and evaluate its answer.
    ///
    /// Fails when retrieval returns nothing, since there is no context to
    /// judge the answer against.
    pub async fn evaluate_chat(&self, query: &str) -> Result<EvaluationResponse, DomainError> {
        let result = self.rag.answer(query, None).await?;

        if result.passages.is_empty() {
            return Err(DomainError::validation(
                "No context chunks retrieved. Cannot evaluate response.",
            ));
        }

        let response = self.evaluator.evaluate(
            query,
            &result.answer,
            &result.passages,
            Some(&result.sources),
        );
        log_result(&response);
        Ok(response)
    }
}

fn log_result(response: &EvaluationResponse) {
    info!(
        overall_score = response.metrics.overall_score,
        citation_accuracy = response.metrics.citation_accuracy.citation_accuracy,
        faithfulness = response.metrics.answer_faithfulness.faithfulness_score,
        recommendations = response.recommendations.len(),
        "Evaluated answer"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbedder;
    use crate::domain::llm::MockLanguageModel;
    use crate::domain::retrieval::{ChunkMetadata, MockVectorIndex, VectorMatch};
    use crate::domain::{CitationAttributor, RetrievedPassage, Retriever};
    use crate::infrastructure::conversation::InMemoryConversationStore;
    use crate::infrastructure::services::ConversationService;

    const TREATY: &str = "The Treaty of Paris was signed in 1815 by the allied powers.";

    fn service(matches: Vec<VectorMatch>, reply: &str) -> EvaluationService {
        let retriever = Retriever::new(
            Arc::new(MockEmbedder::new(vec![1.0])),
            Arc::new(MockVectorIndex::new().with_matches(matches)),
        );
        let conversations = Arc::new(ConversationService::new(
            Arc::new(InMemoryConversationStore::new()),
            10,
        ));
        let rag = RagService::new(
            retriever,
            Arc::new(MockLanguageModel::new(reply)),
            conversations,
            CitationAttributor::new("/documents/files"),
        );

        EvaluationService::new(GroundingEvaluator::default(), Arc::new(rag))
    }

    #[tokio::test]
    async fn test_evaluate_chat_uses_attributed_sources() {
        let matches = vec![VectorMatch {
            id: "treaty.pdf:0".into(),
            text: TREATY.into(),
            metadata: ChunkMetadata::new("treaty.pdf").with_page(4),
            similarity: Some(0.9),
            distance: None,
        }];
        let service = service(
            matches,
            "The Treaty of Paris was signed in 1815 [Source: treaty.pdf, Page: 4].",
        );

        let response = service.evaluate_chat("When was the treaty signed?").await.unwrap();

        let citation = &response.metrics.citation_accuracy;
        assert_eq!(citation.total_citations, 1);
        assert_eq!(citation.valid_citations, 1);
        assert!(citation.missing_sources.is_empty());
        assert_eq!(response.metrics.answer_faithfulness.faithfulness_score, 1.0);
    }

    #[tokio::test]
    async fn test_evaluate_chat_without_context_is_rejected() {
        let service = service(vec![], "No idea.");

        let err = service.evaluate_chat("Anything?").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_evaluate_request_with_inline_markers() {
        let service = service(vec![], "unused");
        let request = EvaluationRequest {
            query: "When was the treaty signed?".into(),
            answer: "It was signed in 1815 [Source: treaty.pdf, Page: 4].".into(),
            context_chunks: vec![RetrievedPassage::new(
                "1",
                TREATY,
                ChunkMetadata::new("treaty.pdf").with_page(4),
            )
            .with_similarity(0.8)],
            sources: vec![],
        };

        let response = service.evaluate(&request);
        assert_eq!(response.metrics.citation_accuracy.valid_citations, 1);
        assert_eq!(response.query, request.query);
    }
}
