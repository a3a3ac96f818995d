//! Similarity retrieval over the vector index

use std::sync::Arc;

use tracing::debug;

use super::passage::{similarity_from_distance, RetrievedPassage};
use super::vector_index::{VectorIndex, VectorMatch};
use crate::domain::embedding::Embedder;
use crate::domain::ingestion::validate_top_k;
use crate::domain::DomainError;

/// Embeds queries and normalizes index matches into passages
#[derive(Debug, Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Up to `top_k` passages in the index's ranking order.
    ///
    /// An empty index yields an empty result, not an error.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, DomainError> {
        validate_top_k(top_k)?;

        let vector = self.embedder.embed(query).await?;
        let mut matches = self.index.query(&vector, top_k).await?;
        matches.truncate(top_k);

        debug!(
            index = self.index.index_type(),
            top_k,
            returned = matches.len(),
            "Retrieved passages"
        );

        Ok(matches.into_iter().map(normalize_match).collect())
    }
}

fn normalize_match(m: VectorMatch) -> RetrievedPassage {
    let similarity = match (m.similarity, m.distance) {
        (Some(similarity), _) => Some(similarity.clamp(0.0, 1.0)),
        (None, Some(distance)) => Some(similarity_from_distance(distance)),
        (None, None) => None,
    };

    RetrievedPassage {
        id: m.id,
        text: m.text,
        metadata: m.metadata,
        similarity,
        distance: m.distance,
    }
}
