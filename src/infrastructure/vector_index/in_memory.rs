//! In-memory vector index for development and single-process deployments

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::embedding::cosine_distance;
use crate::domain::retrieval::{IndexEntry, VectorIndex, VectorMatch, VectorRecord};
use crate::domain::DomainError;

/// Exhaustive cosine search over records held in memory.
///
/// Matches report a cosine distance, the way hosted vector stores do.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVectorIndex {
    records: Arc<RwLock<Vec<VectorRecord>>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError> {
        let mut stored = self.records.write().await;
        let count = records.len();

        // The whole batch is checked before anything is written
        let expected = stored
            .first()
            .or_else(|| records.first())
            .map(|r| r.vector.len());
        if let Some(dimensions) = expected {
            if let Some(record) = records.iter().find(|r| r.vector.len() != dimensions) {
                return Err(DomainError::validation(format!(
                    "Vector for '{}' has {} dimensions, index holds {}",
                    record.id,
                    record.vector.len(),
                    dimensions
                )));
            }
        }

        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }

        Ok(count)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError> {
        let records = self.records.read().await;

        let mut scored: Vec<(f32, &VectorRecord)> = records
            .iter()
            .map(|record| (cosine_distance(vector, &record.vector), record))
            .collect();

        // Stable sort keeps insertion order between equal distances
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(distance, record)| VectorMatch {
                id: record.id.clone(),
                text: record.text.clone(),
                metadata: record.metadata.clone(),
                similarity: None,
                distance: Some(f64::from(distance)),
            })
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<IndexEntry>, DomainError> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .map(|r| IndexEntry {
                id: r.id.clone(),
                metadata: r.metadata.clone(),
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();

        records.retain(|r| !ids.contains(&r.id));

        Ok(before - records.len())
    }

    fn index_type(&self) -> &'static str {
        "in_memory"
    }
}
