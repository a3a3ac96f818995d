//! Vector index trait and indexed-document aggregation

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::passage::ChunkMetadata;
use crate::domain::DomainError;

/// A vector with its text and metadata, ready to store
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// One ranked query result.
///
/// Indexes report either a similarity or a distance, or occasionally neither.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub similarity: Option<f64>,
    pub distance: Option<f64>,
}

/// Id and metadata of a stored vector
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub metadata: ChunkMetadata,
}

/// Chunks of one source document currently in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub source: String,
    pub chunks_count: usize,
    pub last_indexed_at: Option<DateTime<Utc>>,
}

/// Storage and similarity search over chunk vectors
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Insert or replace records by id; returns the number written
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError>;

    /// Up to `top_k` nearest records, best first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError>;

    /// Metadata of every stored record
    async fn list_all(&self) -> Result<Vec<IndexEntry>, DomainError>;

    /// Delete records by id; returns the number removed
    async fn delete(&self, ids: &[String]) -> Result<usize, DomainError>;

    /// Index implementation name
    fn index_type(&self) -> &'static str;
}

/// Group entries by source, sorted by source name
pub fn aggregate_by_source(entries: &[IndexEntry]) -> Vec<IndexedDocument> {
    let mut grouped: BTreeMap<&str, IndexedDocument> = BTreeMap::new();

    for entry in entries {
        let doc = grouped
            .entry(entry.metadata.source.as_str())
            .or_insert_with(|| IndexedDocument {
                source: entry.metadata.source.clone(),
                chunks_count: 0,
                last_indexed_at: None,
            });

        doc.chunks_count += 1;
        doc.last_indexed_at = doc.last_indexed_at.max(entry.metadata.indexed_at);
    }

    grouped.into_values().collect()
}

/// Ids of every entry belonging to `source`
pub fn ids_for_source(entries: &[IndexEntry], source: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.metadata.source == source)
        .map(|e| e.id.clone())
        .collect()
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Index returning canned matches and recording writes
    #[derive(Debug, Default)]
    pub struct MockVectorIndex {
        matches: Vec<VectorMatch>,
        upserted: Mutex<Vec<VectorRecord>>,
        error: Option<String>,
    }

    impl MockVectorIndex {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_matches(mut self, matches: Vec<VectorMatch>) -> Self {
            self.matches = matches;
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn upserted(&self) -> Vec<VectorRecord> {
            self.upserted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VectorIndex for MockVectorIndex {
        async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError> {
            let count = records.len();
            self.upserted.lock().unwrap().extend(records);
            Ok(count)
        }

        async fn query(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<VectorMatch>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::storage(error.clone()));
            }
            Ok(self.matches.clone())
        }

        async fn list_all(&self) -> Result<Vec<IndexEntry>, DomainError> {
            Ok(self
                .upserted
                .lock()
                .unwrap()
                .iter()
                .map(|r| IndexEntry {
                    id: r.id.clone(),
                    metadata: r.metadata.clone(),
                })
                .collect())
        }

        async fn delete(&self, ids: &[String]) -> Result<usize, DomainError> {
            let mut upserted = self.upserted.lock().unwrap();
            let before = upserted.len();
            upserted.retain(|r| !ids.contains(&r.id));
            Ok(before - upserted.len())
        }

        fn index_type(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: &str, source: &str, day: u32) -> IndexEntry {
        let mut metadata = ChunkMetadata::new(source);
        metadata.indexed_at = Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap());
        IndexEntry {
            id: id.to_string(),
            metadata,
        }
    }

    #[test]
    fn test_aggregate_by_source() {
        let entries = vec![
            entry("b:0", "b.pdf", 2),
            entry("a:0", "a.txt", 1),
            entry("b:1", "b.pdf", 5),
            entry("b:2", "b.pdf", 3),
        ];

        let docs = aggregate_by_source(&entries);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, "a.txt");
        assert_eq!(docs[0].chunks_count, 1);
        assert_eq!(docs[1].source, "b.pdf");
        assert_eq!(docs[1].chunks_count, 3);
        assert_eq!(
            docs[1].last_indexed_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_aggregate_without_timestamps() {
        let entries = vec![IndexEntry {
            id: "x".into(),
            metadata: ChunkMetadata::new("x.md"),
        }];

        let docs = aggregate_by_source(&entries);
        assert_eq!(docs[0].last_indexed_at, None);
    }

    #[test]
    fn test_ids_for_source() {
        let entries = vec![entry("a:0", "a", 1), entry("b:0", "b", 1), entry("a:1", "a", 1)];
        assert_eq!(ids_for_source(&entries, "a"), vec!["a:0", "a:1"]);
        assert!(ids_for_source(&entries, "zzz").is_empty());
    }
}
