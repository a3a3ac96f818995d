//! Retrieved passage and stored chunk metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ingestion::MAX_PAGE_NUMBER;

/// Source name used when a passage carries none
pub const UNKNOWN_SOURCE: &str = "Unknown";

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// Accepts page numbers given either as integers or numeric strings; values
/// outside 1..=`MAX_PAGE_NUMBER` become `None`
fn deserialize_page<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPage {
        Number(u32),
        Float(f64),
        Text(String),
    }

    let page = match Option::<RawPage>::deserialize(deserializer)? {
        Some(RawPage::Number(n)) => Some(n),
        Some(RawPage::Float(f)) if f.fract() == 0.0 && f >= 1.0 && f <= f64::from(u32::MAX) => {
            Some(f as u32)
        }
        Some(RawPage::Float(_)) => None,
        Some(RawPage::Text(s)) => s.trim().parse().ok(),
        None => None,
    };

    Ok(page.filter(|n| (1..=MAX_PAGE_NUMBER).contains(n)))
}

/// Metadata stored with every indexed chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default = "unknown_source")]
    pub source: String,
    #[serde(default, deserialize_with = "deserialize_page", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_page", skip_serializing_if = "Option::is_none")]
    pub physical_page: Option<u32>,
    #[serde(default, alias = "chunk_index")]
    pub sequence_index: usize,
    #[serde(default, alias = "upload_type", skip_serializing_if = "Option::is_none")]
    pub upload_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<DateTime<Utc>>,
}

impl ChunkMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_physical_page(mut self, physical_page: u32) -> Self {
        self.physical_page = Some(physical_page);
        self
    }
}

impl Default for ChunkMetadata {
    fn default() -> Self {
        Self {
            source: unknown_source(),
            page: None,
            physical_page: None,
            sequence_index: 0,
            upload_tag: None,
            indexed_at: None,
        }
    }
}

/// Convert a cosine-style distance into a similarity in [0, 1]
pub fn similarity_from_distance(distance: f64) -> f64 {
    (1.0 - distance).clamp(0.0, 1.0)
}

/// A chunk returned for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "content")]
    pub text: String,
    #[serde(default)]
    pub metadata: ChunkMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl RetrievedPassage {
    pub fn new(id: impl Into<String>, text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
            similarity: None,
            distance: None,
        }
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Similarity if present, otherwise derived from distance
    pub fn relevance_score(&self) -> Option<f64> {
        match (self.similarity, self.distance) {
            (Some(similarity), _) if similarity.is_finite() => Some(similarity.clamp(0.0, 1.0)),
            (_, Some(distance)) if distance.is_finite() => Some(similarity_from_distance(distance)),
            _ => None,
        }
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    pub fn page(&self) -> Option<u32> {
        self.metadata.page
    }
}
