//! Retrieval domain: passages, the vector index contract and the retriever

mod passage;
mod retriever;
mod vector_index;

pub use passage::{similarity_from_distance, ChunkMetadata, RetrievedPassage, UNKNOWN_SOURCE};
pub use retriever::Retriever;
pub use vector_index::{
    aggregate_by_source, ids_for_source, IndexEntry, IndexedDocument, VectorIndex, VectorMatch,
    VectorRecord,
};

#[cfg(test)]
pub use vector_index::mock::MockVectorIndex;
