//! Embedding model abstraction

mod embedder;
mod similarity;

pub use embedder::Embedder;
pub use similarity::{cosine_similarity, cosine_distance};

#[cfg(test)]
pub use embedder::mock::MockEmbedder;
