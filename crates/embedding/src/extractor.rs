use thiserror::Error;

use crate::Embedding;

/// Errors produced by an embedding extractor.
///
/// Zero detected faces is *not* an error at this boundary; it is represented
/// by an empty result vector and surfaced by the caller.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The payload could not be decoded as an image.
    #[error("invalid image payload: {0}")]
    InvalidImage(String),
    /// The underlying model or service failed.
    #[error("extractor backend error: {0}")]
    Backend(String),
}

/// External face-model boundary: image bytes in, face descriptors out.
///
/// Implementations wrap whatever detection/embedding model the deployment
/// uses. The result holds one embedding per detected face in detection order;
/// enrollment and verification use only the first.
pub trait EmbeddingExtractor: Send + Sync {
    /// Detect faces in `image` and return one embedding per face.
    fn extract(&self, image: &[u8]) -> Result<Vec<Embedding>, ExtractError>;

    /// Dimensionality of the embeddings this extractor produces.
    fn dimension(&self) -> usize {
        crate::EMBEDDING_DIM
    }
}
