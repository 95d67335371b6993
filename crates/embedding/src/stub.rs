use fxhash::hash64;

use crate::{Embedding, EmbeddingExtractor, ExtractError};

/// Deterministic extractor for tests and model-less development environments.
///
/// Generates sinusoid components derived from a hash of the image bytes, so
/// the same payload always yields the same descriptor with minimal CPU cost.
/// Empty payloads yield zero faces, which models the "no face detected" case
/// without needing a real detector.
#[derive(Debug, Clone)]
pub struct StubExtractor {
    dimension: usize,
}

impl StubExtractor {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for StubExtractor {
    fn default() -> Self {
        Self::new(crate::EMBEDDING_DIM)
    }
}

impl EmbeddingExtractor for StubExtractor {
    fn extract(&self, image: &[u8]) -> Result<Vec<Embedding>, ExtractError> {
        if image.is_empty() {
            return Ok(Vec::new());
        }

        let h = hash64(image);
        let mut v = vec![0f64; self.dimension];
        for (idx, value) in v.iter_mut().enumerate() {
            *value = (((h >> (idx % 32)) as f64) * 0.0001).sin();
        }

        Ok(vec![Embedding::new(v)])
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
