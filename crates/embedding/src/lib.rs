//! # Face Embedding (`embedding`)
//!
//! Core value type for Facegate: a fixed-length numeric vector summarizing a
//! detected face, plus the one numeric primitive the matching layer depends
//! on — Euclidean (L2) distance between two embeddings.
//!
//! Embeddings are immutable once produced and are only ever compared through
//! [`euclidean_distance`]; no other structure is assumed. The vector is stored
//! as `f64` to match the descriptor format of the upstream face model, and the
//! serde representation is transparent so a round trip through storage
//! reproduces the exact floating-point components.
//!
//! Extraction itself (image bytes → zero or more embeddings) is an external
//! capability consumed through the [`EmbeddingExtractor`] trait. The
//! [`StubExtractor`] provides a deterministic implementation for tests and
//! development environments without a face model.
//!
//! ## Example
//!
//! ```
//! use embedding::{euclidean_distance, Embedding, EMBEDDING_DIM};
//!
//! let a = Embedding::new(vec![0.0; EMBEDDING_DIM]);
//! let b = Embedding::new(vec![0.0; EMBEDDING_DIM]);
//! let d = euclidean_distance(&a, &b).unwrap();
//! assert!(d < 1e-9);
//! ```

mod extractor;
mod stub;

pub use crate::extractor::{EmbeddingExtractor, ExtractError};
pub use crate::stub::StubExtractor;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dimensionality of a face descriptor as produced by the upstream model.
///
/// This is the default wherever a dimension is needed; callers wiring a
/// different model configure the dimension explicitly.
pub const EMBEDDING_DIM: usize = 128;

/// An ordered, fixed-length face descriptor.
///
/// Immutable after construction. Two embeddings are comparable only when they
/// have equal length; [`euclidean_distance`] enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding {
    vector: Vec<f64>,
}

impl Embedding {
    /// Wrap a raw descriptor vector.
    pub fn new(vector: Vec<f64>) -> Self {
        Self { vector }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    /// True when the descriptor carries no components.
    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    /// Borrow the raw components.
    pub fn as_slice(&self) -> &[f64] {
        &self.vector
    }

    /// Consume the embedding, yielding the raw vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.vector
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(vector: Vec<f64>) -> Self {
        Embedding::new(vector)
    }
}

impl AsRef<[f64]> for Embedding {
    fn as_ref(&self) -> &[f64] {
        &self.vector
    }
}

/// Errors produced by embedding comparisons.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    /// The two vectors have different lengths and cannot be compared.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Euclidean (L2) distance between two equal-length embeddings.
///
/// Deterministic and symmetric; `euclidean_distance(a, a)` is zero within
/// floating-point epsilon. Pure function, no state.
pub fn euclidean_distance(a: &Embedding, b: &Embedding) -> Result<f64, EmbeddingError> {
    euclidean_distance_slice(a.as_slice(), b.as_slice())
}

/// Slice-level variant of [`euclidean_distance`] for callers that hold raw
/// descriptor components (e.g. a scan loop over stored records).
pub fn euclidean_distance_slice(a: &[f64], b: &[f64]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let sum_sq = a.iter().zip(b).fold(0.0f64, |acc, (x, y)| {
        let d = x - y;
        acc + d * d
    });

    Ok(sum_sq.sqrt())
}
