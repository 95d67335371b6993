use embedding::{Embedding, EMBEDDING_DIM};
use enrollment::EnrollmentError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for a single verification request.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs or passed across process boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyConfig {
    /// Maximum acceptable distance for two embeddings to be considered the
    /// same identity. Candidacy is inclusive: `distance <= tolerance`.
    #[serde(default = "VerifyConfig::default_tolerance")]
    pub tolerance: f64,
    /// Expected descriptor dimensionality; fixed by the extractor.
    #[serde(default = "VerifyConfig::default_dimension")]
    pub dimension: usize,
}

impl VerifyConfig {
    pub(crate) fn default_tolerance() -> f64 {
        0.6
    }

    pub(crate) fn default_dimension() -> usize {
        EMBEDDING_DIM
    }

    /// Convenience constructor with an explicit tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Validate the configuration for a single request.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MatchError::InvalidConfig(
                "tolerance must be finite and >= 0.0".into(),
            ));
        }
        if self.dimension == 0 {
            return Err(MatchError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::default_tolerance(),
            dimension: Self::default_dimension(),
        }
    }
}

/// A single verification request against the enrollment store.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyRequest {
    /// The embedding extracted from the submitted image.
    pub probe: Embedding,
    /// Per-request configuration; use `VerifyConfig::default()` when higher
    /// layers supply nothing.
    pub config: VerifyConfig,
}

/// Why a stored record was excluded from the scan.
///
/// Corrupt records are contained locally: they are logged and skipped, and
/// one bad record never fails the whole verification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipReason {
    /// The stored descriptor's length differs from the expected
    /// dimensionality.
    DimensionMismatch { expected: usize, actual: usize },
}

/// Scan statistics attached to a [`ProbeResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VerifyExplanation {
    /// Records whose distance was computed.
    pub compared: usize,
    /// Records within tolerance.
    pub candidates: usize,
    /// Records excluded from the scan with a [`SkipReason`].
    pub skipped: usize,
}

/// The decision produced by one verification call. Transient; never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    /// Whether any enrolled identity was within tolerance.
    pub matched: bool,
    /// The winning identity reference, present iff `matched`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_ref: Option<String>,
    /// The winner's observed distance, present iff `matched`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Scan statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<VerifyExplanation>,
}

impl ProbeResult {
    /// The negative verification outcome. Not an error.
    pub fn no_match(explanation: Option<VerifyExplanation>) -> Self {
        Self {
            matched: false,
            identity_ref: None,
            distance: None,
            explanation,
        }
    }

    /// The positive verification outcome.
    pub fn matched(
        identity_ref: String,
        distance: f64,
        explanation: Option<VerifyExplanation>,
    ) -> Self {
        Self {
            matched: true,
            identity_ref: Some(identity_ref),
            distance: Some(distance),
            explanation,
        }
    }
}

/// Errors produced by the verification layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid configuration (per-request or global).
    #[error("invalid verify config: {0}")]
    InvalidConfig(String),
    /// The probe's length differs from the configured dimensionality. Unlike
    /// a corrupt stored record, a malformed probe makes every comparison
    /// meaningless, so it is reported instead of scanned.
    #[error("probe dimension mismatch: expected {expected}, got {actual}")]
    ProbeDimension { expected: usize, actual: usize },
    /// Enrollment store read failed.
    #[error("enrollment store error: {0}")]
    Store(#[from] EnrollmentError),
}
