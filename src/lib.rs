//! Workspace umbrella crate for Facegate.
//!
//! This crate stitches the extractor boundary, the enrollment store, and the
//! matching engine together so callers can run registration and verification
//! over raw image bytes with a single API entry point. The HTTP glue in
//! `facegate-server` is a thin layer over these two functions.

pub use embedding::{
    euclidean_distance, Embedding, EmbeddingError, EmbeddingExtractor, ExtractError,
    StubExtractor, EMBEDDING_DIM,
};
pub use enrollment::{
    BackendConfig, EnrollmentError, EnrollmentRecord, EnrollmentStore, StoreConfig,
    ENROLLMENT_SCHEMA_VERSION,
};
pub use matcher::{
    MatchError, Matcher, ProbeResult, VerifyConfig, VerifyExplanation, VerifyRequest,
};

use chrono::Utc;
use std::error::Error;
use std::fmt;

/// Errors that can occur while running an image through the enrollment or
/// verification pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// The extractor found zero faces in the image; surfaced to the caller,
    /// no store interaction happens.
    NoFaceDetected,
    Extract(ExtractError),
    Enrollment(EnrollmentError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NoFaceDetected => {
                write!(f, "no face detected in the submitted image")
            }
            PipelineError::Extract(err) => write!(f, "extraction failure: {err}"),
            PipelineError::Enrollment(err) => write!(f, "enrollment failure: {err}"),
            PipelineError::Match(err) => write!(f, "verification failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Extract(err) => Some(err),
            PipelineError::Enrollment(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::NoFaceDetected => None,
        }
    }
}

impl From<ExtractError> for PipelineError {
    fn from(value: ExtractError) -> Self {
        PipelineError::Extract(value)
    }
}

impl From<EnrollmentError> for PipelineError {
    fn from(value: EnrollmentError) -> Self {
        PipelineError::Enrollment(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Extract the first detected face from `image` and enroll it under
/// `identity_ref`.
///
/// Multiple detected faces are not an error; only the first is enrolled.
/// Zero detected faces surface as [`PipelineError::NoFaceDetected`] and leave
/// the store untouched.
pub fn enroll_image(
    image: &[u8],
    identity_ref: &str,
    extractor: &dyn EmbeddingExtractor,
    store: &EnrollmentStore,
    metadata: serde_json::Value,
) -> Result<EnrollmentRecord, PipelineError> {
    let faces = extractor.extract(image)?;
    let first = faces.into_iter().next().ok_or(PipelineError::NoFaceDetected)?;

    let record = EnrollmentRecord {
        schema_version: ENROLLMENT_SCHEMA_VERSION,
        identity_ref: identity_ref.to_string(),
        embedding: first.into_vec(),
        created_at: Utc::now(),
        metadata,
    };
    store.put(&record)?;

    tracing::info!(identity_ref, "identity enrolled");
    Ok(record)
}

/// Extract the first detected face from `image` and verify it against the
/// enrollment store behind `matcher`.
pub fn verify_image(
    image: &[u8],
    extractor: &dyn EmbeddingExtractor,
    matcher: &Matcher,
    config: VerifyConfig,
) -> Result<ProbeResult, PipelineError> {
    let faces = extractor.extract(image)?;
    let probe = faces.into_iter().next().ok_or(PipelineError::NoFaceDetected)?;

    let result = matcher.verify(&VerifyRequest { probe, config })?;
    tracing::debug!(matched = result.matched, "verification complete");
    Ok(result)
}
