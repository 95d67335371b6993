use std::sync::Arc;
use std::time::Instant;

use embedding::{euclidean_distance_slice, Embedding, EmbeddingError};
use enrollment::{EnrollmentRecord, EnrollmentStore};

use crate::metrics::metrics_recorder;
use crate::types::{
    MatchError, ProbeResult, SkipReason, VerifyConfig, VerifyExplanation, VerifyRequest,
};


/// Per-record scan outcome: a scored candidate, a record outside tolerance,
/// or an explicit skip. The scan loop consumes these instead of letting a
/// corrupt record fault the whole verification.
enum RecordOutcome {
    Candidate { identity_ref: String, distance: f64 },
    OutOfTolerance,
    Skipped(SkipReason),
}

/// Verification engine over a shared enrollment store.
///
/// Holds no mutable state; `verify` is read-only over the store, so the
/// engine can be shared freely across request tasks.
pub struct Matcher {
    store: Arc<EnrollmentStore>,
}

impl Matcher {
    /// Construct a matcher from a shared store handle. The store's lifecycle
    /// is owned by the caller.
    pub fn new(store: Arc<EnrollmentStore>) -> Self {
        Self { store }
    }

    /// Access the underlying store handle.
    pub fn store(&self) -> &Arc<EnrollmentStore> {
        &self.store
    }

    /// Run a single verification and return the accept/reject decision.
    ///
    /// For fixed store contents and a fixed probe, repeated calls return the
    /// same result.
    pub fn verify(&self, req: &VerifyRequest) -> Result<ProbeResult, MatchError> {
        req.config.validate()?;

        // Caller is responsible for ensuring a face was detected upstream;
        // an absent probe is the defined negative outcome, not an error.
        if req.probe.is_empty() {
            tracing::warn!("empty probe embedding; skipping scan");
            return Ok(ProbeResult::no_match(Some(VerifyExplanation::default())));
        }

        if req.probe.len() != req.config.dimension {
            return Err(MatchError::ProbeDimension {
                expected: req.config.dimension,
                actual: req.probe.len(),
            });
        }

        let start = Instant::now();
        let snapshot = self.store.list_all()?;

        let mut explanation = VerifyExplanation::default();
        let mut best: Option<(f64, String)> = None;

        for record in &snapshot {
            match score_record(record, &req.probe, &req.config) {
                RecordOutcome::Candidate {
                    identity_ref,
                    distance,
                } => {
                    explanation.compared += 1;
                    explanation.candidates += 1;
                    if is_better(&best, distance, &identity_ref) {
                        best = Some((distance, identity_ref));
                    }
                }
                RecordOutcome::OutOfTolerance => {
                    explanation.compared += 1;
                }
                RecordOutcome::Skipped(reason) => {
                    explanation.skipped += 1;
                    tracing::warn!(
                        identity_ref = %record.identity_ref,
                        ?reason,
                        "stored record excluded from scan"
                    );
                }
            }
        }

        let result = match best {
            Some((distance, identity_ref)) => {
                ProbeResult::matched(identity_ref, distance, Some(explanation))
            }
            None => ProbeResult::no_match(Some(explanation)),
        };

        if let Some(recorder) = metrics_recorder() {
            recorder.record_verify(start.elapsed(), snapshot.len(), result.matched);
        }

        Ok(result)
    }
}

/// Score one stored record against the probe.
fn score_record(record: &EnrollmentRecord, probe: &Embedding, cfg: &VerifyConfig) -> RecordOutcome {
    if record.embedding.len() != cfg.dimension {
        return RecordOutcome::Skipped(SkipReason::DimensionMismatch {
            expected: cfg.dimension,
            actual: record.embedding.len(),
        });
    }

    let distance = match euclidean_distance_slice(&record.embedding, probe.as_slice()) {
        Ok(d) => d,
        Err(EmbeddingError::DimensionMismatch { expected, actual }) => {
            return RecordOutcome::Skipped(SkipReason::DimensionMismatch { expected, actual });
        }
    };

    // Inclusive boundary: a probe at exactly `tolerance` counts as a match.
    if distance <= cfg.tolerance {
        RecordOutcome::Candidate {
            identity_ref: record.identity_ref.clone(),
            distance,
        }
    } else {
        RecordOutcome::OutOfTolerance
    }
}

/// Minimum distance wins; equal distances resolve to the lowest identity
/// reference so the decision is independent of store enumeration order.
fn is_better(best: &Option<(f64, String)>, distance: f64, identity_ref: &str) -> bool {
    match best {
        None => true,
        Some((best_distance, best_id)) => {
            distance < *best_distance
                || (distance == *best_distance && identity_ref < best_id.as_str())
        }
    }
}
