//! # Face Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the embedding layer (`embedding`) and the
//! enrollment store (`enrollment`). Given a probe embedding extracted from a
//! verification image, it scans the current enrollment snapshot, computes the
//! Euclidean distance to every enrolled descriptor, and applies the accept /
//! reject policy: a record is a *candidate* when its distance is within the
//! configured tolerance, and the winner is the candidate with minimum
//! distance.
//!
//! The engine is read-only over the store, holds no mutable state, and needs
//! no locking; each verification is bounded, CPU-only work proportional to
//! store size (O(n·d) for n enrolled identities of dimensionality d).
//!
//! ## Core Types
//!
//! - [`VerifyConfig`]: tolerance (default 0.6) and expected dimensionality.
//! - [`VerifyRequest`]: probe embedding + configuration.
//! - [`ProbeResult`]: the decision — matched flag, winning identity reference
//!   and observed distance, plus optional scan statistics.
//! - [`SkipReason`]: explicit per-record skip outcome for corrupt stored
//!   records; a record with the wrong descriptor length is logged and
//!   excluded from candidacy, never allowed to abort the scan.
//! - [`Matcher`]: the engine, wired to a shared [`EnrollmentStore`].
//!
//! ## Decision policy
//!
//! - An empty probe resolves to `{matched: false}` without scanning.
//! - Candidacy is inclusive: `distance <= tolerance` counts as a match.
//! - Equal-minimum-distance ties resolve to the lowest identity reference
//!   (lexicographic), independent of store enumeration order.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use embedding::{Embedding, EMBEDDING_DIM};
//! use enrollment::{BackendConfig, EnrollmentStore, StoreConfig};
//! use matcher::{Matcher, VerifyConfig, VerifyRequest};
//!
//! let store = Arc::new(
//!     EnrollmentStore::new(StoreConfig::new().with_backend(BackendConfig::in_memory()))
//!         .expect("store init"),
//! );
//! let matcher = Matcher::new(store);
//!
//! let req = VerifyRequest {
//!     probe: Embedding::new(vec![0.0; EMBEDDING_DIM]),
//!     config: VerifyConfig::default(),
//! };
//! let result = matcher.verify(&req).expect("verify");
//! assert!(!result.matched); // empty store: no candidates
//! ```
//!
//! ## Observability
//!
//! Install a [`VerifyMetrics`] implementation via [`set_verify_metrics`] to
//! record per-verification latency and outcomes. This is typically done once
//! during service startup so all calls through [`Matcher`] share the same
//! metrics backend.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::Matcher;
pub use crate::metrics::{set_verify_metrics, VerifyMetrics};
pub use crate::types::{
    MatchError, ProbeResult, SkipReason, VerifyConfig, VerifyExplanation, VerifyRequest,
};
