//! Failure-path behavior of the enrollment and verification pipeline.

use facegate::{
    enroll_image, verify_image, BackendConfig, Embedding, EnrollmentError, EnrollmentStore,
    MatchError, Matcher, PipelineError, StoreConfig, StubExtractor, VerifyConfig, VerifyRequest,
};
use serde_json::json;
use std::sync::Arc;

fn in_memory_store() -> Arc<EnrollmentStore> {
    Arc::new(
        EnrollmentStore::new(StoreConfig::new().with_backend(BackendConfig::in_memory()))
            .expect("store init"),
    )
}

#[test]
fn no_face_is_rejected_on_enrollment() {
    let extractor = StubExtractor::default();
    let store = in_memory_store();

    let err = enroll_image(&[], "user-empty", &extractor, &store, json!({}))
        .expect_err("image without a face");
    assert!(matches!(err, PipelineError::NoFaceDetected));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn no_face_is_rejected_on_verification() {
    let extractor = StubExtractor::default();
    let store = in_memory_store();
    enroll_image(b"enrolled", "user-a", &extractor, &store, json!({})).expect("enrollment");

    let matcher = Matcher::new(store);
    let err = verify_image(&[], &extractor, &matcher, VerifyConfig::default())
        .expect_err("image without a face");
    assert!(matches!(err, PipelineError::NoFaceDetected));
}

#[test]
fn duplicate_identity_is_rejected_and_original_kept() {
    let extractor = StubExtractor::default();
    let store = in_memory_store();

    let original = enroll_image(b"first-photo", "user-dup", &extractor, &store, json!({}))
        .expect("first enrollment");
    let err = enroll_image(b"second-photo", "user-dup", &extractor, &store, json!({}))
        .expect_err("second enrollment under the same identity");

    assert!(matches!(
        err,
        PipelineError::Enrollment(EnrollmentError::DuplicateIdentity(_))
    ));

    let kept = store.get("user-dup").unwrap().expect("record kept");
    assert_eq!(kept.embedding, original.embedding);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn unmatched_probe_resolves_to_rejection_not_error() {
    let extractor = StubExtractor::default();
    let store = in_memory_store();
    enroll_image(b"enrolled-photo", "user-a", &extractor, &store, json!({})).expect("enrollment");

    let matcher = Matcher::new(store);
    // Tight tolerance so a different photo cannot match.
    let result = verify_image(
        b"completely-different-photo",
        &extractor,
        &matcher,
        VerifyConfig::with_tolerance(1e-9),
    )
    .expect("verification resolves");

    assert!(!result.matched);
    assert!(result.identity_ref.is_none());
    assert!(result.distance.is_none());
}

#[test]
fn probe_with_wrong_dimension_is_an_error() {
    let store = in_memory_store();
    let matcher = Matcher::new(store);

    let request = VerifyRequest {
        probe: Embedding::from(vec![0.1_f64; 7]),
        config: VerifyConfig::default(),
    };
    let err = matcher.verify(&request).expect_err("dimension mismatch");
    assert!(matches!(
        err,
        MatchError::ProbeDimension {
            expected: 128,
            actual: 7
        }
    ));
}

#[test]
fn invalid_tolerance_is_rejected() {
    let store = in_memory_store();
    let matcher = Matcher::new(store);

    for bad in [-0.1, f64::NAN, f64::INFINITY] {
        let request = VerifyRequest {
            probe: Embedding::from(vec![0.0_f64; 128]),
            config: VerifyConfig::with_tolerance(bad),
        };
        let err = matcher.verify(&request).expect_err("invalid config");
        assert!(matches!(err, MatchError::InvalidConfig(_)));
    }
}
