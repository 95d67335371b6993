//! End-to-end determinism: the same image bytes must always produce the same
//! descriptor, and a verification over a fixed store must always produce the
//! same decision.

use facegate::{
    enroll_image, verify_image, BackendConfig, EmbeddingExtractor, EnrollmentStore, Matcher,
    StoreConfig, StubExtractor, VerifyConfig, EMBEDDING_DIM,
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
fn extractor_is_deterministic_across_calls() {
    let extractor = StubExtractor::default();

    let first = extractor.extract(b"same-photo-bytes").expect("extract");
    let second = extractor.extract(b"same-photo-bytes").expect("extract");

    assert_eq!(first.len(), second.len());
    assert_eq!(first[0].as_slice(), second[0].as_slice());
    assert_eq!(first[0].len(), EMBEDDING_DIM);
}

#[test]
fn repeated_verification_yields_identical_results() {
    let extractor = StubExtractor::default();
    let store = in_memory_store();

    for name in ["user-alpha", "user-beta", "user-gamma"] {
        enroll_image(
            name.as_bytes(),
            name,
            &extractor,
            &store,
            json!({ "photo_path": format!("uploads/{name}.jpg") }),
        )
        .expect("enrollment");
    }

    let matcher = Matcher::new(store);
    let mut outcomes = Vec::new();
    for _ in 0..5 {
        let result = verify_image(
            b"user-beta",
            &extractor,
            &matcher,
            VerifyConfig::default(),
        )
        .expect("verification");
        outcomes.push((result.matched, result.identity_ref, result.distance));
    }

    let first = &outcomes[0];
    assert!(first.0);
    assert_eq!(first.1.as_deref(), Some("user-beta"));
    for other in &outcomes[1..] {
        assert_eq!(other, first);
    }
}

#[test]
fn verification_is_stable_after_store_rebuild() {
    let extractor = StubExtractor::default();

    let run = || {
        let store = in_memory_store();
        for name in ["user-one", "user-two"] {
            enroll_image(name.as_bytes(), name, &extractor, &store, json!({}))
                .expect("enrollment");
        }
        let matcher = Matcher::new(store);
        verify_image(b"user-two", &extractor, &matcher, VerifyConfig::default())
            .expect("verification")
    };

    let first = run();
    let second = run();

    assert_eq!(first.matched, second.matched);
    assert_eq!(first.identity_ref, second.identity_ref);
    assert_eq!(first.distance, second.distance);
}
