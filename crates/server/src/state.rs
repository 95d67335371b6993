use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::token::TokenIssuer;
use facegate::{
    BackendConfig, EmbeddingExtractor, EnrollmentStore, Matcher, StoreConfig, StubExtractor,
};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Enrollment store (shared across requests)
    pub store: Arc<EnrollmentStore>,

    /// Verification engine (shared across requests)
    pub matcher: Arc<Matcher>,

    /// Face model boundary; pluggable per deployment
    pub extractor: Arc<dyn EmbeddingExtractor>,

    /// Session token issuance for matched verifications
    pub tokens: Arc<TokenIssuer>,
}

impl ServerState {
    /// Create new server state with the deterministic stub extractor.
    ///
    /// Deployments with a real face model install it via
    /// [`ServerState::with_extractor`].
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        Self::with_extractor(config, Arc::new(StubExtractor::default()))
    }

    /// Create new server state around an explicit extractor implementation.
    pub fn with_extractor(
        config: ServerConfig,
        extractor: Arc<dyn EmbeddingExtractor>,
    ) -> ServerResult<Self> {
        let backend = match &config.db_path {
            Some(path) => BackendConfig::redb(path.clone()),
            None => BackendConfig::in_memory(),
        };
        let store = Arc::new(EnrollmentStore::new(
            StoreConfig::new().with_backend(backend),
        )?);
        let matcher = Arc::new(Matcher::new(store.clone()));
        let tokens = Arc::new(TokenIssuer::new(config.token_ttl()));

        Ok(Self {
            config: Arc::new(config),
            store,
            matcher,
            extractor,
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_initializes_with_empty_store() {
        let state = ServerState::new(ServerConfig::default()).expect("state init");
        assert_eq!(state.store.count().unwrap(), 0);
        assert_eq!(state.extractor.dimension(), facegate::EMBEDDING_DIM);
    }
}
