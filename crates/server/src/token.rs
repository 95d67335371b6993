use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Opaque bearer session tokens for authenticated users.
///
/// Token issuance is an interface boundary of the matching core; this issuer
/// keeps it thin: an unguessable UUID mapped to the matched identity with a
/// TTL. Expired entries are dropped lazily on validation.
pub struct TokenIssuer {
    ttl: Duration,
    sessions: DashMap<String, Session>,
}

struct Session {
    identity_ref: String,
    expires_at: Instant,
}

impl TokenIssuer {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Issue a fresh token for a matched identity.
    pub fn issue(&self, identity_ref: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                identity_ref: identity_ref.to_string(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its identity reference, dropping it when expired.
    pub fn validate(&self, token: &str) -> Option<String> {
        let expired = match self.sessions.get(token) {
            Some(session) if session.expires_at > Instant::now() => {
                return Some(session.identity_ref.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(token);
        }
        None
    }

    /// Invalidate a token (logout).
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }
}
