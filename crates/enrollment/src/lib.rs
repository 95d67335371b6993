//! # Face Enrollment Store (`enrollment`)
//!
//! Durable mapping from an opaque identity reference to exactly one face
//! embedding. Built once per registration event and read as a snapshot by the
//! matching layer at verification time.
//!
//! ## Core Features
//!
//! - **Pluggable Backends**: storage goes through the [`StoreBackend`] trait.
//!   Out of the box:
//!   - an in-memory `HashMap` backend for fast, ephemeral storage (default,
//!     ideal for testing);
//!   - a redb backend for persistent, on-disk storage (enabled via the
//!     `backend-redb` feature).
//! - **One embedding per identity**: [`EnrollmentStore::put`] rejects a second
//!   record for an already-enrolled identity with
//!   [`EnrollmentError::DuplicateIdentity`]. Re-enrollment requires an
//!   explicit [`EnrollmentStore::remove`] first.
//! - **Exact round-tripping**: records are bincode-encoded (optionally
//!   zstd-compressed), which reproduces the exact `f64` descriptor components
//!   on read. The matching tolerance is never affected by storage.
//! - **Snapshot reads**: [`EnrollmentStore::list_all`] reflects committed
//!   state at call time and is safe to call concurrently with `put`; a
//!   registration that commits mid-scan may or may not be observed by that
//!   one verification, which is acceptable for this workload.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use enrollment::{
//!     BackendConfig, EnrollmentRecord, EnrollmentStore, StoreConfig,
//!     ENROLLMENT_SCHEMA_VERSION,
//! };
//! use serde_json::json;
//!
//! let store = EnrollmentStore::new(
//!     StoreConfig::new().with_backend(BackendConfig::in_memory()),
//! ).unwrap();
//!
//! let record = EnrollmentRecord {
//!     schema_version: ENROLLMENT_SCHEMA_VERSION,
//!     identity_ref: "user-1".into(),
//!     embedding: vec![0.0; 128],
//!     created_at: Utc::now(),
//!     metadata: json!({ "photo_path": "uploads/user-1.jpg" }),
//! };
//! store.put(&record).unwrap();
//!
//! let all = store.list_all().unwrap();
//! assert_eq!(all.len(), 1);
//! ```

mod backend;

#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;
pub use backend::{BackendConfig, InMemoryBackend, StoreBackend};

use bincode::config::standard;
use bincode::error::{DecodeError, EncodeError};
use bincode::serde::{decode_from_slice, encode_to_vec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zstd::{decode_all, encode_all};

/// Bump this value whenever the on-disk `EnrollmentRecord` layout changes.
pub const ENROLLMENT_SCHEMA_VERSION: u16 = 1;

mod metadata_serde {
    use serde::de::Error as DeError;
    use serde::ser::Error as SerError;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    // bincode cannot encode serde_json::Value directly; tunnel it as a JSON
    // byte blob.
    pub(super) fn serialize<S>(value: &Value, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bytes = serde_json::to_vec(value).map_err(SerError::custom)?;
        serializer.serialize_bytes(&bytes)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        serde_json::from_slice(&bytes).map_err(DeError::custom)
    }
}

/// One enrolled identity: opaque reference plus exactly one face descriptor.
///
/// Created at registration time, never mutated, deleted only by explicit
/// identity removal.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnrollmentRecord {
    /// Schema version for backward compatibility when deserializing.
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    /// Opaque unique identity reference (primary key in the store).
    pub identity_ref: String,
    /// Raw face descriptor components; length is fixed by the extractor.
    pub embedding: Vec<f64>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Arbitrary metadata associated with the enrollment (JSON), e.g. the
    /// stored photo path.
    #[serde(with = "metadata_serde")]
    pub metadata: serde_json::Value,
}

const fn default_schema_version() -> u16 {
    ENROLLMENT_SCHEMA_VERSION
}

/// Compression codec options for stored records.
#[derive(Clone, Debug, Default)]
pub enum CompressionCodec {
    /// No compression (useful for debugging or when storage is not a concern).
    None,
    /// Zstd compression (default; lossless, so float exactness is preserved).
    #[default]
    Zstd,
}

/// Compression behavior configuration.
#[derive(Clone, Debug)]
pub struct CompressionConfig {
    pub codec: CompressionCodec,
    /// Compression level (1-22 for Zstd).
    pub level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            codec: CompressionCodec::default(),
            level: 3,
        }
    }
}

impl CompressionConfig {
    pub fn new(codec: CompressionCodec, level: i32) -> Self {
        Self { codec, level }
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, EnrollmentError> {
        match self.codec {
            CompressionCodec::None => Ok(data.to_vec()),
            CompressionCodec::Zstd => Ok(encode_all(data, self.level)?),
        }
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, EnrollmentError> {
        match self.codec {
            CompressionCodec::None => Ok(data.to_vec()),
            CompressionCodec::Zstd => Ok(decode_all(data)?),
        }
    }
}

/// Config for initializing the store.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Backend storage configuration (in-memory or redb).
    pub backend: BackendConfig,
    /// Compression settings for stored records.
    pub compression: CompressionConfig,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }
}

/// Errors produced by the enrollment store.
#[derive(Error, Debug, Clone)]
pub enum EnrollmentError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("serialization encode error: {0}")]
    Encode(String),
    #[error("serialization decode error: {0}")]
    Decode(String),
    #[error("compression error: {0}")]
    Compression(String),
    #[error("identity {0:?} is already enrolled")]
    DuplicateIdentity(String),
}

impl From<EncodeError> for EnrollmentError {
    fn from(e: EncodeError) -> Self {
        EnrollmentError::Encode(e.to_string())
    }
}

impl From<DecodeError> for EnrollmentError {
    fn from(e: DecodeError) -> Self {
        EnrollmentError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for EnrollmentError {
    fn from(e: std::io::Error) -> Self {
        EnrollmentError::Compression(e.to_string())
    }
}

impl EnrollmentError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

/// The enrollment store: identity reference → one embedding, append-only in
/// normal operation.
pub struct EnrollmentStore {
    backend: Box<dyn StoreBackend>,
    cfg: StoreConfig,
}

impl EnrollmentStore {
    /// Initialize or open a store using the configured backend.
    pub fn new(cfg: StoreConfig) -> Result<Self, EnrollmentError> {
        let backend = cfg.backend.build()?;
        Ok(Self::with_backend(cfg, backend))
    }

    /// Build a store with a custom backend (e.g. in-memory for tests).
    pub fn with_backend(cfg: StoreConfig, backend: Box<dyn StoreBackend>) -> Self {
        Self { backend, cfg }
    }

    /// Insert a new enrollment record.
    ///
    /// Fails with [`EnrollmentError::DuplicateIdentity`] when the identity
    /// already has a record; exactly one embedding per identity is the store
    /// invariant.
    pub fn put(&self, rec: &EnrollmentRecord) -> Result<(), EnrollmentError> {
        if self.backend.get(&rec.identity_ref)?.is_some() {
            return Err(EnrollmentError::DuplicateIdentity(rec.identity_ref.clone()));
        }
        let payload = self.encode_record(rec)?;
        self.backend.put(&rec.identity_ref, &payload)?;
        tracing::debug!(identity_ref = %rec.identity_ref, "enrollment stored");
        Ok(())
    }

    /// Retrieve one record by identity reference.
    pub fn get(&self, identity_ref: &str) -> Result<Option<EnrollmentRecord>, EnrollmentError> {
        match self.backend.get(identity_ref)? {
            Some(data) => Ok(Some(self.decode_record(&data)?)),
            None => Ok(None),
        }
    }

    /// Snapshot of all enrolled records for a matching scan.
    ///
    /// Reflects committed state at call time; enumeration order is not
    /// guaranteed stable across calls.
    pub fn list_all(&self) -> Result<Vec<EnrollmentRecord>, EnrollmentError> {
        let mut records = Vec::new();
        self.backend.scan(&mut |data: &[u8]| {
            records.push(self.decode_record(data)?);
            Ok(())
        })?;
        Ok(records)
    }

    /// Remove an identity's enrollment. Removing an unknown identity is a
    /// no-op.
    pub fn remove(&self, identity_ref: &str) -> Result<(), EnrollmentError> {
        self.backend.delete(identity_ref)
    }

    /// Number of enrolled identities.
    pub fn count(&self) -> Result<usize, EnrollmentError> {
        let mut n = 0usize;
        self.backend.scan(&mut |_| {
            n += 1;
            Ok(())
        })?;
        Ok(n)
    }

    /// Flush backend buffers if supported.
    pub fn flush(&self) -> Result<(), EnrollmentError> {
        self.backend.flush()
    }

    fn encode_record(&self, rec: &EnrollmentRecord) -> Result<Vec<u8>, EnrollmentError> {
        let encoded = encode_to_vec(rec, standard())?;
        self.cfg.compression.compress(&encoded)
    }

    fn decode_record(&self, data: &[u8]) -> Result<EnrollmentRecord, EnrollmentError> {
        let decompressed = self.cfg.compression.decompress(data)?;
        let (record, _) = decode_from_slice(&decompressed, standard())?;
        Ok(record)
    }
}
