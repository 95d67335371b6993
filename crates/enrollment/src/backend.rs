use crate::EnrollmentError;
use std::sync::RwLock;

/// Trait for a key-value storage backend for the enrollment store.
///
/// Keys are identity references, values are encoded records. Implementations
/// must be safe to share across threads; `scan` may run concurrently with
/// `put` from another thread, and a write that commits mid-scan may or may not
/// be observed by that scan.
pub trait StoreBackend: Send + Sync {
    /// Insert or replace a key-value pair.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), EnrollmentError>;
    /// Retrieve a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EnrollmentError>;
    /// Delete a key-value pair.
    fn delete(&self, key: &str) -> Result<(), EnrollmentError>;
    /// Scan all values in the backend, calling the visitor for each one.
    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), EnrollmentError>,
    ) -> Result<(), EnrollmentError>;
    /// Flush any buffered writes to the backend.
    fn flush(&self) -> Result<(), EnrollmentError> {
        Ok(())
    }
}

/// Configuration for selecting and building a backend.
///
/// # Example
/// ```
/// use enrollment::BackendConfig;
///
/// // In-memory (default; for testing and ephemeral deployments)
/// let config = BackendConfig::in_memory();
///
/// // redb (persistent, pure Rust)
/// let config = BackendConfig::redb("/data/enrollments.redb");
/// ```
#[derive(Clone, Debug, Default)]
pub enum BackendConfig {
    /// Use redb for storage. `path` is the database file path.
    ///
    /// Requires the `backend-redb` feature to be enabled at compile time.
    Redb { path: String },
    /// Use an in-memory HashMap for storage.
    #[default]
    InMemory,
}

impl BackendConfig {
    /// Create an in-memory backend configuration.
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    /// Create a redb backend configuration.
    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Build the backend based on the configuration.
    pub fn build(&self) -> Result<Box<dyn StoreBackend>, EnrollmentError> {
        match self {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbBackend::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(EnrollmentError::backend(
                        "redb backend disabled at compile time",
                    ))
                }
            }
        }
    }
}

/// An in-memory backend using a `RwLock` around a `HashMap`.
pub struct InMemoryBackend {
    records: RwLock<std::collections::HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for InMemoryBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), EnrollmentError> {
        self.records
            .write()
            .map_err(|_| EnrollmentError::backend("poisoned lock"))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EnrollmentError> {
        let guard = self
            .records
            .read()
            .map_err(|_| EnrollmentError::backend("poisoned lock"))?;
        Ok(guard.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), EnrollmentError> {
        self.records
            .write()
            .map_err(|_| EnrollmentError::backend("poisoned lock"))?
            .remove(key);
        Ok(())
    }

    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), EnrollmentError>,
    ) -> Result<(), EnrollmentError> {
        // A read lock is held for the duration of the scan; writers block
        // until the snapshot enumeration finishes.
        let guard = self
            .records
            .read()
            .map_err(|_| EnrollmentError::backend("poisoned lock"))?;
        for value in guard.values() {
            visitor(value)?;
        }
        Ok(())
    }
}

#[cfg(feature = "backend-redb")]
mod redb_backend;

#[cfg(feature = "backend-redb")]
pub use redb_backend::RedbBackend;
