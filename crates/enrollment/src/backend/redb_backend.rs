use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::EnrollmentError;
use super::StoreBackend;

const ENROLLMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("enrollments");

/// Persistent backend over a redb database file.
///
/// redb gives ACID transactions with snapshot-isolated readers, which is
/// exactly the read-committed behavior the store contract asks for: a scan
/// runs against the state committed when its read transaction began.
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Open (or create) the database at `path` and ensure the enrollments
    /// table exists.
    pub fn open(path: &str) -> Result<Self, EnrollmentError> {
        let db = Database::create(path).map_err(EnrollmentError::backend)?;
        let txn = db.begin_write().map_err(EnrollmentError::backend)?;
        txn.open_table(ENROLLMENTS)
            .map_err(EnrollmentError::backend)?;
        txn.commit().map_err(EnrollmentError::backend)?;
        Ok(Self { db })
    }
}

impl StoreBackend for RedbBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), EnrollmentError> {
        let txn = self.db.begin_write().map_err(EnrollmentError::backend)?;
        {
            let mut table = txn
                .open_table(ENROLLMENTS)
                .map_err(EnrollmentError::backend)?;
            table.insert(key, value).map_err(EnrollmentError::backend)?;
        }
        txn.commit().map_err(EnrollmentError::backend)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EnrollmentError> {
        let txn = self.db.begin_read().map_err(EnrollmentError::backend)?;
        let table = txn
            .open_table(ENROLLMENTS)
            .map_err(EnrollmentError::backend)?;
        let value = table.get(key).map_err(EnrollmentError::backend)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn delete(&self, key: &str) -> Result<(), EnrollmentError> {
        let txn = self.db.begin_write().map_err(EnrollmentError::backend)?;
        {
            let mut table = txn
                .open_table(ENROLLMENTS)
                .map_err(EnrollmentError::backend)?;
            table.remove(key).map_err(EnrollmentError::backend)?;
        }
        txn.commit().map_err(EnrollmentError::backend)
    }

    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), EnrollmentError>,
    ) -> Result<(), EnrollmentError> {
        let txn = self.db.begin_read().map_err(EnrollmentError::backend)?;
        let table = txn
            .open_table(ENROLLMENTS)
            .map_err(EnrollmentError::backend)?;
        for entry in table.iter().map_err(EnrollmentError::backend)? {
            let (_, value) = entry.map_err(EnrollmentError::backend)?;
            visitor(value.value())?;
        }
        Ok(())
    }
}
