//! Data-access interface used by the HTTP layer.
//!
//! [`PhotoRepository`] is the seam between handlers and storage. The SQLite
//! implementation checks a connection out of the pool for the duration of a
//! single call and returns it afterwards.

use pw_core::{Photo, Result};

use crate::pool::{get_conn, DbPool};
use crate::queries::photos;

/// Storage operations on photo records.
pub trait PhotoRepository: Send + Sync {
    /// Insert a record for a freshly written file. New photos get `sort_order = 0`.
    fn insert(&self, filename: &str) -> Result<Photo>;

    /// All active photos, ascending by `sort_order` then id.
    fn list_ordered(&self) -> Result<Vec<Photo>>;

    /// Soft-delete the records stored under `filename`. Returns how many matched.
    fn delete_by_filename(&self, filename: &str) -> Result<usize>;

    /// Atomically assign `sort_order = position` to each named photo.
    fn reorder(&self, filenames: &[String]) -> Result<usize>;
}

/// [`PhotoRepository`] backed by the r2d2 SQLite pool.
#[derive(Clone)]
pub struct SqlitePhotoRepository {
    pool: DbPool,
}

impl SqlitePhotoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PhotoRepository for SqlitePhotoRepository {
    fn insert(&self, filename: &str) -> Result<Photo> {
        let conn = get_conn(&self.pool)?;
        let photo = photos::insert_photo(&conn, filename, 0)?;
        tracing::debug!(id = %photo.id, filename, "Inserted photo record");
        Ok(photo)
    }

    fn list_ordered(&self) -> Result<Vec<Photo>> {
        let conn = get_conn(&self.pool)?;
        photos::list_photos(&conn)
    }

    fn delete_by_filename(&self, filename: &str) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        let n = photos::soft_delete_by_filename(&conn, filename)?;
        tracing::debug!(filename, rows = n, "Soft-deleted photo records");
        Ok(n)
    }

    fn reorder(&self, filenames: &[String]) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        let n = photos::reorder(&conn, filenames)?;
        tracing::debug!(positions = filenames.len(), rows = n, "Applied photo order");
        Ok(n)
    }
}
