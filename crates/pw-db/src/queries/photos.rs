//! Photo CRUD and reorder operations.
//!
//! Every read and update filters on `deleted_at IS NULL`; soft-deleted rows
//! are invisible to the rest of the application.

use chrono::Utc;
use pw_core::{Error, Photo, PhotoId, Result};
use rusqlite::{params, Connection};

use crate::models::{photo_from_row, to_db_time, PHOTO_COLS};

/// Insert a new photo record and return it with its assigned id.
pub fn insert_photo(conn: &Connection, filename: &str, sort_order: i64) -> Result<Photo> {
    let now = Utc::now();
    let url = Photo::url_for(filename);
    let ts = to_db_time(now);

    conn.execute(
        "INSERT INTO photos (filename, url, sort_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![filename, url, sort_order, ts],
    )
    .map_err(Error::database)?;

    Ok(Photo {
        id: PhotoId::from(conn.last_insert_rowid()),
        filename: filename.to_string(),
        url,
        sort_order,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

/// List active photos by ascending `sort_order`.
///
/// Ties fall back to ascending id, i.e. insertion order.
pub fn list_photos(conn: &Connection) -> Result<Vec<Photo>> {
    let q = format!(
        "SELECT {PHOTO_COLS} FROM photos
         WHERE deleted_at IS NULL
         ORDER BY sort_order ASC, id ASC"
    );
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], photo_from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Soft-delete every active photo stored under `filename`.
///
/// Returns the number of records marked deleted (0 when nothing matched).
pub fn soft_delete_by_filename(conn: &Connection, filename: &str) -> Result<usize> {
    let ts = to_db_time(Utc::now());
    conn.execute(
        "UPDATE photos SET deleted_at = ?1, updated_at = ?1
         WHERE filename = ?2 AND deleted_at IS NULL",
        params![ts, filename],
    )
    .map_err(Error::database)
}

/// Set `sort_order` on every active photo stored under `filename`.
///
/// Returns the number of rows updated.
pub fn set_sort_order(conn: &Connection, filename: &str, sort_order: i64) -> Result<usize> {
    let ts = to_db_time(Utc::now());
    conn.execute(
        "UPDATE photos SET sort_order = ?1, updated_at = ?2
         WHERE filename = ?3 AND deleted_at IS NULL",
        params![sort_order, ts, filename],
    )
    .map_err(Error::database)
}

/// Apply a display order in one transaction.
///
/// The filename at position `i` gets `sort_order = i`. Photos not named keep
/// their current value. If any filename has no active record the transaction
/// is rolled back and [`Error::NotFound`] is returned, so a partial order is
/// never visible to readers.
pub fn reorder(conn: &Connection, filenames: &[String]) -> Result<usize> {
    let tx = conn.unchecked_transaction().map_err(Error::database)?;

    let mut updated = 0;
    for (index, filename) in filenames.iter().enumerate() {
        let n = set_sort_order(&tx, filename, index as i64)?;
        if n == 0 {
            // Dropping `tx` rolls back the updates applied so far.
            return Err(Error::not_found("photo", filename));
        }
        updated += n;
    }

    tx.commit().map_err(Error::database)?;
    Ok(updated)
}
