//! Row mapping between the `photos` table and [`pw_core::Photo`].
//!
//! Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use pw_core::{Photo, PhotoId};
use rusqlite::types::Type;

/// Column list matching [`photo_from_row`].
pub const PHOTO_COLS: &str = "id, filename, url, sort_order, created_at, updated_at, deleted_at";

/// Format a timestamp for storage.
pub fn to_db_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_time(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_opt_time(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) => DateTime::parse_from_rfc3339(&v)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

/// Build a [`Photo`] from a row selected with [`PHOTO_COLS`].
pub fn photo_from_row(row: &rusqlite::Row) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: PhotoId::from(row.get::<_, i64>(0)?),
        filename: row.get(1)?,
        url: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: parse_time(row, 4)?,
        updated_at: parse_time(row, 5)?,
        deleted_at: parse_opt_time(row, 6)?,
    })
}
