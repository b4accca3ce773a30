//! The photo record shared by storage and the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public URL prefix under which uploaded files are served.
pub const IMAGES_PREFIX: &str = "/images";

/// Database-assigned identifier for a photo.
///
/// Wraps the SQLite rowid so it cannot be confused with a sort position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(i64);

impl PhotoId {
    /// Return the raw rowid.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PhotoId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A stored photo.
///
/// `deleted_at` is the soft-delete marker. Records returned by listing
/// queries always have it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub filename: String,
    pub url: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Photo {
    /// Public path at which a file with this name is served.
    pub fn url_for(filename: &str) -> String {
        format!("{IMAGES_PREFIX}/{filename}")
    }
}
