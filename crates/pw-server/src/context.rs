//! Application context shared across route handlers via Axum state.
//!
//! [`AppContext`] is built once by the process entry point (or a test
//! harness) and cloned cheaply into every request; all members are `Arc`s.

use std::sync::Arc;

use pw_core::config::Config;
use pw_db::pool::DbPool;
use pw_db::repo::{PhotoRepository, SqlitePhotoRepository};

use crate::uploads::UploadDir;

#[derive(Clone)]
pub struct AppContext {
    /// Photo storage.
    pub photos: Arc<dyn PhotoRepository>,
    /// Directory holding the uploaded files.
    pub uploads: Arc<UploadDir>,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Build a context over an initialized pool, using the upload directory
    /// named in `config`.
    pub fn new(config: Config, db: DbPool) -> Self {
        let uploads = UploadDir::new(config.server.upload_dir.clone());
        Self {
            photos: Arc::new(SqlitePhotoRepository::new(db)),
            uploads: Arc::new(uploads),
            config: Arc::new(config),
        }
    }
}
