//! SQLite connection pool for the photo store.
//!
//! Both the on-disk and the in-memory pool go through [`open_pool`], which
//! sizes the pool, applies the schema, and reports the version it ended at.

use std::time::Duration;

use pw_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections per pool. Writers serialize on SQLite's lock anyway.
const POOL_SIZE: u32 = 4;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the photo store backed by the file at `db_path`, creating it if needed.
///
/// File-backed connections use WAL so listing never blocks behind a reorder.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)
    });
    open_pool(manager, db_path)
}

/// Open a private in-memory photo store.
///
/// Every call gets its own shared-cache database name, so separate pools
/// never see each other's rows while connections of one pool do.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:photowall_mem_{}?mode=memory&cache=shared",
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );

    let manager = SqliteConnectionManager::file(&uri)
        .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
    open_pool(manager, &uri)
}

/// Build the pool and bring the schema up to date on its first connection.
fn open_pool(manager: SqliteConnectionManager, location: &str) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to open photo store {location}: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    let version = migrations::current_version(&conn)?;
    tracing::debug!(location, schema_version = version, "Photo store ready");

    Ok(pool)
}

/// Check out a connection, mapping pool exhaustion to a database error.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
